use std::time::{Duration, Instant};

/// Round clock, per-player survival times and the session's best score
pub struct GameMetrics {
    round_start: Instant,
    pub elapsed_time: Duration,
    /// Time of elimination per player, `None` while still alive
    pub survival: Vec<Option<Duration>>,
    pub high_score: u32,
    pub rounds_played: u32,
    running: bool,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            elapsed_time: Duration::ZERO,
            survival: Vec::new(),
            high_score: 0,
            rounds_played: 0,
            running: false,
        }
    }

    /// Refresh the round clock; frozen between rounds
    pub fn update(&mut self) {
        if self.running {
            self.elapsed_time = self.round_start.elapsed();
        }
    }

    pub fn on_round_start(&mut self, players: usize) {
        self.round_start = Instant::now();
        self.elapsed_time = Duration::ZERO;
        self.survival = vec![None; players];
        self.running = true;
    }

    /// Stop the clock of `player`; later calls keep the first time
    pub fn on_eliminated(&mut self, player: usize) {
        self.update();
        if let Some(slot) = self.survival.get_mut(player) {
            slot.get_or_insert(self.elapsed_time);
        }
    }

    pub fn on_round_over(&mut self, best_score: u32) {
        self.update();
        self.running = false;
        self.rounds_played += 1;
        self.high_score = self.high_score.max(best_score);
    }

    /// How long `player` has stayed in the current round
    pub fn survival_time(&self, player: usize) -> Duration {
        self.survival
            .get(player)
            .copied()
            .flatten()
            .unwrap_or(self.elapsed_time)
    }

    pub fn format_time(&self) -> String {
        format_duration(self.elapsed_time)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// `mm:ss`, minutes are not capped
pub fn format_duration(duration: Duration) -> String {
    let secs = duration.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
