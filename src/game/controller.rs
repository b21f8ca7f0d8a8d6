use log::info;
use rand::{Rng, rngs::StdRng};

use super::{
    action::Command,
    config::GameConfig,
    engine::{GameEngine, TickReport},
    error::Result,
    outcome::{RoundStatus, evaluate},
    scene::{Scene, project},
    state::Round,
};

/// Where the game is between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No round has been played yet
    Idle,
    Running,
    /// The last round ended; its final state stays on screen
    Finished(RoundStatus),
}

/// Owns the current round and drives it from commands and ticks
pub struct GameController<R = StdRng> {
    engine: GameEngine<R>,
    round: Option<Round>,
    phase: Phase,
}

impl<R: Rng> GameController<R> {
    pub fn new(config: GameConfig, rng: R) -> Self {
        Self {
            engine: GameEngine::new(config, rng),
            round: None,
            phase: Phase::Idle,
        }
    }

    pub fn apply(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Start => {
                if !self.is_running() {
                    self.start_round()?;
                }
            }
            Command::Steer { player, direction } => {
                if !self.is_running() {
                    return Ok(());
                }
                if let Some(snake) = self
                    .round
                    .as_mut()
                    .and_then(|round| round.snakes.get_mut(player))
                {
                    snake.heading = direction;
                }
            }
        }
        Ok(())
    }

    /// Advance the running round by one tick, then check whether it is over
    pub fn tick(&mut self) -> Option<TickReport> {
        if !self.is_running() {
            return None;
        }
        let round = self.round.as_mut()?;

        let report = self.engine.tick(round);

        let status = evaluate(&round.snakes, self.engine.config().match_kind());
        if status.is_over() {
            info!(
                "round over after {} tick(s): {}",
                round.ticks,
                status.message(&round.snakes).unwrap_or_default()
            );
            self.phase = Phase::Finished(status);
        }

        Some(report)
    }

    pub fn scene(&self) -> Scene {
        project(self.engine.config(), self.round.as_ref(), &self.phase)
    }

    pub fn is_running(&self) -> bool {
        self.phase == Phase::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn config(&self) -> &GameConfig {
        self.engine.config()
    }

    fn start_round(&mut self) -> Result<()> {
        let round = self.engine.new_round()?;
        self.round = Some(round);
        self.phase = Phase::Running;
        Ok(())
    }
}
