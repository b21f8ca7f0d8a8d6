use super::state::Snake;

/// Solo play or a match between several players
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Solo,
    Versus,
}

/// How a versus round was won
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Victory {
    /// Only snake left alive
    LastSurvivor,
    /// All snakes died in the same tick; highest score takes it
    Score,
}

/// Result of evaluating a round after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundStatus {
    Running,
    /// Solo round ended with the only snake eliminated
    Lost { player: usize },
    Won { player: usize, victory: Victory },
    Draw,
}

impl RoundStatus {
    pub fn is_over(&self) -> bool {
        !matches!(self, RoundStatus::Running)
    }

    /// Status line for a finished round
    pub fn message(&self, snakes: &[Snake]) -> Option<String> {
        let name = |player: usize| snakes.get(player).map_or("?", |snake| snake.name.as_str());
        match self {
            RoundStatus::Running => None,
            RoundStatus::Lost { player } => Some(format!("{} loses", name(*player))),
            RoundStatus::Won { player, .. } => Some(format!("{} wins", name(*player))),
            RoundStatus::Draw => Some("Draw".to_string()),
        }
    }
}

/// Decide whether the round is over and who won
pub fn evaluate(snakes: &[Snake], kind: MatchKind) -> RoundStatus {
    let mut alive = snakes
        .iter()
        .enumerate()
        .filter(|(_, snake)| snake.alive)
        .map(|(index, _)| index);
    let first_alive = alive.next();
    let more_alive = alive.next().is_some();

    match kind {
        MatchKind::Solo => match first_alive {
            Some(_) => RoundStatus::Running,
            None => RoundStatus::Lost { player: 0 },
        },
        MatchKind::Versus => match (first_alive, more_alive) {
            (Some(_), true) => RoundStatus::Running,
            (Some(player), false) => RoundStatus::Won {
                player,
                victory: Victory::LastSurvivor,
            },
            (None, _) => best_score(snakes),
        },
    }
}

fn best_score(snakes: &[Snake]) -> RoundStatus {
    let Some(top) = snakes.iter().map(|snake| snake.score).max() else {
        return RoundStatus::Draw;
    };

    let mut leaders = snakes
        .iter()
        .enumerate()
        .filter(|(_, snake)| snake.score == top)
        .map(|(index, _)| index);

    match (leaders.next(), leaders.next()) {
        (Some(player), None) => RoundStatus::Won {
            player,
            victory: Victory::Score,
        },
        _ => RoundStatus::Draw,
    }
}
