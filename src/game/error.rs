use std::path::PathBuf;

use thiserror::Error;

/// Failures raised by the game core
///
/// Collisions and eliminations are ordinary state transitions and never show
/// up here.
#[derive(Debug, Error)]
pub enum GameError {
    /// No free cell was found within the retry budget
    #[error("no free cell found after {attempts} attempts")]
    PlacementExhausted { attempts: u32 },

    /// Obstacle bitmap does not match the grid size
    #[error(
        "obstacle image is {}x{} pixels, expected {}x{}",
        .found.0, .found.1, .expected.0, .expected.1
    )]
    InvalidObstacleImage {
        expected: (u32, u32),
        found: (u32, u32),
    },

    /// Obstacle bitmap could not be opened or decoded
    #[error("failed to load obstacle image {path:?}")]
    ObstacleImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type Result<T, E = GameError> = std::result::Result<T, E>;
