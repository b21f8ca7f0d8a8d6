//! Core game logic module for MultiSnake
//!
//! This module contains all the game rules without any terminal or input
//! dependencies: the round state, the tick simulator, win evaluation and the
//! scene projection consumed by the renderer.

pub mod action;
pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod grid;
pub mod obstacles;
pub mod outcome;
pub mod placement;
pub mod scene;
pub mod state;

// Re-export commonly used types
pub use action::{Command, Direction};
pub use config::{Color, GameConfig, PlayerConfig};
pub use controller::{GameController, Phase};
pub use engine::{Elimination, GameEngine, SnakeEvent, TickReport};
pub use error::GameError;
pub use grid::{BorderPolicy, Cell, Grid};
pub use outcome::{MatchKind, RoundStatus, Victory};
pub use scene::{Scene, ScoreLine, Tile};
pub use state::{FoodKind, FoodPool, Round, Snake};
