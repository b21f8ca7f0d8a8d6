//! MultiSnake - local multi-player snake in the terminal
//!
//! This library provides:
//! - Core game rules (game module)
//! - Keyboard and controller input mapping (input module)
//! - TUI rendering (render module)
//! - Round timing and high score (metrics module)
//! - The interactive play loop (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
