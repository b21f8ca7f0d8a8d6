//! Read-only projection of the game state for drawing

use super::config::{Color, GameConfig};
use super::controller::Phase;
use super::grid::Cell;
use super::state::{FoodKind, Round};

pub const START_PROMPT: &str = "Press a key to start";

/// One coloured cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tile {
    pub cell: Cell,
    pub color: Color,
}

/// Name and score of one player
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreLine {
    pub name: String,
    pub score: u32,
    pub color: Color,
    pub alive: bool,
}

/// Everything a renderer needs for one frame
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub columns: i32,
    pub rows: i32,
    pub field_size: i32,
    pub background: Color,
    pub obstacles: Vec<Tile>,
    pub food: Vec<Tile>,
    pub snakes: Vec<Tile>,
    pub scores: Vec<ScoreLine>,
    pub message: Option<String>,
    pub running: bool,
}

/// Derive the drawable scene from the current state
pub fn project(config: &GameConfig, round: Option<&Round>, phase: &Phase) -> Scene {
    let grid = config.grid();
    let mut scene = Scene {
        columns: grid.columns(),
        rows: grid.rows(),
        field_size: grid.field_size,
        background: config.background_color,
        obstacles: Vec::new(),
        food: Vec::new(),
        snakes: Vec::new(),
        scores: Vec::new(),
        message: None,
        running: matches!(phase, Phase::Running),
    };

    scene.message = match phase {
        Phase::Idle => Some(START_PROMPT.to_string()),
        Phase::Running => None,
        Phase::Finished(status) => round.and_then(|round| status.message(&round.snakes)),
    };

    let Some(round) = round else {
        return scene;
    };

    let mut obstacles: Vec<Cell> = round.obstacles.iter().copied().collect();
    obstacles.sort();
    scene.obstacles = obstacles
        .into_iter()
        .map(|cell| Tile {
            cell,
            color: config.obstacles_color,
        })
        .collect();

    scene.food = round
        .food
        .items()
        .iter()
        .map(|item| Tile {
            cell: item.cell,
            color: match item.kind {
                FoodKind::Regular => config.food_color,
                FoodKind::Super => config.super_food_color,
            },
        })
        .collect();

    for snake in &round.snakes {
        let color = if snake.alive {
            snake.color
        } else {
            snake.color.dimmed()
        };
        scene
            .snakes
            .extend(snake.segments.iter().map(|&cell| Tile { cell, color }));
        scene.scores.push(ScoreLine {
            name: snake.name.clone(),
            score: snake.score,
            color: snake.color,
            alive: snake.alive,
        });
    }

    scene
}
