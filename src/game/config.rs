use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use super::error::{GameError, Result};
use super::grid::{BorderPolicy, Grid};
use super::outcome::MatchKind;

/// Length of every snake at round start
pub const INITIAL_SNAKE_LENGTH: usize = 5;

/// RGBA colour packed as `0xRRGGBBAA`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Color(pub u32);

impl Color {
    pub fn r(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub fn g(&self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub fn b(&self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub fn a(&self) -> u8 {
        self.0 as u8
    }

    /// Same hue at a third of the brightness, used for eliminated snakes
    pub fn dimmed(&self) -> Self {
        let r = u32::from(self.r() / 3);
        let g = u32::from(self.g() / 3);
        let b = u32::from(self.b() / 3);
        Color((r << 24) | (g << 16) | (b << 8) | u32::from(self.a()))
    }
}

/// Per-player settings
///
/// Key names are resolved by the input handler; controller names may be left
/// empty when no gamepad is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct PlayerConfig {
    pub name: String,
    pub color: Color,

    pub key_up: String,
    pub key_down: String,
    pub key_left: String,
    pub key_right: String,

    pub controller_key_up: String,
    pub controller_key_down: String,
    pub controller_key_left: String,
    pub controller_key_right: String,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            name: "Player".to_string(),
            color: Color(0x00FF00FF),
            key_up: "Up".to_string(),
            key_down: "Down".to_string(),
            key_left: "Left".to_string(),
            key_right: "Right".to_string(),
            controller_key_up: String::new(),
            controller_key_down: String::new(),
            controller_key_left: String::new(),
            controller_key_right: String::new(),
        }
    }
}

impl PlayerConfig {
    /// Player steered with the given keyboard keys
    pub fn with_keys(name: &str, color: Color, keys: [&str; 4]) -> Self {
        let [up, down, left, right] = keys;
        Self {
            name: name.to_string(),
            color,
            key_up: up.to_string(),
            key_down: down.to_string(),
            key_left: left.to_string(),
            key_right: right.to_string(),
            ..Default::default()
        }
    }
}

/// Configuration for the game, read from a JSON file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
pub struct GameConfig {
    /// Width of the arena in pixels
    pub width: i32,
    /// Height of the arena in pixels
    pub height: i32,
    /// Edge length of one cell in pixels
    pub field_size: i32,

    /// One entry per player; the length decides solo or versus play
    pub players: Vec<PlayerConfig>,
    pub background_color: Color,

    /// Number of regular food items on the arena
    pub food: u32,
    pub food_color: Color,
    /// Score increment for eating regular food
    pub food_score: u32,

    /// Number of super food items on the arena
    pub super_food: u32,
    pub super_food_color: Color,
    /// Score increment for eating super food
    pub super_food_score: u32,

    /// Black/white bitmaps of `width/field_size` x `height/field_size` pixels;
    /// one is picked at random per round
    pub obstacles: Vec<PathBuf>,
    pub obstacles_color: Color,

    /// Snakes leaving the arena re-enter on the opposite side
    pub cycle_border: bool,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            field_size: 20,
            players: vec![
                PlayerConfig::with_keys("Green", Color(0x00FF00FF), ["Up", "Down", "Left", "Right"]),
                PlayerConfig::with_keys("Blue", Color(0x3399FFFF), ["W", "S", "A", "D"]),
            ],
            background_color: Color(0x000000FF),
            food: 3,
            food_color: Color(0xFF0000FF),
            food_score: 10,
            super_food: 0,
            super_food_color: Color(0xFFD700FF),
            super_food_score: 50,
            obstacles: Vec::new(),
            obstacles_color: Color(0x808080FF),
            cycle_border: false,
        }
    }
}

impl GameConfig {
    /// Single-player configuration with default arena
    pub fn solo() -> Self {
        Self {
            players: vec![PlayerConfig::default()],
            ..Default::default()
        }
    }

    /// Read a configuration file
    ///
    /// Relative obstacle paths are resolved against the directory of the file.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let mut config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;

        if let Some(base) = path.parent() {
            for obstacle in &mut config.obstacles {
                if obstacle.is_relative() {
                    *obstacle = base.join(&*obstacle);
                }
            }
        }

        Ok(config)
    }

    /// Check grid and player settings
    pub fn validate(&self) -> Result<()> {
        if self.field_size <= 0 {
            return Err(invalid("FieldSize must be positive"));
        }
        if self.width <= 0 || self.height <= 0 {
            return Err(invalid("Width and Height must be positive"));
        }
        if self.width % self.field_size != 0 || self.height % self.field_size != 0 {
            return Err(invalid("Width and Height must be multiples of FieldSize"));
        }
        if self.players.is_empty() {
            return Err(invalid("at least one player is required"));
        }
        if self.food == 0 {
            return Err(invalid("Food must be at least 1"));
        }
        if self.grid().columns() < INITIAL_SNAKE_LENGTH as i32 {
            return Err(invalid("arena is too narrow for a snake"));
        }
        Ok(())
    }

    /// Check that the player count fits the requested kind of match
    pub fn expect_match_kind(&self, kind: MatchKind) -> Result<()> {
        match (kind, self.match_kind()) {
            (MatchKind::Solo, MatchKind::Solo) | (MatchKind::Versus, MatchKind::Versus) => Ok(()),
            (MatchKind::Solo, _) => Err(invalid(&format!(
                "solo mode needs exactly one player, found {}",
                self.players.len()
            ))),
            (MatchKind::Versus, _) => Err(invalid(&format!(
                "versus mode needs at least two players, found {}",
                self.players.len()
            ))),
        }
    }

    pub fn match_kind(&self) -> MatchKind {
        if self.players.len() == 1 {
            MatchKind::Solo
        } else {
            MatchKind::Versus
        }
    }

    pub fn grid(&self) -> Grid {
        let border = if self.cycle_border {
            BorderPolicy::Wrap
        } else {
            BorderPolicy::Solid
        };
        Grid::new(self.width, self.height, self.field_size, border)
    }
}

fn invalid(reason: &str) -> GameError {
    GameError::InvalidConfiguration(reason.to_string())
}
