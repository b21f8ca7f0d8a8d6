use std::str::FromStr;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::game::{Command, Direction, GameError, PlayerConfig};

/// Gamepad buttons that can be bound to a heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ControllerButton {
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,
    North,
    South,
    East,
    West,
}

impl FromStr for ControllerButton {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name.to_ascii_lowercase().as_str() {
            "dpadup" => Ok(ControllerButton::DPadUp),
            "dpaddown" => Ok(ControllerButton::DPadDown),
            "dpadleft" => Ok(ControllerButton::DPadLeft),
            "dpadright" => Ok(ControllerButton::DPadRight),
            "north" => Ok(ControllerButton::North),
            "south" => Ok(ControllerButton::South),
            "east" => Ok(ControllerButton::East),
            "west" => Ok(ControllerButton::West),
            _ => Err(()),
        }
    }
}

/// Anything that can steer a snake
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputSource {
    Keyboard(KeyCode),
    Controller(ControllerButton),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    /// Heading changes, one per player bound to the input
    Steer(Vec<Command>),
    Quit,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Binding {
    source: InputSource,
    player: usize,
    direction: Direction,
}

/// Maps raw key presses and controller buttons to per-player commands
pub struct InputHandler {
    bindings: Vec<Binding>,
}

impl InputHandler {
    /// Build the binding table from the players' configured key names
    pub fn new(players: &[PlayerConfig]) -> Result<Self, GameError> {
        let mut bindings = Vec::new();

        for (player, config) in players.iter().enumerate() {
            let keys = [
                (&config.key_up, Direction::Up),
                (&config.key_down, Direction::Down),
                (&config.key_left, Direction::Left),
                (&config.key_right, Direction::Right),
            ];
            for (name, direction) in keys {
                if name.trim().is_empty() {
                    continue;
                }
                let code = parse_key(name).ok_or_else(|| {
                    GameError::InvalidConfiguration(format!(
                        "player {:?}: unknown key name {:?}",
                        config.name, name
                    ))
                })?;
                bindings.push(Binding {
                    source: InputSource::Keyboard(code),
                    player,
                    direction,
                });
            }

            let buttons = [
                (&config.controller_key_up, Direction::Up),
                (&config.controller_key_down, Direction::Down),
                (&config.controller_key_left, Direction::Left),
                (&config.controller_key_right, Direction::Right),
            ];
            for (name, direction) in buttons {
                if name.trim().is_empty() {
                    continue;
                }
                let button = name.trim().parse::<ControllerButton>().map_err(|_| {
                    GameError::InvalidConfiguration(format!(
                        "player {:?}: unknown controller button {:?}",
                        config.name, name
                    ))
                })?;
                bindings.push(Binding {
                    source: InputSource::Controller(button),
                    player,
                    direction,
                });
            }
        }

        Ok(Self { bindings })
    }

    pub fn handle_key_event(&self, key: KeyEvent) -> KeyAction {
        // Handle Ctrl+C
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return KeyAction::Quit;
        }
        if key.code == KeyCode::Esc {
            return KeyAction::Quit;
        }

        self.handle(InputSource::Keyboard(key.code))
    }

    pub fn handle_controller_button(&self, button: ControllerButton) -> KeyAction {
        self.handle(InputSource::Controller(button))
    }

    fn handle(&self, source: InputSource) -> KeyAction {
        let commands = self.resolve(source);
        if commands.is_empty() {
            KeyAction::None
        } else {
            KeyAction::Steer(commands)
        }
    }

    /// Commands for every binding matching `source`
    pub fn resolve(&self, source: InputSource) -> Vec<Command> {
        let source = normalize(source);
        self.bindings
            .iter()
            .filter(|binding| binding.source == source)
            .map(|binding| Command::Steer {
                player: binding.player,
                direction: binding.direction,
            })
            .collect()
    }
}

fn normalize(source: InputSource) -> InputSource {
    match source {
        InputSource::Keyboard(KeyCode::Char(c)) => {
            InputSource::Keyboard(KeyCode::Char(c.to_ascii_lowercase()))
        }
        other => other,
    }
}

/// Parse a configured key name such as `Up`, `W`, `Space` or `F3`
pub fn parse_key(name: &str) -> Option<KeyCode> {
    let name = name.trim();
    let lower = name.to_ascii_lowercase();

    let code = match lower.as_str() {
        "up" => KeyCode::Up,
        "down" => KeyCode::Down,
        "left" => KeyCode::Left,
        "right" => KeyCode::Right,
        "space" => KeyCode::Char(' '),
        "return" | "enter" => KeyCode::Enter,
        "tab" => KeyCode::Tab,
        "backspace" => KeyCode::Backspace,
        _ => {
            let mut chars = lower.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                (Some('f'), Some(_)) => {
                    let n: u8 = lower[1..].parse().ok()?;
                    if !(1..=12).contains(&n) {
                        return None;
                    }
                    KeyCode::F(n)
                }
                _ => return None,
            }
        }
    };

    Some(code)
}
