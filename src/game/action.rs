/// Heading of a snake on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// Returns the (dx, dy) step for a grid whose cells are `field_size` pixels wide
    pub fn delta(&self, field_size: i32) -> (i32, i32) {
        match self {
            Direction::Up => (0, -field_size),
            Direction::Down => (0, field_size),
            Direction::Left => (-field_size, 0),
            Direction::Right => (field_size, 0),
        }
    }
}

/// Command fed into the game controller between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Change the heading of the snake at `player`
    Steer { player: usize, direction: Direction },
    /// Start a new round (ignored while one is running)
    Start,
}
