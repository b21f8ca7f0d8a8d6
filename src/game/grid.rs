use std::fmt;

use super::action::Direction;

/// A grid-aligned position, in pixels
///
/// Both coordinates are multiples of the grid's field size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move cell by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// What happens to a snake that runs off the edge of the arena
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BorderPolicy {
    /// Leaving the arena eliminates the snake
    Solid,
    /// Leaving the arena re-enters on the opposite side
    Wrap,
}

/// Rectangular arena of `width` x `height` pixels split into square cells
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: i32,
    pub height: i32,
    pub field_size: i32,
    pub border: BorderPolicy,
}

impl Grid {
    pub fn new(width: i32, height: i32, field_size: i32, border: BorderPolicy) -> Self {
        Self {
            width,
            height,
            field_size,
            border,
        }
    }

    /// Number of cells per row
    pub fn columns(&self) -> i32 {
        self.width / self.field_size
    }

    /// Number of cells per column
    pub fn rows(&self) -> i32 {
        self.height / self.field_size
    }

    pub fn cell_count(&self) -> usize {
        (self.columns().max(0) as usize) * (self.rows().max(0) as usize)
    }

    /// Check if a cell lies inside the arena
    pub fn contains(&self, cell: Cell) -> bool {
        cell.x >= 0 && cell.x < self.width && cell.y >= 0 && cell.y < self.height
    }

    /// Cell at column/row indices
    pub fn cell_at(&self, column: i32, row: i32) -> Cell {
        Cell::new(column * self.field_size, row * self.field_size)
    }

    /// The cell one step from `cell` in `direction`, after applying the border
    /// policy. `None` means the step left a solid arena.
    pub fn step(&self, cell: Cell, direction: Direction) -> Option<Cell> {
        let (dx, dy) = direction.delta(self.field_size);
        let next = cell.moved_by(dx, dy);

        match self.border {
            BorderPolicy::Solid => self.contains(next).then_some(next),
            BorderPolicy::Wrap => Some(Cell::new(
                wrap_axis(next.x, self.width, self.field_size),
                wrap_axis(next.y, self.height, self.field_size),
            )),
        }
    }
}

fn wrap_axis(value: i32, dimension: i32, field_size: i32) -> i32 {
    if value < 0 {
        dimension - field_size
    } else if value >= dimension {
        value - dimension
    } else {
        value
    }
}
