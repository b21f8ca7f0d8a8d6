use std::collections::{HashSet, VecDeque};

use super::action::Direction;
use super::config::Color;
use super::grid::{Cell, Grid};

/// A player's snake
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    pub name: String,
    pub color: Color,
    /// Body segments, tail at the front and head at the back
    pub segments: VecDeque<Cell>,
    /// Current direction of movement
    pub heading: Direction,
    pub alive: bool,
    pub score: u32,
}

impl Snake {
    /// Create a snake laid out from `tail` towards `heading`
    pub fn new(
        name: impl Into<String>,
        color: Color,
        tail: Cell,
        heading: Direction,
        length: usize,
        field_size: i32,
    ) -> Self {
        let segments = Self::layout(tail, heading, length, field_size).collect();
        Self {
            name: name.into(),
            color,
            segments,
            heading,
            alive: true,
            score: 0,
        }
    }

    /// Cells of a straight body of `length` segments starting at `tail`
    pub fn layout(
        tail: Cell,
        heading: Direction,
        length: usize,
        field_size: i32,
    ) -> impl Iterator<Item = Cell> {
        let (dx, dy) = heading.delta(field_size);
        (0..length as i32).map(move |i| tail.moved_by(dx * i, dy * i))
    }

    /// Get the head position
    pub fn head(&self) -> Cell {
        self.segments[self.segments.len() - 1]
    }

    /// Get the tail position
    pub fn tail(&self) -> Cell {
        self.segments[0]
    }

    pub fn occupies(&self, cell: Cell) -> bool {
        self.segments.contains(&cell)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Check if the snake has no segments (never happens for a spawned snake)
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

/// Class of a food item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FoodKind {
    Regular,
    Super,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FoodItem {
    pub cell: Cell,
    pub kind: FoodKind,
}

/// Fixed set of food slots; consumed slots are refilled, never removed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoodPool {
    items: Vec<FoodItem>,
}

impl FoodPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, cell: Cell, kind: FoodKind) {
        self.items.push(FoodItem { cell, kind });
    }

    /// Index of the first slot lying on `cell`
    pub fn slot_at(&self, cell: Cell) -> Option<usize> {
        self.items.iter().position(|item| item.cell == cell)
    }

    /// Move the item in `slot` to `cell`, keeping its kind
    pub fn relocate(&mut self, slot: usize, cell: Cell) -> FoodKind {
        let item = &mut self.items[slot];
        item.cell = cell;
        item.kind
    }

    pub fn contains(&self, cell: Cell) -> bool {
        self.slot_at(cell).is_some()
    }

    pub fn items(&self) -> &[FoodItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cells blocked for the whole round
pub type ObstacleSet = HashSet<Cell>;

/// Everything that changes during one round of play
#[derive(Debug, Clone, PartialEq)]
pub struct Round {
    pub grid: Grid,
    pub snakes: Vec<Snake>,
    pub food: FoodPool,
    pub obstacles: ObstacleSet,
    /// Ticks simulated so far
    pub ticks: u32,
}

impl Round {
    pub fn new(grid: Grid, snakes: Vec<Snake>, food: FoodPool, obstacles: ObstacleSet) -> Self {
        Self {
            grid,
            snakes,
            food,
            obstacles,
            ticks: 0,
        }
    }

    pub fn alive_count(&self) -> usize {
        self.snakes.iter().filter(|snake| snake.alive).count()
    }

    /// View of everything a newly placed item must avoid
    pub fn occupancy(&self) -> Occupancy<'_> {
        Occupancy {
            obstacles: &self.obstacles,
            food: &self.food,
            snakes: &self.snakes,
        }
    }
}

/// Borrowed view of the occupied cells of a round, possibly under construction
#[derive(Debug, Clone, Copy)]
pub struct Occupancy<'a> {
    pub obstacles: &'a ObstacleSet,
    pub food: &'a FoodPool,
    pub snakes: &'a [Snake],
}

impl Occupancy<'_> {
    pub fn is_occupied(&self, cell: Cell) -> bool {
        self.obstacles.contains(&cell)
            || self.food.contains(cell)
            || self.snakes.iter().any(|snake| snake.occupies(cell))
    }
}
