//! Random placement of food and snakes on free cells

use log::debug;
use rand::Rng;

use super::action::Direction;
use super::error::{GameError, Result};
use super::grid::{Cell, Grid};
use super::state::{Occupancy, Snake};

/// Upper bound on random draws before giving up
pub const MAX_PLACEMENT_ATTEMPTS: u32 = 10_000;

/// Draw a uniformly random grid cell
pub fn random_cell<R: Rng>(rng: &mut R, grid: &Grid) -> Cell {
    let column = rng.gen_range(0..grid.columns());
    let row = rng.gen_range(0..grid.rows());
    grid.cell_at(column, row)
}

/// Draw random cells until one is free of obstacles, food and snakes
pub fn sample_free_cell<R: Rng>(rng: &mut R, grid: &Grid, occupancy: Occupancy<'_>) -> Result<Cell> {
    sample_until(rng, grid, |cell| !occupancy.is_occupied(cell))
}

/// Pick the tail cell of a new snake so that its whole initial body is on
/// the grid and free
pub fn sample_spawn<R: Rng>(
    rng: &mut R,
    grid: &Grid,
    occupancy: Occupancy<'_>,
    heading: Direction,
    length: usize,
) -> Result<Cell> {
    sample_until(rng, grid, |tail| {
        Snake::layout(tail, heading, length, grid.field_size)
            .all(|cell| grid.contains(cell) && !occupancy.is_occupied(cell))
    })
}

fn sample_until<R, F>(rng: &mut R, grid: &Grid, accept: F) -> Result<Cell>
where
    R: Rng,
    F: Fn(Cell) -> bool,
{
    if grid.cell_count() > 0 {
        for attempt in 1..=MAX_PLACEMENT_ATTEMPTS {
            let cell = random_cell(rng, grid);
            if accept(cell) {
                debug!("placed at {} after {} attempt(s)", cell, attempt);
                return Ok(cell);
            }
        }
    }

    Err(GameError::PlacementExhausted {
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}
