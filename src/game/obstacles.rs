//! Obstacle maps
//!
//! An obstacle map is a bitmap with one pixel per grid cell. Pure black pixels
//! block the matching cell; every other colour leaves it free.

use std::path::Path;

use image::RgbaImage;

use super::error::{GameError, Result};
use super::grid::Grid;
use super::state::ObstacleSet;

/// Turn a decoded bitmap into the set of blocked cells
pub fn derive_obstacles(bitmap: &RgbaImage, grid: &Grid) -> Result<ObstacleSet> {
    let expected = (grid.columns() as u32, grid.rows() as u32);
    let found = bitmap.dimensions();
    if found != expected {
        return Err(GameError::InvalidObstacleImage { expected, found });
    }

    let obstacles = bitmap
        .enumerate_pixels()
        .filter(|(_, _, pixel)| {
            // alpha is ignored
            let [r, g, b, _] = pixel.0;
            r == 0 && g == 0 && b == 0
        })
        .map(|(x, y, _)| grid.cell_at(x as i32, y as i32))
        .collect();

    Ok(obstacles)
}

/// Decode the bitmap at `path` and derive its obstacles
pub fn load_obstacles(path: &Path, grid: &Grid) -> Result<ObstacleSet> {
    let bitmap = image::open(path)
        .map_err(|source| GameError::ObstacleImage {
            path: path.to_path_buf(),
            source,
        })?
        .to_rgba8();

    derive_obstacles(&bitmap, grid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grid::{BorderPolicy, Cell};
    use image::Rgba;

    fn grid() -> Grid {
        Grid::new(80, 60, 20, BorderPolicy::Solid)
    }

    fn blank() -> RgbaImage {
        RgbaImage::from_pixel(4, 3, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_black_pixels_become_obstacles() {
        let mut bitmap = blank();
        bitmap.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        bitmap.put_pixel(3, 2, Rgba([0, 0, 0, 255]));

        let obstacles = derive_obstacles(&bitmap, &grid()).unwrap();
        assert_eq!(obstacles.len(), 2);
        assert!(obstacles.contains(&Cell::new(0, 0)));
        assert!(obstacles.contains(&Cell::new(60, 40)));
    }

    #[test]
    fn test_alpha_is_ignored() {
        let mut bitmap = blank();
        bitmap.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        let obstacles = derive_obstacles(&bitmap, &grid()).unwrap();
        assert!(obstacles.contains(&Cell::new(20, 20)));
    }

    #[test]
    fn test_dark_but_not_black_is_free() {
        let mut bitmap = blank();
        bitmap.put_pixel(1, 1, Rgba([1, 0, 0, 255]));
        bitmap.put_pixel(2, 1, Rgba([0, 0, 1, 255]));

        assert!(derive_obstacles(&bitmap, &grid()).unwrap().is_empty());
    }

    #[test]
    fn test_dimension_mismatch() {
        let bitmap = RgbaImage::new(5, 3);
        let result = derive_obstacles(&bitmap, &grid());
        assert!(matches!(
            result,
            Err(GameError::InvalidObstacleImage {
                expected: (4, 3),
                found: (5, 3)
            })
        ));
    }

    #[test]
    fn test_load_png_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("map.png");
        let mut bitmap = blank();
        bitmap.put_pixel(2, 0, Rgba([0, 0, 0, 255]));
        bitmap.save(&path).unwrap();

        let obstacles = load_obstacles(&path, &grid()).unwrap();
        assert_eq!(obstacles.len(), 1);
        assert!(obstacles.contains(&Cell::new(40, 0)));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_obstacles(&dir.path().join("missing.png"), &grid());
        assert!(matches!(result, Err(GameError::ObstacleImage { .. })));
    }
}
