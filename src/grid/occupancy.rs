// Occupancy grid - plain R x C matrix of occupied flags

use crate::config::GridConfig;
use crate::grid::cell::{Cell, CellRect};
use crate::grid::traits::CellGrid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyGrid {
    config: GridConfig,
    grid: Vec<Vec<bool>>,
}

impl OccupancyGrid {
    pub fn new(config: GridConfig) -> Self {
        let grid = vec![vec![false; config.cols]; config.rows];
        Self { config, grid }
    }

    /// Mark every cell of `rect` occupied.
    ///
    /// The caller checks `is_free` first; occupying an occupied cell is a
    /// contract violation.
    pub fn occupy(&mut self, rect: &CellRect) {
        debug_assert!(self.is_free(rect), "occupying non-free rect {}", rect);
        for cell in rect.cells() {
            self.grid[cell.row][cell.col] = true;
        }
    }

    /// Mark every cell of `rect` free
    pub fn clear(&mut self, rect: &CellRect) {
        for cell in rect.cells() {
            self.grid[cell.row][cell.col] = false;
        }
    }

    /// Row-major list of free cells
    pub fn free_cells(&self) -> Vec<Cell> {
        self.grid
            .iter()
            .enumerate()
            .flat_map(|(row, grid_row)| {
                grid_row
                    .iter()
                    .enumerate()
                    .filter(|(_, occupied)| !**occupied)
                    .map(move |(col, _)| Cell::new(row, col))
            })
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.grid.iter().all(|row| row.iter().all(|occupied| *occupied))
    }
}

impl CellGrid for OccupancyGrid {
    fn config(&self) -> &GridConfig {
        &self.config
    }

    fn is_cell_free(&self, cell: Cell) -> bool {
        !self.grid[cell.row][cell.col]
    }

    fn occupied_cells(&self) -> usize {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .filter(|occupied| **occupied)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_occupy_and_clear() {
        let mut grid = OccupancyGrid::new(GridConfig::new(3, 3));
        let rect = CellRect::new(Cell::new(0, 0), Cell::new(1, 1));

        assert!(grid.is_free(&rect));
        grid.occupy(&rect);
        assert_eq!(grid.occupied_cells(), 4);
        assert!(!grid.is_free(&rect));
        assert!(!grid.is_free(&CellRect::single(Cell::new(1, 1))));
        assert!(grid.is_free(&CellRect::new(Cell::new(0, 2), Cell::new(2, 2))));
        assert_eq!(grid.free_cells().len(), 5);

        grid.clear(&rect);
        assert_eq!(grid.occupied_cells(), 0);
        assert!(!grid.is_full());
    }

    #[test]
    fn test_out_of_bounds_rect_is_not_free() {
        let grid = OccupancyGrid::new(GridConfig::new(2, 2));
        assert!(!grid.is_free(&CellRect::new(Cell::new(0, 0), Cell::new(2, 0))));
        assert!(grid.is_cell_occupied(5, 0).is_err());
        assert_eq!(grid.is_cell_occupied(1, 1).unwrap(), false);
    }

    #[test]
    fn test_is_free_does_not_mutate() {
        let mut grid = OccupancyGrid::new(GridConfig::new(4, 4));
        grid.occupy(&CellRect::new(Cell::new(1, 1), Cell::new(2, 3)));
        let before = grid.clone();
        for row in 0..4 {
            for col in 0..4 {
                let _ = grid.is_free(&CellRect::new(Cell::new(0, 0), Cell::new(row, col)));
            }
        }
        assert_eq!(grid, before);
    }
}
