// Common trait for occupancy grids

use crate::config::GridConfig;
use crate::errors::{validate_cell_coordinates, MosaicResult};
use crate::grid::cell::{Cell, CellRect};

/// Common trait for grids that track which cells are occupied
pub trait CellGrid {
    /// Get the grid configuration
    fn config(&self) -> &GridConfig;

    /// Check a cell that is already known to be in bounds
    fn is_cell_free(&self, cell: Cell) -> bool;

    /// Get the number of occupied cells
    fn occupied_cells(&self) -> usize;

    /// Check if a cell is occupied
    fn is_cell_occupied(&self, row: usize, col: usize) -> MosaicResult<bool> {
        self.validate_coordinates(row, col)?;
        Ok(!self.is_cell_free(Cell::new(row, col)))
    }

    /// Validate coordinates against grid bounds
    fn validate_coordinates(&self, row: usize, col: usize) -> MosaicResult<()> {
        let config = self.config();
        validate_cell_coordinates(row, col, config.rows, config.cols)
    }

    fn in_bounds(&self, rect: &CellRect) -> bool {
        let config = self.config();
        let corner = rect.bottom_right();
        corner.row < config.rows && corner.col < config.cols
    }

    /// True iff the rectangle lies inside the grid and none of its cells
    /// are occupied. Never mutates the grid.
    fn is_free(&self, rect: &CellRect) -> bool {
        self.in_bounds(rect) && rect.cells().all(|cell| self.is_cell_free(cell))
    }
}
