// Display field - occupancy of the visible grid plus fixed per-cell pixel geometry

use crate::config::{BoxConfig, GridConfig};
use crate::errors::MosaicResult;
use crate::grid::cell::{Cell, CellRect, PixelRect};
use crate::grid::occupancy::OccupancyGrid;
use crate::grid::traits::CellGrid;

/// Tracks which cells are covered by visible blocks and where each cell
/// sits inside the display box.
///
/// The pixel geometry is derived once from the box configuration and never
/// changes for the lifetime of the field.
#[derive(Debug, Clone)]
pub struct GridField {
    occupancy: OccupancyGrid,
    pixels: Vec<Vec<PixelRect>>,
    cell_width: f64,
    cell_height: f64,
}

impl GridField {
    pub fn new(config: GridConfig, display: &BoxConfig) -> Self {
        let (cell_width, cell_height) = Self::cell_size(&config, display);
        let spacing = display.spacing;

        let pixels = (0..config.rows)
            .map(|row| {
                (0..config.cols)
                    .map(|col| {
                        let left = (cell_width + spacing) * col as f64 + spacing;
                        let top = (cell_height + spacing) * row as f64 + spacing;
                        PixelRect::new(left, top, left + cell_width, top + cell_height)
                    })
                    .collect()
            })
            .collect();

        Self {
            occupancy: OccupancyGrid::new(config),
            pixels,
            cell_width,
            cell_height,
        }
    }

    /// Size of a single cell once the spacing gutters are taken out
    fn cell_size(config: &GridConfig, display: &BoxConfig) -> (f64, f64) {
        let spacing = display.spacing;
        let width =
            (display.width - (config.cols as f64 + 1.0) * spacing).floor() / config.cols as f64;
        let height =
            (display.height - (config.rows as f64 + 1.0) * spacing).floor() / config.rows as f64;
        (width, height)
    }

    /// Mark every cell of `rect` occupied. Callers check `is_free` first.
    pub fn occupy(&mut self, rect: &CellRect) {
        self.occupancy.occupy(rect);
    }

    /// Mark every cell of `rect` free
    pub fn clear(&mut self, rect: &CellRect) {
        self.occupancy.clear(rect);
    }

    pub fn rows(&self) -> usize {
        self.occupancy.config().rows
    }

    pub fn cols(&self) -> usize {
        self.occupancy.config().cols
    }

    pub fn cell_width(&self) -> f64 {
        self.cell_width
    }

    pub fn cell_height(&self) -> f64 {
        self.cell_height
    }

    /// Pixel rectangle of one cell
    pub fn cell_pixels(&self, cell: Cell) -> MosaicResult<PixelRect> {
        self.validate_coordinates(cell.row, cell.col)?;
        Ok(self.pixels[cell.row][cell.col])
    }

    /// Pixel rectangle spanned by a block: from the upper-left corner of its
    /// top-left cell to the lower-right corner of its bottom-right cell
    pub fn pixel_rect(&self, rect: &CellRect) -> MosaicResult<PixelRect> {
        let upper_left = self.cell_pixels(rect.top_left())?;
        let lower_right = self.cell_pixels(rect.bottom_right())?;
        Ok(PixelRect::new(
            upper_left.left,
            upper_left.top,
            lower_right.right,
            lower_right.bottom,
        ))
    }

    pub fn occupancy(&self) -> &OccupancyGrid {
        &self.occupancy
    }
}

impl CellGrid for GridField {
    fn config(&self) -> &GridConfig {
        self.occupancy.config()
    }

    fn is_cell_free(&self, cell: Cell) -> bool {
        self.occupancy.is_cell_free(cell)
    }

    fn occupied_cells(&self) -> usize {
        self.occupancy.occupied_cells()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn seven_by_seven() -> GridField {
        GridField::new(
            GridConfig::new(7, 7),
            &BoxConfig {
                width: 300.0,
                height: 300.0,
                spacing: 5.0,
            },
        )
    }

    #[test]
    fn test_cell_pixels_tile_the_box() {
        let field = seven_by_seven();
        assert!((field.cell_width() - 260.0 / 7.0).abs() < EPS);

        let first = field.cell_pixels(Cell::new(0, 0)).unwrap();
        assert!((first.left - 5.0).abs() < EPS);
        assert!((first.top - 5.0).abs() < EPS);

        let last = field.cell_pixels(Cell::new(6, 6)).unwrap();
        assert!((last.right - 295.0).abs() < EPS);
        assert!((last.bottom - 295.0).abs() < EPS);

        // Every cell plus its spacing inset accounts for the whole box
        let covered: f64 = (0..7)
            .flat_map(|row| (0..7).map(move |col| Cell::new(row, col)))
            .map(|cell| field.cell_pixels(cell).unwrap().area())
            .sum();
        let gutters = 300.0 * 300.0 - covered;
        let expected_gutters = 300.0 * 300.0 - 260.0 * 260.0;
        assert!((gutters - expected_gutters).abs() < 1e-6);
    }

    #[test]
    fn test_adjacent_cells_do_not_overlap() {
        let field = seven_by_seven();
        for row in 0..7 {
            for col in 0..7 {
                let rect = field.cell_pixels(Cell::new(row, col)).unwrap();
                if col + 1 < 7 {
                    let right = field.cell_pixels(Cell::new(row, col + 1)).unwrap();
                    assert!(!rect.overlaps(&right));
                    assert!((right.left - rect.right - 5.0).abs() < EPS);
                }
                if row + 1 < 7 {
                    let below = field.cell_pixels(Cell::new(row + 1, col)).unwrap();
                    assert!(!rect.overlaps(&below));
                    assert!((below.top - rect.bottom - 5.0).abs() < EPS);
                }
            }
        }
    }

    #[test]
    fn test_block_pixel_rect_spans_gutters() {
        let field = seven_by_seven();
        let rect = CellRect::new(Cell::new(1, 2), Cell::new(2, 4));
        let pixels = field.pixel_rect(&rect).unwrap();
        let cell_w = 260.0 / 7.0;
        assert!((pixels.width() - (3.0 * cell_w + 2.0 * 5.0)).abs() < EPS);
        assert!((pixels.height() - (2.0 * cell_w + 5.0)).abs() < EPS);
        assert!(field
            .pixel_rect(&CellRect::single(Cell::new(7, 0)))
            .is_err());
    }

    #[test]
    fn test_non_square_box_uses_cols_for_width() {
        let field = GridField::new(
            GridConfig::new(2, 4),
            &BoxConfig {
                width: 425.0,
                height: 215.0,
                spacing: 5.0,
            },
        );
        assert!((field.cell_width() - 100.0).abs() < EPS);
        assert!((field.cell_height() - 100.0).abs() < EPS);
    }

    #[test]
    fn test_occupancy_through_field() {
        let mut field = seven_by_seven();
        let rect = CellRect::new(Cell::new(0, 0), Cell::new(2, 2));
        field.occupy(&rect);
        assert_eq!(field.occupied_cells(), 9);
        assert!(field.is_cell_occupied(2, 2).unwrap());
        assert!(!field.is_free(&CellRect::new(Cell::new(2, 2), Cell::new(3, 3))));
        field.clear(&rect);
        assert_eq!(field.occupied_cells(), 0);
    }
}
