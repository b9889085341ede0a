// Display formatting utilities
// Everything returns a String so callers can route it through the log macros

use crate::config::GridConfig;
use crate::grid::{Cell, CellGrid, Tiling};
use std::fmt::Write;

/// Format a block index for display (last 2 digits in hex)
pub fn format_block_label(index: usize) -> String {
    let display_val = (index % 256) as u8;
    format!("{:2X}", display_val)
}

/// Column header line for a grid
pub fn format_column_headers(cols: usize) -> String {
    let mut line = String::from("    ");
    for col in 0..cols {
        let _ = write!(line, " {:2}", col);
    }
    line
}

/// Occupancy map: `##` for occupied cells, ` .` for free ones
pub fn format_occupancy<G: CellGrid + ?Sized>(grid: &G) -> String {
    let config = *grid.config();
    let mut out = format_column_headers(config.cols);
    out.push('\n');

    for row in 0..config.rows {
        let _ = write!(out, "{:2}: ", row);
        for col in 0..config.cols {
            if grid.is_cell_free(Cell::new(row, col)) {
                out.push_str("  .");
            } else {
                out.push_str(" ##");
            }
        }
        out.push('\n');
    }
    out
}

/// Tiling map: every cell shows the index of the block covering it.
/// Visible blocks are marked with `*`, uncovered cells with ` -`.
pub fn format_tiling<H>(tiling: &Tiling<H>, config: &GridConfig) -> String {
    let mut owners: Vec<Vec<Option<(usize, bool)>>> = vec![vec![None; config.cols]; config.rows];
    for (index, block) in tiling.blocks().iter().enumerate() {
        for cell in block.rect().cells() {
            if cell.row < config.rows && cell.col < config.cols {
                owners[cell.row][cell.col] = Some((index, block.is_visible()));
            }
        }
    }

    let mut out = format!(
        "=== TILING ({} x {}) - {} blocks ===\n",
        config.rows,
        config.cols,
        tiling.len()
    );
    out.push_str(&format_column_headers(config.cols));
    out.push('\n');

    for (row, grid_row) in owners.iter().enumerate() {
        let _ = write!(out, "{:2}: ", row);
        for owner in grid_row {
            match owner {
                Some((index, visible)) => {
                    let marker = if *visible { '*' } else { ' ' };
                    let _ = write!(out, "{}{}", marker, format_block_label(*index));
                }
                None => out.push_str("  -"),
            }
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{CellRect, OccupancyGrid};

    #[test]
    fn test_format_block_label() {
        assert_eq!(format_block_label(3), " 3");
        assert_eq!(format_block_label(26), "1A");
    }

    #[test]
    fn test_format_occupancy() {
        let mut grid = OccupancyGrid::new(GridConfig::new(2, 2));
        grid.occupy(&CellRect::single(Cell::new(0, 1)));
        let text = format_occupancy(&grid);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "      0  1");
        assert_eq!(lines[1], " 0:   . ##");
        assert_eq!(lines[2], " 1:   .  .");
    }

    #[test]
    fn test_format_tiling_marks_visible_blocks() {
        let config = GridConfig::new(1, 3);
        let mut tiling: Tiling<()> = Tiling::from_rects([
            CellRect::new(Cell::new(0, 0), Cell::new(0, 1)),
            CellRect::single(Cell::new(0, 2)),
        ]);
        if let Some(block) = tiling.block_mut(1) {
            block.show(());
        }
        let text = format_tiling(&tiling, &config);
        assert!(text.contains("2 blocks"));
        assert!(text.ends_with(" 0:   0  0* 1\n"));
    }
}
