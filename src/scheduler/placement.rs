// Block selection for the next add

use crate::config::PlacementStrategy;
use crate::grid::{Block, CellGrid};

/// Index of the hidden block with the largest area whose rectangle is free
/// in `grid`. Ties go to the block that comes first in sequence order.
pub fn largest_addable_block<H, G: CellGrid + ?Sized>(blocks: &[Block<H>], grid: &G) -> Option<usize> {
    let mut best: Option<(usize, usize)> = None;
    for (index, block) in blocks.iter().enumerate() {
        if block.is_visible() || !grid.is_free(&block.rect()) {
            continue;
        }
        let area = block.area();
        if best.map_or(true, |(_, best_area)| area > best_area) {
            best = Some((index, area));
        }
    }
    best.map(|(index, _)| index)
}

/// Index of the first hidden block whose rectangle is free in `grid`
pub fn first_addable_block<H, G: CellGrid + ?Sized>(blocks: &[Block<H>], grid: &G) -> Option<usize> {
    blocks
        .iter()
        .position(|block| !block.is_visible() && grid.is_free(&block.rect()))
}

/// Dispatch on the configured strategy
pub fn next_addable_block<H, G: CellGrid + ?Sized>(
    strategy: PlacementStrategy,
    blocks: &[Block<H>],
    grid: &G,
) -> Option<usize> {
    match strategy {
        PlacementStrategy::Largest => largest_addable_block(blocks, grid),
        PlacementStrategy::First => first_addable_block(blocks, grid),
    }
}
