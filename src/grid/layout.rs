// Layout - random partition of the grid into rectangular blocks

use crate::config::GridConfig;
use crate::errors::{MosaicError, MosaicResult};
use crate::grid::cell::{Block, Cell, CellRect};
use crate::grid::occupancy::OccupancyGrid;
use crate::grid::traits::CellGrid;
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::ops::RangeInclusive;

/// Edge of a rectangle that growth pushes outwards
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Uniformly random direction
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }
}

/// The strip of cells that growing `rect` one step in `direction` would add.
///
/// Returns `None` when the strip would start above row 0 or left of
/// column 0; the far edges are checked against the grid by the caller.
pub fn expansion_strip(rect: &CellRect, direction: Direction) -> Option<CellRect> {
    let top_left = rect.top_left();
    let bottom_right = rect.bottom_right();

    let (from, to) = match direction {
        Direction::Up => {
            let row = top_left.row.checked_sub(1)?;
            (Cell::new(row, top_left.col), Cell::new(row, bottom_right.col))
        }
        Direction::Down => {
            let row = bottom_right.row + 1;
            (Cell::new(row, top_left.col), Cell::new(row, bottom_right.col))
        }
        Direction::Left => {
            let col = top_left.col.checked_sub(1)?;
            (Cell::new(top_left.row, col), Cell::new(bottom_right.row, col))
        }
        Direction::Right => {
            let col = bottom_right.col + 1;
            (Cell::new(top_left.row, col), Cell::new(bottom_right.row, col))
        }
    };
    Some(CellRect::new(from, to))
}

/// Grow `rect` by one row or column in `direction`.
///
/// Returns the enlarged rectangle, or `None` when any newly covered cell is
/// out of bounds or occupied in `grid`.
pub fn grow<G: CellGrid + ?Sized>(
    rect: &CellRect,
    direction: Direction,
    grid: &G,
) -> Option<CellRect> {
    let strip = expansion_strip(rect, direction)?;
    if !grid.is_free(&strip) {
        return None;
    }

    let grown = match direction {
        Direction::Up | Direction::Left => CellRect::new(strip.top_left(), rect.bottom_right()),
        Direction::Down | Direction::Right => CellRect::new(rect.top_left(), strip.bottom_right()),
    };
    Some(grown)
}

/// An ordered set of blocks that partitions the grid.
///
/// The partition never changes after generation; only the blocks' display
/// state does.
#[derive(Debug, Clone, PartialEq)]
pub struct Tiling<H> {
    blocks: Vec<Block<H>>,
}

impl<H> Default for Tiling<H> {
    fn default() -> Self {
        Self { blocks: Vec::new() }
    }
}

impl<H> Tiling<H> {
    pub fn new(blocks: Vec<Block<H>>) -> Self {
        Self { blocks }
    }

    /// Tiling built from bare rectangles, all hidden
    pub fn from_rects<I: IntoIterator<Item = CellRect>>(rects: I) -> Self {
        Self::new(rects.into_iter().map(Block::new).collect())
    }

    pub fn blocks(&self) -> &[Block<H>] {
        &self.blocks
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block<H>> {
        self.blocks.get_mut(index)
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Index of the first visible block in sequence order
    pub fn first_visible(&self) -> Option<usize> {
        self.blocks.iter().position(|block| block.is_visible())
    }

    pub fn any_visible(&self) -> bool {
        self.blocks.iter().any(|block| block.is_visible())
    }

    pub fn any_hidden(&self) -> bool {
        self.blocks.iter().any(|block| !block.is_visible())
    }

    pub fn visible_count(&self) -> usize {
        self.blocks.iter().filter(|block| block.is_visible()).count()
    }

    /// Check that the blocks cover every cell of a `config` grid exactly once
    pub fn check_partition(&self, config: &GridConfig) -> MosaicResult<()> {
        let mut owner: Vec<Vec<Option<usize>>> = vec![vec![None; config.cols]; config.rows];

        for (index, block) in self.blocks.iter().enumerate() {
            let rect = block.rect();
            let corner = rect.bottom_right();
            if corner.row >= config.rows || corner.col >= config.cols {
                return Err(MosaicError::Partition(format!(
                    "block {} {} leaves the {}x{} grid",
                    index, rect, config.rows, config.cols
                )));
            }
            for cell in rect.cells() {
                if let Some(other) = owner[cell.row][cell.col].replace(index) {
                    return Err(MosaicError::Partition(format!(
                        "blocks {} and {} both cover cell {}",
                        other, index, cell
                    )));
                }
            }
        }

        for (row, grid_row) in owner.iter().enumerate() {
            for (col, cell_owner) in grid_row.iter().enumerate() {
                if cell_owner.is_none() {
                    return Err(MosaicError::Partition(format!(
                        "cell {} is not covered",
                        Cell::new(row, col)
                    )));
                }
            }
        }

        Ok(())
    }
}

/// Produces random tilings by seeding 1x1 blocks on free cells and growing
/// each one a random number of steps.
#[derive(Debug, Clone)]
pub struct BlockLayoutGenerator {
    config: GridConfig,
    growth_iterations: RangeInclusive<u32>,
}

impl BlockLayoutGenerator {
    pub fn new(config: GridConfig, growth_iterations: RangeInclusive<u32>) -> Self {
        Self {
            config,
            growth_iterations,
        }
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Generate a fresh tiling with every block hidden
    pub fn generate<H, R: Rng + ?Sized>(&self, rng: &mut R) -> Tiling<H> {
        let mut scratch = OccupancyGrid::new(self.config);
        let mut blocks = Vec::new();

        loop {
            let open = scratch.free_cells();
            let Some(&seed) = open.choose(rng) else {
                break;
            };

            let rect = self.grow_seed(seed, &scratch, rng);
            scratch.occupy(&rect);
            blocks.push(Block::new(rect));
        }

        debug!(
            "🧩 Generated {} blocks for {}x{} grid",
            blocks.len(),
            self.config.rows,
            self.config.cols
        );
        Tiling::new(blocks)
    }

    /// Grow a 1x1 seed for a random number of iterations. Rejected steps
    /// leave the rectangle as it was and still count as an iteration.
    fn grow_seed<R: Rng + ?Sized>(&self, seed: Cell, scratch: &OccupancyGrid, rng: &mut R) -> CellRect {
        let iterations = rng.gen_range(self.growth_iterations.clone());
        let mut rect = CellRect::single(seed);

        for _ in 0..iterations {
            let direction = Direction::random(rng);
            if let Some(grown) = grow(&rect, direction, scratch) {
                rect = grown;
            }
        }
        rect
    }
}
