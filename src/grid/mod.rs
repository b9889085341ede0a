// Grid module - cell geometry, occupancy tracking and layout generation

pub mod cell;
pub mod field;
pub mod layout;
pub mod occupancy;
pub mod traits;

// Re-export the main grid types for easy access
pub use cell::{Block, Cell, CellRect, PixelRect};
pub use field::GridField;
pub use layout::{expansion_strip, grow, BlockLayoutGenerator, Direction, Tiling};
pub use occupancy::OccupancyGrid;
pub use traits::CellGrid;

// Re-export common types used by all grids
pub use crate::config::GridConfig;
