// Image Cloud: animated mosaic of images tiled over a cell grid
// A grid is partitioned into random rectangular blocks, and one partition is
// swapped for the next, block by block, one paced step at a time.

pub mod config;
pub mod display;
pub mod errors;
pub mod grid;
pub mod images;
pub mod render;
pub mod scheduler;

pub use errors::{validate_cell_coordinates, MosaicError, MosaicResult};

// Re-export main types for convenience
pub use config::{
    BoxConfig, CloudConfig, GridConfig, ImageConfig, LayoutConfig, PlacementStrategy,
    TimingConfig,
};
pub use grid::{
    Block, BlockLayoutGenerator, Cell, CellGrid, CellRect, Direction, GridField, OccupancyGrid,
    PixelRect, Tiling,
};
pub use images::{ImageRef, ImageSource, JsonFileImages, StaticImages};
pub use render::{EasingType, LogRenderer, Renderer};
pub use scheduler::{Clock, SequentialQueue, ThreadClock, TilingScheduler, VirtualClock};
