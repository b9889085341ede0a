// Display module for grid formatting and visualization
pub mod formatters;

// Re-export main functions
pub use formatters::{format_block_label, format_column_headers, format_occupancy, format_tiling};
