// Aspect fit - which side of an image is stretched to the block

use crate::grid::PixelRect;

/// Blocks at least this much wider than tall always fit by width
pub const WIDE_BLOCK_RATIO: f64 = 1.6;

/// Block dimension an image is scaled to; the other side overflows and is
/// clipped, so the block is never letterboxed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FitAxis {
    Width,
    Height,
}

/// Fill the width for portrait images or for wide blocks, otherwise fill the
/// height. Images without known dimensions are treated as landscape.
pub fn aspect_fit(image: Option<(u32, u32)>, rect: &PixelRect) -> FitAxis {
    let portrait = image.map_or(false, |(width, height)| width < height);
    let wide_block = rect.height() > 0.0 && rect.width() / rect.height() >= WIDE_BLOCK_RATIO;
    if portrait || wide_block {
        FitAxis::Width
    } else {
        FitAxis::Height
    }
}
