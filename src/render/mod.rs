// Render module - the display side of the image cloud
pub mod animation;
pub mod fit;
pub mod log_renderer;
pub mod terminal;

pub use animation::{EasingType, Fade, FadeDirection};
pub use fit::{aspect_fit, FitAxis};
pub use log_renderer::LogRenderer;
pub use terminal::{Canvas, FramePacer, TerminalRenderer};

use crate::grid::PixelRect;
use crate::images::ImageRef;

/// Display backend for the cloud.
///
/// Both operations start a fade and return immediately; the scheduler never
/// waits for an animation to finish.
pub trait Renderer {
    /// Opaque reference to one shown image
    type Handle;

    /// Fade `image` into `rect` and return the handle to hide it later
    fn show_image(&mut self, rect: PixelRect, image: &ImageRef) -> Self::Handle;

    /// Fade the image out and dispose of it
    fn hide_image(&mut self, handle: Self::Handle);
}
