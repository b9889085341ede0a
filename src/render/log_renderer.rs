// Headless renderer - reports every fade through the log facade

use crate::grid::PixelRect;
use crate::images::ImageRef;
use crate::render::fit::{aspect_fit, FitAxis};
use crate::render::Renderer;
use log::{info, warn};
use std::collections::HashMap;
use std::time::Duration;

/// What the log renderer remembers about a shown image
#[derive(Debug, Clone, PartialEq)]
pub struct ShownImage {
    pub url: String,
    pub rect: PixelRect,
    pub fit: FitAxis,
}

pub struct LogRenderer {
    fade_duration: Duration,
    next_handle: u64,
    shown: HashMap<u64, ShownImage>,
}

impl LogRenderer {
    pub fn new(fade_duration: Duration) -> Self {
        Self {
            fade_duration,
            next_handle: 1,
            shown: HashMap::new(),
        }
    }

    /// Images currently on display
    pub fn shown(&self) -> &HashMap<u64, ShownImage> {
        &self.shown
    }
}

impl Renderer for LogRenderer {
    type Handle = u64;

    fn show_image(&mut self, rect: PixelRect, image: &ImageRef) -> u64 {
        let handle = self.next_handle;
        self.next_handle += 1;

        let fit = aspect_fit(image.dimensions, &rect);
        info!(
            "🖼️  Fade in #{} {} at {} (fit {:?}, {}ms)",
            handle,
            image.url,
            rect,
            fit,
            self.fade_duration.as_millis()
        );
        self.shown.insert(
            handle,
            ShownImage {
                url: image.url.clone(),
                rect,
                fit,
            },
        );
        handle
    }

    fn hide_image(&mut self, handle: u64) {
        match self.shown.remove(&handle) {
            Some(image) => info!(
                "🌫️  Fade out #{} {} at {} ({}ms)",
                handle,
                image.url,
                image.rect,
                self.fade_duration.as_millis()
            ),
            None => warn!("⚠️ Hide requested for unknown image #{}", handle),
        }
    }
}
