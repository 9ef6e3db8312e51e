//! The single scroll signal shared by every reactive consumer.
//!
//! There is exactly one writer (the page scroll listener or the host page via
//! the exported setter) and any number of readers. Everything runs on one
//! event loop, so a `Rc<Cell<f32>>` is enough: last write wins and readers
//! never block.

use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Debug, Default)]
pub struct ScrollSignal {
    progress: Rc<Cell<f32>>,
}

impl ScrollSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a new progress value, clamped into `[0, 1]`. NaN reads as 0.
    pub fn set(&self, progress: f32) {
        let p = if progress.is_nan() {
            0.0
        } else {
            progress.clamp(0.0, 1.0)
        };
        self.progress.set(p);
    }

    #[inline]
    pub fn get(&self) -> f32 {
        self.progress.get()
    }
}

/// Normalized progress for a scroll container.
///
/// `scroll_top` is the current offset, `scroll_height` the full content height
/// and `client_height` the visible height, all in CSS pixels.
pub fn scroll_progress(scroll_top: f64, scroll_height: f64, client_height: f64) -> f32 {
    let range = scroll_height - client_height;
    if range <= 0.0 || !range.is_finite() {
        return 0.0;
    }
    (scroll_top / range).clamp(0.0, 1.0) as f32
}

/// Output surface size in device pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Backing size for a CSS box scaled by `pixel_ratio`.
    pub fn from_css(css_width: f64, css_height: f64, pixel_ratio: f32) -> Self {
        let ratio = pixel_ratio.max(0.1) as f64;
        Self::new((css_width * ratio) as u32, (css_height * ratio) as u32)
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height.max(1) as f32
    }
}
