//! Scale calculator: fits a design-space canvas into a runtime viewport.
//!
//! Templates are authored once on a fixed-size abstract canvas (the design
//! space). At render time the host's container rarely matches that size, so
//! a single uniform scale factor maps design space to viewport space for the
//! whole page. The fit preserves aspect ratio and never upscales past 1.0,
//! so a template shown in a large viewport renders at its authored size.

#[cfg(test)]
#[path = "scale_test.rs"]
mod scale_test;

use crate::consts::MIN_AVAILABLE_PX;

/// A width/height pair in pixels, in either design or viewport space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Compute the uniform scale factor that fits `design` into `container`.
///
/// `padding` is subtracted from both container axes before fitting; each
/// available axis is floored at [`MIN_AVAILABLE_PX`] so a degenerate
/// container cannot collapse the scale to near zero. The result is
/// `min(availW / designW, availH / designH)` capped at 1.0 (never upscale).
///
/// Pure and deterministic. Positive design dimensions are a precondition,
/// enforced upstream at the template load boundary.
#[must_use]
pub fn compute_scale(design: Size, container: Size, padding: f64) -> f64 {
    let avail_w = (container.width - padding).max(MIN_AVAILABLE_PX);
    let avail_h = (container.height - padding).max(MIN_AVAILABLE_PX);
    (avail_w / design.width)
        .min(avail_h / design.height)
        .min(1.0)
}
