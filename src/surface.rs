//! Rendering-backend capability traits.
//!
//! The projector and the animation driver never touch a concrete graphics
//! library. They speak to the backend through two small traits: one for the
//! drawing surface as a whole and one per live text object. A canvas-2d,
//! SVG, or headless backend plugs in by implementing these; the geometry
//! logic stays untouched.

use crate::template::TextFieldSpec;

/// Errors reported by the rendering backend.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// The background asset could not be fetched or decoded. The surface is
    /// expected to keep its last valid state.
    #[error("background asset failed to load: {0}")]
    BackgroundLoad(String),
}

/// One live renderable text object owned by the editing session.
///
/// Setters take viewport-space values; the projector and animation driver
/// compute those from design-space originals. Getters exist so animations
/// can snapshot the state they animate from.
pub trait Renderable {
    /// Move the object's top-left corner, in viewport pixels.
    fn set_position(&mut self, left: f64, top: f64);
    /// Set the rendered font size, in viewport pixels.
    fn set_font_size(&mut self, px: f64);
    /// Set or clear the wrap width, in viewport pixels.
    fn set_wrap_width(&mut self, width: Option<f64>);
    /// Set the clockwise rotation, in degrees.
    fn set_rotation(&mut self, degrees: f64);
    /// Set the opacity in `[0, 1]`.
    fn set_opacity(&mut self, opacity: f64);
    /// Replace the displayed text content.
    fn set_text(&mut self, text: &str);

    /// Current top-left position, in viewport pixels.
    fn position(&self) -> (f64, f64);
    /// Current wrap width, in viewport pixels, if any.
    fn wrap_width(&self) -> Option<f64>;
    /// Current rendered font size, in viewport pixels.
    fn font_size(&self) -> f64;
    /// Current rotation, in degrees.
    fn rotation(&self) -> f64;
    /// Current opacity.
    fn opacity(&self) -> f64;
    /// Current displayed text content.
    fn text(&self) -> String;
}

/// The drawing surface one editing session owns exclusively.
pub trait Surface {
    /// Resize the overall drawing surface, in viewport pixels.
    fn resize(&mut self, width: f64, height: f64);

    /// Uniformly scale the background image in both axes, anchored at the
    /// top-left origin, so it exactly fills the resized surface.
    fn scale_background(&mut self, scale: f64);

    /// Start displaying the background asset at `url`.
    ///
    /// # Errors
    ///
    /// Returns [`SurfaceError::BackgroundLoad`] if the asset cannot be
    /// loaded; the surface keeps its last valid state.
    fn set_background(&mut self, url: &str) -> Result<(), SurfaceError>;

    /// Create a live text object from a persisted field spec, positioned at
    /// its design-space geometry.
    fn create_field(&mut self, spec: &TextFieldSpec) -> Box<dyn Renderable>;

    /// Request a re-render of the surface. Callers batch: one request per
    /// projection pass, not one per field.
    fn request_render(&mut self);
}
