//! In-memory rendering backend used by unit tests.
//!
//! `FakeField` and `FakeSurface` implement the [`surface`](crate::surface)
//! traits over plain struct fields so tests can drive projection and
//! animation synchronously and assert on the resulting state, without any
//! real rendering backend.

use crate::surface::{Renderable, Surface, SurfaceError};
use crate::template::TextFieldSpec;

/// A live text object recorded as plain fields.
#[derive(Debug, Clone)]
pub struct FakeField {
    pub left: f64,
    pub top: f64,
    pub font_size: f64,
    pub wrap_width: Option<f64>,
    pub rotation: f64,
    pub opacity: f64,
    pub content: String,
}

impl FakeField {
    pub fn from_spec(spec: &TextFieldSpec) -> Self {
        Self {
            left: spec.left,
            top: spec.top,
            font_size: spec.font_size,
            wrap_width: spec.width,
            rotation: spec.angle,
            opacity: 1.0,
            content: spec.text.clone(),
        }
    }

    pub fn at(left: f64, top: f64, font_size: f64) -> Self {
        Self {
            left,
            top,
            font_size,
            wrap_width: None,
            rotation: 0.0,
            opacity: 1.0,
            content: String::new(),
        }
    }
}

impl Renderable for FakeField {
    fn set_position(&mut self, left: f64, top: f64) {
        self.left = left;
        self.top = top;
    }

    fn set_font_size(&mut self, px: f64) {
        self.font_size = px;
    }

    fn set_wrap_width(&mut self, width: Option<f64>) {
        self.wrap_width = width;
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    fn set_text(&mut self, text: &str) {
        self.content = text.to_string();
    }

    fn position(&self) -> (f64, f64) {
        (self.left, self.top)
    }

    fn wrap_width(&self) -> Option<f64> {
        self.wrap_width
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn opacity(&self) -> f64 {
        self.opacity
    }

    fn text(&self) -> String {
        self.content.clone()
    }
}

/// A drawing surface recorded as plain fields.
#[derive(Debug, Default)]
pub struct FakeSurface {
    pub width: f64,
    pub height: f64,
    pub background_scale: f64,
    pub background_url: Option<String>,
    pub render_requests: usize,
    pub created_fields: Vec<String>,
    /// When set, `set_background` fails with this message.
    pub fail_background: Option<String>,
}

impl FakeSurface {
    pub fn new() -> Self {
        Self {
            background_scale: 1.0,
            ..Self::default()
        }
    }
}

impl Surface for FakeSurface {
    fn resize(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn scale_background(&mut self, scale: f64) {
        self.background_scale = scale;
    }

    fn set_background(&mut self, url: &str) -> Result<(), SurfaceError> {
        if let Some(message) = &self.fail_background {
            return Err(SurfaceError::BackgroundLoad(message.clone()));
        }
        self.background_url = Some(url.to_string());
        Ok(())
    }

    fn create_field(&mut self, spec: &TextFieldSpec) -> Box<dyn Renderable> {
        self.created_fields.push(spec.id.clone());
        Box::new(FakeField::from_spec(spec))
    }

    fn request_render(&mut self) {
        self.render_requests += 1;
    }
}
