//! Persisted template model and the schema-checked load boundary.
//!
//! Templates are authored in the admin editor and persisted as JSON. This
//! module defines that wire shape (`Template`, `TemplatePage`,
//! `TextFieldSpec`), validates it on read so malformed canvas data is
//! rejected at the edge rather than deep inside the projector, and defines
//! the two derived records the engine works with at runtime:
//! [`OriginalGeometry`] (the immutable design-space values every projection
//! reads from) and [`CustomizedData`] (the publish-time output handed back
//! to the host for persistence).

#[cfg(test)]
#[path = "template_test.rs"]
mod template_test;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Errors raised while loading or validating persisted template data.
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The JSON did not match the template schema.
    #[error("invalid template JSON: {0}")]
    Parse(#[from] serde_json::Error),
    /// The template contains no pages.
    #[error("template has no pages")]
    NoPages,
    /// A page's design-space canvas dimensions are not both positive.
    #[error("page {page}: canvas dimensions must be positive, got {width}x{height}")]
    InvalidCanvasSize { page: usize, width: f64, height: f64 },
    /// A text field's design-space font size is not positive.
    #[error("page {page}: field {id:?} has non-positive font size {font_size}")]
    InvalidFontSize { page: usize, id: String, font_size: f64 },
    /// Two fields on the same page share an id.
    #[error("page {page}: duplicate field id {id:?}")]
    DuplicateFieldId { page: usize, id: String },
}

/// A card template: one or more pages authored on fixed-size canvases.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    /// Identifier of the template row in the catalog.
    pub id: Uuid,
    /// Pages in presentation order.
    pub pages: Vec<TemplatePage>,
}

/// One page of a template.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePage {
    /// Reference to the background asset (CDN URL).
    pub image_url: String,
    /// Design-space canvas dimensions and text layout.
    pub canvas_data: CanvasData,
}

/// Design-space canvas dimensions and the ordered text layout of a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasData {
    /// Design-space width in pixels, fixed at authoring time.
    pub canvas_width: f64,
    /// Design-space height in pixels, fixed at authoring time.
    pub canvas_height: f64,
    /// Editable text regions in z-order.
    #[serde(default)]
    pub text_elements: Vec<TextFieldSpec>,
}

/// One editable text region as persisted in template content.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextFieldSpec {
    /// Stable identifier, unique within a page, never reused.
    pub id: String,
    /// Authored placeholder text.
    pub text: String,
    /// Design-space left edge in pixels.
    pub left: f64,
    /// Design-space top edge in pixels.
    pub top: f64,
    /// Design-space font size in pixels.
    pub font_size: f64,
    /// Font family name; must be loaded by the host before measurement.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// CSS font weight.
    #[serde(default = "default_font_weight")]
    pub font_weight: String,
    /// Fill color as a CSS color string.
    #[serde(default = "default_fill")]
    pub fill: String,
    /// Horizontal alignment within the wrap width.
    #[serde(default = "default_text_align")]
    pub text_align: String,
    /// Optional design-space wrap width in pixels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    /// Clockwise rotation in degrees.
    #[serde(default)]
    pub angle: f64,
    /// When true the end user may not edit the text content. Position and
    /// scale projection still apply.
    #[serde(default)]
    pub locked: bool,
}

fn default_font_family() -> String {
    "Arial".to_string()
}

fn default_font_weight() -> String {
    "normal".to_string()
}

fn default_fill() -> String {
    "#000000".to_string()
}

fn default_text_align() -> String {
    "left".to_string()
}

impl Template {
    /// Parse and validate a template from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the JSON does not match the schema or the
    /// parsed template fails [`Template::validate`].
    pub fn from_json(value: serde_json::Value) -> Result<Self, TemplateError> {
        let template: Template = serde_json::from_value(value)?;
        template.validate()?;
        Ok(template)
    }

    /// Parse and validate a template from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns `TemplateError` if the JSON does not match the schema or the
    /// parsed template fails [`Template::validate`].
    pub fn from_json_str(json: &str) -> Result<Self, TemplateError> {
        let template: Template = serde_json::from_str(json)?;
        template.validate()?;
        Ok(template)
    }

    /// Check the structural invariants the engine relies on: at least one
    /// page, positive canvas dimensions, positive font sizes, and field ids
    /// unique within each page.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a `TemplateError`.
    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.pages.is_empty() {
            return Err(TemplateError::NoPages);
        }
        for (index, page) in self.pages.iter().enumerate() {
            page.validate(index)?;
        }
        Ok(())
    }
}

impl TemplatePage {
    /// Validate one page's canvas dimensions and text fields. `page` is the
    /// page's index, used only for error reporting.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant as a `TemplateError`.
    pub fn validate(&self, page: usize) -> Result<(), TemplateError> {
        let canvas = &self.canvas_data;
        if canvas.canvas_width <= 0.0 || canvas.canvas_height <= 0.0 {
            return Err(TemplateError::InvalidCanvasSize {
                page,
                width: canvas.canvas_width,
                height: canvas.canvas_height,
            });
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for field in &canvas.text_elements {
            if field.font_size <= 0.0 {
                return Err(TemplateError::InvalidFontSize {
                    page,
                    id: field.id.clone(),
                    font_size: field.font_size,
                });
            }
            if !seen.insert(field.id.as_str()) {
                return Err(TemplateError::DuplicateFieldId {
                    page,
                    id: field.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// The page's design-space size.
    #[must_use]
    pub fn design_size(&self) -> crate::scale::Size {
        crate::scale::Size::new(self.canvas_data.canvas_width, self.canvas_data.canvas_height)
    }
}

/// Immutable design-space geometry of one field, captured once at load time.
///
/// Every projection recomputes live geometry from this record plus the
/// current scale factor, so repeated resizes never compound error. Never
/// mutated after capture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OriginalGeometry {
    /// Design-space left edge in pixels.
    pub left: f64,
    /// Design-space top edge in pixels.
    pub top: f64,
    /// Design-space font size in pixels.
    pub font_size: f64,
    /// Optional design-space wrap width in pixels.
    pub width: Option<f64>,
    /// Rotation in degrees. Scale-invariant: copied as-is on projection.
    pub angle: f64,
}

impl OriginalGeometry {
    /// Capture the design-space geometry of a persisted field.
    #[must_use]
    pub fn capture(spec: &TextFieldSpec) -> Self {
        Self {
            left: spec.left,
            top: spec.top,
            font_size: spec.font_size,
            width: spec.width,
            angle: spec.angle,
        }
    }
}

/// Publish-time output: the customized state the host persists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizedData {
    /// The template this customization was made from.
    pub template_id: Uuid,
    /// Final per-field text values, in template order.
    pub fields: Vec<CustomizedField>,
    /// Optional host-produced raster preview reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
}

/// Final text value of one field at publish time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizedField {
    /// The field's stable id.
    pub id: String,
    /// Text content as last edited by the end user.
    pub text: String,
}
