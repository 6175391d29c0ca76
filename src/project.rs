//! Coordinate projector: design space → viewport space.
//!
//! Applies a previously computed scale factor to the live canvas state: the
//! drawing surface is resized to the scaled design dimensions, the
//! background rescaled to fill it exactly, and every registered text field
//! repositioned and resized from its immutable [`OriginalGeometry`]. Because
//! projection always reads from the originals and never from already-scaled
//! live values, it is idempotent and repeated resizes never compound error.
//!
//! [`OriginalGeometry`]: crate::template::OriginalGeometry

#[cfg(test)]
#[path = "project_test.rs"]
mod project_test;

use crate::registry::FieldRegistry;
use crate::scale::Size;
use crate::surface::Surface;

/// Project every registered field and the background from design space into
/// viewport space at `scale`.
///
/// Fields whose live object has been detached are skipped; the remaining
/// fields still project. The surface re-render is requested once at the end
/// of the pass, not per field.
pub fn apply_scale<S: Surface + ?Sized>(
    scale: f64,
    design: Size,
    surface: &mut S,
    registry: &mut FieldRegistry,
) {
    surface.resize(design.width * scale, design.height * scale);
    surface.scale_background(scale);

    let ids: Vec<String> = registry.ids().map(str::to_owned).collect();
    for id in ids {
        let Some(original) = registry.original(&id).copied() else {
            continue;
        };
        let Some(object) = registry.get_mut(&id) else {
            tracing::debug!(field = %id, "no live object for field, skipping projection");
            continue;
        };
        object.set_position(original.left * scale, original.top * scale);
        object.set_font_size(original.font_size * scale);
        object.set_wrap_width(original.width.map(|w| w * scale));
        // Rotation is scale-invariant: copied, never multiplied.
        object.set_rotation(original.angle);
    }

    surface.request_render();
}
