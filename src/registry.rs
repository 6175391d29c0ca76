//! Text-field registry: live objects and their immutable originals.
//!
//! Two parallel maps keyed by field id: one holds the live renderable
//! object created by the rendering backend, the other the
//! [`OriginalGeometry`] captured at load time. Registration rejects
//! duplicate ids (a caller bug, never silently merged); text updates honor
//! the field's locked flag; lookups that miss are soft skips so partial
//! session state never aborts a whole pass.

#[cfg(test)]
#[path = "registry_test.rs"]
mod registry_test;

use std::collections::{HashMap, HashSet};

use crate::surface::Renderable;
use crate::template::OriginalGeometry;

/// Errors raised by registry mutations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The field id is already registered in this session. The first
    /// registration stays intact.
    #[error("field {0:?} is already registered")]
    DuplicateField(String),
}

/// Outcome of a text update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextUpdate {
    /// The live object's text was changed.
    Applied,
    /// The field is locked; the content was left unchanged.
    Locked,
    /// No live object is registered under that id.
    Missing,
}

/// Registry of live text objects and their design-space originals.
#[derive(Default)]
pub struct FieldRegistry {
    live: HashMap<String, Box<dyn Renderable>>,
    originals: HashMap<String, OriginalGeometry>,
    locked: HashSet<String>,
}

impl FieldRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a field's live object and its captured original geometry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::DuplicateField`] if `id` is already
    /// registered; the existing entries are left intact.
    pub fn register(
        &mut self,
        id: &str,
        object: Box<dyn Renderable>,
        original: OriginalGeometry,
        locked: bool,
    ) -> Result<(), RegistryError> {
        if self.originals.contains_key(id) || self.live.contains_key(id) {
            return Err(RegistryError::DuplicateField(id.to_string()));
        }
        self.live.insert(id.to_string(), object);
        self.originals.insert(id.to_string(), original);
        if locked {
            self.locked.insert(id.to_string());
        }
        Ok(())
    }

    /// The live object registered under `id`, if any.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&dyn Renderable> {
        self.live.get(id).map(|object| &**object)
    }

    /// Mutable access to the live object registered under `id`, if any.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut dyn Renderable> {
        Some(&mut **self.live.get_mut(id)?)
    }

    /// The captured original geometry for `id`, if any.
    #[must_use]
    pub fn original(&self, id: &str) -> Option<&OriginalGeometry> {
        self.originals.get(id)
    }

    /// Whether the field's content is protected from end-user edits.
    #[must_use]
    pub fn is_locked(&self, id: &str) -> bool {
        self.locked.contains(id)
    }

    /// Update a field's displayed text.
    ///
    /// Locked fields are a silent no-op ([`TextUpdate::Locked`]); missing
    /// ids are a soft skip ([`TextUpdate::Missing`]). Only
    /// [`TextUpdate::Applied`] means the live object changed.
    pub fn update_text(&mut self, id: &str, new_text: &str) -> TextUpdate {
        if self.locked.contains(id) {
            return TextUpdate::Locked;
        }
        match self.live.get_mut(id) {
            Some(object) => {
                object.set_text(new_text);
                TextUpdate::Applied
            }
            None => {
                tracing::debug!(field = %id, "text update for unregistered field, skipping");
                TextUpdate::Missing
            }
        }
    }

    /// Detach and return just the live object, keeping the original
    /// geometry. Projection skips the field until a live object is
    /// registered again.
    pub fn detach(&mut self, id: &str) -> Option<Box<dyn Renderable>> {
        self.live.remove(id)
    }

    /// Release both maps. Called on session teardown so disposed render
    /// objects are never referenced again.
    pub fn clear(&mut self) {
        self.live.clear();
        self.originals.clear();
        self.locked.clear();
    }

    /// Ids with a captured original geometry, in arbitrary order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.originals.keys().map(String::as_str)
    }

    /// Number of fields with a captured original geometry.
    #[must_use]
    pub fn len(&self) -> usize {
        self.originals.len()
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.originals.is_empty()
    }
}
