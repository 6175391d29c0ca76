//! The editing session: lifecycle, frame pump, and host event stream.
//!
//! One [`EditorSession`] exclusively owns the drawing surface and the live
//! object set for a single customization run. The host wires it to its
//! display-refresh scheduler by calling [`EditorSession::on_frame`] with a
//! monotonically increasing timestamp whenever [`EditorSession::needs_frame`]
//! is true, and processes the returned [`SessionEvent`]s. Everything is
//! single-threaded and cooperative: resize handling coalesces bursts to one
//! recomputation per frame (last resize wins), and each active animation is
//! an independent state machine stepped by the same pump.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use std::collections::HashMap;

use crate::anim::{Animation, AnimationError, AnimationId, AnimationSpec, BatchId, Snapshot};
use crate::consts::DEFAULT_PADDING_PX;
use crate::project;
use crate::registry::{FieldRegistry, RegistryError, TextUpdate};
use crate::scale::{Size, compute_scale};
use crate::surface::Surface;
use crate::template::{
    CustomizedData, CustomizedField, OriginalGeometry, Template, TemplateError, TemplatePage,
};

/// Errors surfaced synchronously by session operations.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// The template failed validation at the load boundary.
    #[error(transparent)]
    Template(#[from] TemplateError),
    /// A field could not be registered.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// An animation request was misconfigured.
    #[error(transparent)]
    Animation(#[from] AnimationError),
    /// The requested page index does not exist.
    #[error("page index {index} out of range ({pages} pages)")]
    PageOutOfRange { index: usize, pages: usize },
    /// The session has already been disposed.
    #[error("session has been disposed")]
    Disposed,
}

/// Notifications delivered to the host from the frame pump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A field's text content changed through [`EditorSession::update_text`].
    TextChanged { id: String },
    /// An individual animation reached its final state.
    AnimationFinished { id: AnimationId },
    /// Every animation in a batch reached its final state.
    AnimationBatchFinished { batch: BatchId },
    /// The background asset failed to load; the surface keeps its last
    /// valid state.
    BackgroundLoadFailed { message: String },
}

/// One card customization session over a validated template.
pub struct EditorSession<S: Surface> {
    surface: S,
    template: Template,
    active_page: usize,
    registry: FieldRegistry,
    design: Size,
    scale: f64,
    padding: f64,
    pending_resize: Option<Size>,
    last_container: Option<Size>,
    animations: Vec<Animation>,
    batches: HashMap<BatchId, usize>,
    events: Vec<SessionEvent>,
    next_animation_id: AnimationId,
    next_batch_id: BatchId,
    fonts_ready: bool,
    disposed: bool,
}

impl<S: Surface> std::fmt::Debug for EditorSession<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorSession").finish_non_exhaustive()
    }
}

impl<S: Surface> EditorSession<S> {
    /// Validate `template` and open an editing session on its first page.
    ///
    /// Live objects are created through [`Surface::create_field`] at their
    /// design-space geometry; the session starts at scale 1.0 until the
    /// host reports a container size via [`EditorSession::handle_resize`].
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Template` if validation fails. A background
    /// asset failure is not an error here; it surfaces as
    /// [`SessionEvent::BackgroundLoadFailed`] on the next frame.
    pub fn new(surface: S, template: Template) -> Result<Self, SessionError> {
        template.validate()?;
        let design = template
            .pages
            .first()
            .map(TemplatePage::design_size)
            .ok_or(TemplateError::NoPages)?;

        let mut session = Self {
            surface,
            template,
            active_page: 0,
            registry: FieldRegistry::new(),
            design,
            scale: 1.0,
            padding: DEFAULT_PADDING_PX,
            pending_resize: None,
            last_container: None,
            animations: Vec::new(),
            batches: HashMap::new(),
            events: Vec::new(),
            next_animation_id: 1,
            next_batch_id: 1,
            fonts_ready: false,
            disposed: false,
        };
        session.load_page(0)?;
        tracing::info!(
            template = %session.template.id,
            pages = session.template.pages.len(),
            fields = session.registry.len(),
            "editor session opened"
        );
        Ok(session)
    }

    /// Signal that the host's font loader has resolved. Animations do not
    /// step until this fires; geometry projection is unaffected (it does
    /// not measure text).
    pub fn fonts_ready(&mut self) {
        if !self.fonts_ready {
            self.fonts_ready = true;
            tracing::debug!("fonts ready, animations unblocked");
        }
    }

    /// Switch the session to another page of the template.
    ///
    /// Live fields of the old page are torn down, in-flight animations are
    /// discarded (their completions never fire), and the new page is
    /// projected at the scale derived from the last known container size.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Disposed` after disposal and
    /// `SessionError::PageOutOfRange` for an invalid index.
    pub fn set_active_page(&mut self, index: usize) -> Result<(), SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        if index >= self.template.pages.len() {
            return Err(SessionError::PageOutOfRange {
                index,
                pages: self.template.pages.len(),
            });
        }
        self.animations.clear();
        self.batches.clear();
        self.load_page(index)?;
        // Refit the new page's design space on the next frame.
        if let Some(container) = self.last_container {
            self.pending_resize = Some(container);
        }
        Ok(())
    }

    /// Record a container resize. Coalesced: only the most recent request
    /// is projected, at most once per frame.
    pub fn handle_resize(&mut self, container: Size) {
        if self.disposed {
            return;
        }
        self.pending_resize = Some(container);
        self.last_container = Some(container);
    }

    /// Update a field's text content on behalf of the end user.
    ///
    /// Locked fields and unknown ids are soft no-ops, reported through the
    /// returned [`TextUpdate`]. An applied update queues
    /// [`SessionEvent::TextChanged`] and requests a re-render.
    pub fn update_text(&mut self, id: &str, text: &str) -> TextUpdate {
        if self.disposed {
            return TextUpdate::Missing;
        }
        let outcome = self.registry.update_text(id, text);
        if outcome == TextUpdate::Applied {
            self.events.push(SessionEvent::TextChanged { id: id.to_string() });
            self.surface.request_render();
        }
        outcome
    }

    /// Start an animation on one field. The object's current state is
    /// snapshotted now; stepping begins on the next frame pump (after
    /// fonts are ready).
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Disposed` after disposal, or
    /// `SessionError::Animation` if no live object carries `field_id`.
    pub fn animate(
        &mut self,
        field_id: &str,
        spec: AnimationSpec,
    ) -> Result<AnimationId, SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        let Some(object) = self.registry.get(field_id) else {
            return Err(AnimationError::UnknownField(field_id.to_string()).into());
        };
        let snapshot = Snapshot::capture(object);
        let id = self.next_animation_id;
        self.next_animation_id += 1;
        self.animations
            .push(Animation::new(id, field_id.to_string(), spec, snapshot, None));
        Ok(id)
    }

    /// Start the same animation across several fields with a fixed stagger
    /// between start times. The batch completes — emitting
    /// [`SessionEvent::AnimationBatchFinished`] — only once every member
    /// has completed.
    ///
    /// # Errors
    ///
    /// Fails up front, before any member starts: `SessionError::Disposed`
    /// after disposal, or `SessionError::Animation` if any id has no live
    /// object.
    #[allow(clippy::cast_precision_loss)]
    pub fn animate_fields(
        &mut self,
        field_ids: &[&str],
        spec: AnimationSpec,
        stagger_ms: f64,
    ) -> Result<BatchId, SessionError> {
        if self.disposed {
            return Err(SessionError::Disposed);
        }
        for field_id in field_ids {
            if self.registry.get(field_id).is_none() {
                return Err(AnimationError::UnknownField((*field_id).to_string()).into());
            }
        }
        let batch = self.next_batch_id;
        self.next_batch_id += 1;

        if field_ids.is_empty() {
            self.events.push(SessionEvent::AnimationBatchFinished { batch });
            return Ok(batch);
        }
        for (index, field_id) in field_ids.iter().enumerate() {
            let Some(object) = self.registry.get(field_id) else {
                continue;
            };
            let snapshot = Snapshot::capture(object);
            let staggered = AnimationSpec {
                delay_ms: spec.delay_ms + stagger_ms * index as f64,
                ..spec
            };
            let id = self.next_animation_id;
            self.next_animation_id += 1;
            self.animations.push(Animation::new(
                id,
                (*field_id).to_string(),
                staggered,
                snapshot,
                Some(batch),
            ));
        }
        self.batches.insert(batch, field_ids.len());
        Ok(batch)
    }

    /// Cancel a running animation. Returns `true` if it was found.
    ///
    /// A cancelled member no longer blocks its batch: the batch completes
    /// once every remaining member has finished.
    pub fn cancel_animation(&mut self, id: AnimationId) -> bool {
        let Some(position) = self.animations.iter().position(|a| a.id() == id) else {
            return false;
        };
        let animation = self.animations.remove(position);
        if let Some(batch) = animation.batch() {
            self.settle_batch_member(batch);
        }
        true
    }

    /// Advance the session by one frame.
    ///
    /// Steps every active animation, then applies at most one pending
    /// resize projection, and returns the events produced since the last
    /// pump. A disposed session returns nothing, ever.
    pub fn on_frame(&mut self, now_ms: f64) -> Vec<SessionEvent> {
        if self.disposed {
            return Vec::new();
        }
        let mut events = std::mem::take(&mut self.events);

        if self.fonts_ready && !self.animations.is_empty() {
            let mut finished_batches: Vec<BatchId> = Vec::new();
            for animation in &mut self.animations {
                let Some(object) = self.registry.get_mut(animation.field_id()) else {
                    continue;
                };
                if animation.step(now_ms, object) {
                    events.push(SessionEvent::AnimationFinished { id: animation.id() });
                    if let Some(batch) = animation.batch() {
                        if let Some(remaining) = self.batches.get_mut(&batch) {
                            *remaining -= 1;
                            if *remaining == 0 {
                                finished_batches.push(batch);
                            }
                        }
                    }
                }
            }
            for batch in finished_batches {
                self.batches.remove(&batch);
                events.push(SessionEvent::AnimationBatchFinished { batch });
            }
            self.surface.request_render();
            self.animations.retain(|a| !a.is_finished());
        }

        // Projection runs last so a resize overrides, never blends with,
        // whatever geometry this frame's animations wrote.
        if let Some(container) = self.pending_resize.take() {
            self.scale = fit_container(self.design, container, self.padding);
            project::apply_scale(self.scale, self.design, &mut self.surface, &mut self.registry);
            // Later frames animate in the new coordinate space.
            for animation in &mut self.animations {
                if let Some(object) = self.registry.get(animation.field_id()) {
                    animation.rebase(object);
                }
            }
        }

        events
    }

    /// Whether the host should schedule another frame pump.
    #[must_use]
    pub fn needs_frame(&self) -> bool {
        !self.disposed
            && (self.pending_resize.is_some()
                || !self.animations.is_empty()
                || !self.events.is_empty())
    }

    /// Assemble the customized output the host persists at publish time.
    /// `preview` is an optional host-produced raster reference.
    ///
    /// Fields keep template order; a field whose live object was detached
    /// falls back to its authored text.
    #[must_use]
    pub fn publish(&self, preview: Option<String>) -> CustomizedData {
        let fields = self
            .template
            .pages
            .get(self.active_page)
            .map(|page| {
                page.canvas_data
                    .text_elements
                    .iter()
                    .map(|spec| CustomizedField {
                        id: spec.id.clone(),
                        text: self
                            .registry
                            .get(&spec.id)
                            .map_or_else(|| spec.text.clone(), |object| object.text()),
                    })
                    .collect()
            })
            .unwrap_or_default();
        CustomizedData {
            template_id: self.template.id,
            fields,
            preview,
        }
    }

    /// Tear the session down: discard pending work, in-flight animations
    /// (their completions never fire), and the registry. Idempotent.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.pending_resize = None;
        self.animations.clear();
        self.batches.clear();
        self.events.clear();
        self.registry.clear();
        tracing::info!(template = %self.template.id, "editor session disposed");
    }

    // --- Queries ---

    /// The scale factor applied by the most recent projection.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The active page's design-space size.
    #[must_use]
    pub fn design_size(&self) -> Size {
        self.design
    }

    /// Index of the active page.
    #[must_use]
    pub fn active_page(&self) -> usize {
        self.active_page
    }

    /// The current displayed text of a field, if its live object exists.
    #[must_use]
    pub fn field_text(&self, id: &str) -> Option<String> {
        self.registry.get(id).map(|object| object.text())
    }

    /// The field registry, for host introspection.
    #[must_use]
    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// The rendering surface, for host introspection.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Whether the host has signalled font readiness.
    #[must_use]
    pub fn is_fonts_ready(&self) -> bool {
        self.fonts_ready
    }

    /// Whether the session has been torn down.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Replace the padding allowance used when fitting the design into the
    /// container.
    pub fn set_padding(&mut self, padding: f64) {
        self.padding = padding;
    }

    // --- Internals ---

    /// Tear down the current page's fields and build the registry for
    /// `index`, then project at the current scale.
    fn load_page(&mut self, index: usize) -> Result<(), SessionError> {
        let Some(page) = self.template.pages.get(index) else {
            return Err(SessionError::PageOutOfRange {
                index,
                pages: self.template.pages.len(),
            });
        };
        self.registry.clear();
        for spec in &page.canvas_data.text_elements {
            let object = self.surface.create_field(spec);
            self.registry
                .register(&spec.id, object, OriginalGeometry::capture(spec), spec.locked)?;
        }
        self.active_page = index;
        self.design = page.design_size();
        self.scale = 1.0;
        project::apply_scale(self.scale, self.design, &mut self.surface, &mut self.registry);

        let url = page.image_url.clone();
        if let Err(err) = self.surface.set_background(&url) {
            tracing::warn!(error = %err, "background asset failed to load, keeping last valid state");
            self.events
                .push(SessionEvent::BackgroundLoadFailed { message: err.to_string() });
        }
        Ok(())
    }

    /// Account for one batch member that will never complete on its own.
    fn settle_batch_member(&mut self, batch: BatchId) {
        let finished = match self.batches.get_mut(&batch) {
            Some(remaining) => {
                *remaining -= 1;
                *remaining == 0
            }
            None => false,
        };
        if finished {
            self.batches.remove(&batch);
            self.events.push(SessionEvent::AnimationBatchFinished { batch });
        }
    }
}

/// Derive the projection scale for a container, falling back to the design
/// dimensions (scale 1.0) while the container reports no size during
/// initial layout.
fn fit_container(design: Size, container: Size, padding: f64) -> f64 {
    if container.width <= 0.0 || container.height <= 0.0 {
        return 1.0;
    }
    compute_scale(design, container, padding)
}
