//! Template coordinate/scale engine for the card customization editor.
//!
//! This crate owns the geometry core of the invitation-card editor: it loads
//! a template's design-space layout (a fixed authoring-time canvas with
//! absolutely positioned text fields), fits that design into whatever
//! viewport the host currently has, and drives the presentation-only text
//! animations layered on top. The surrounding storefront application is
//! responsible for persistence, asset/font loading, and wiring a concrete
//! rendering backend behind the [`surface`] traits.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`session`] | Top-level [`session::EditorSession`] lifecycle and frame pump |
//! | [`template`] | Persisted template model and the schema-checked load boundary |
//! | [`registry`] | Live-object / original-geometry registry keyed by field id |
//! | [`scale`] | Aspect-ratio-preserving design→viewport scale calculator |
//! | [`project`] | Coordinate projector from immutable originals to live objects |
//! | [`anim`] | Animation kinds, easing, and per-frame stepping |
//! | [`surface`] | Rendering-backend capability traits |
//! | [`consts`] | Shared numeric constants (fit floor, padding, amplitudes) |

pub mod anim;
pub mod consts;
pub mod project;
pub mod registry;
pub mod scale;
pub mod session;
pub mod surface;
pub mod template;

#[cfg(test)]
pub(crate) mod testutil;
