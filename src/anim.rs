//! Animation driver: time-based effects layered on projected geometry.
//!
//! Each animation is a pure function of progress `t ∈ [0, 1]` applied to a
//! snapshot of the object's state captured when the animation was requested,
//! never to previously mutated live state. Stepping is cooperative and
//! frame-driven: the session pumps [`Animation::step`] with the host's
//! frame timestamps, one step per display refresh.
//!
//! Animations are transient presentation effects. They never write back
//! into the immutable original geometry, so a resize that re-projects from
//! originals overrides any in-flight positional/scale/angle effect. After a
//! projection pass the session rebases active snapshots onto the newly
//! projected state so later frames animate in the new coordinate space;
//! opacity and revealed text are untouched by resize.

#[cfg(test)]
#[path = "anim_test.rs"]
mod anim_test;

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::{
    BOUNCE_CYCLES, BOUNCE_HEIGHT_PX, PULSE_AMPLITUDE, PULSE_PERIOD_MS, ROTATE_IN_START_DEG,
    SLIDE_OFFSET_PX,
};
use crate::surface::Renderable;

/// Handle for one running animation, allocated by the session.
pub type AnimationId = u64;

/// Handle for one multi-field animation batch.
pub type BatchId = u64;

/// Errors raised when configuring an animation.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AnimationError {
    /// The persisted effect name does not match any supported kind.
    #[error("unknown animation kind: {0:?}")]
    UnknownKind(String),
    /// No live object is registered under the requested field id.
    #[error("no field registered with id {0:?}")]
    UnknownField(String),
}

/// Supported animation effects.
///
/// The serde/string form matches the effect names persisted in template
/// content (`"fadeIn"`, `"slideInLeft"`, ...).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationKind {
    /// Opacity ramp from zero to the snapshot opacity.
    FadeIn,
    /// Horizontal offset from the left that decays to zero.
    SlideInLeft,
    /// Horizontal offset from the right that decays to zero.
    SlideInRight,
    /// Vertical offset from above that decays to zero.
    SlideInTop,
    /// Vertical offset from below that decays to zero.
    SlideInBottom,
    /// Uniform scale growing from zero to the snapshot font size.
    ScaleIn,
    /// Rotation decaying from a full turn to the snapshot angle.
    RotateIn,
    /// Damped sinusoidal vertical offset.
    Bounce,
    /// Continuous sinusoidal font-size oscillation. Never converges and
    /// never reports completion; intended for looping attention effects.
    Pulse,
    /// Progressive character reveal of the snapshot text.
    Typewriter,
}

impl AnimationKind {
    /// Whether this kind loops forever instead of converging after the
    /// configured duration.
    #[must_use]
    pub fn is_looping(self) -> bool {
        matches!(self, Self::Pulse)
    }
}

impl FromStr for AnimationKind {
    type Err = AnimationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fadeIn" => Ok(Self::FadeIn),
            "slideInLeft" => Ok(Self::SlideInLeft),
            "slideInRight" => Ok(Self::SlideInRight),
            "slideInTop" => Ok(Self::SlideInTop),
            "slideInBottom" => Ok(Self::SlideInBottom),
            "scaleIn" => Ok(Self::ScaleIn),
            "rotateIn" => Ok(Self::RotateIn),
            "bounce" => Ok(Self::Bounce),
            "pulse" => Ok(Self::Pulse),
            "typewriter" => Ok(Self::Typewriter),
            other => Err(AnimationError::UnknownKind(other.to_string())),
        }
    }
}

/// Easing curve applied to raw progress before the effect is evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Easing {
    /// Identity.
    Linear,
    /// `1 - (1 - t)³`.
    #[default]
    EaseOutCubic,
    /// Quadratic ease-in-out.
    EaseInOutQuad,
}

impl Easing {
    /// Map raw progress to eased progress. Input is clamped to `[0, 1]`.
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::EaseOutCubic => 1.0 - (1.0 - t).powi(3),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(2) / 2.0
                }
            }
        }
    }
}

/// Configuration for one animation request.
#[derive(Debug, Clone, Copy)]
pub struct AnimationSpec {
    /// Which effect to run.
    pub kind: AnimationKind,
    /// Duration in milliseconds. A non-positive duration applies the final
    /// state on the first stepped frame.
    pub duration_ms: f64,
    /// Delay before the start timestamp is captured, in milliseconds.
    pub delay_ms: f64,
    /// Easing curve; defaults to ease-out-cubic.
    pub easing: Easing,
}

impl AnimationSpec {
    /// A spec with the given kind and duration, no delay, default easing.
    #[must_use]
    pub fn new(kind: AnimationKind, duration_ms: f64) -> Self {
        Self {
            kind,
            duration_ms,
            delay_ms: 0.0,
            easing: Easing::default(),
        }
    }

    /// Replace the delay.
    #[must_use]
    pub fn with_delay(mut self, delay_ms: f64) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    /// Replace the easing curve.
    #[must_use]
    pub fn with_easing(mut self, easing: Easing) -> Self {
        self.easing = easing;
        self
    }
}

/// The object state an animation was started from.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub left: f64,
    pub top: f64,
    pub font_size: f64,
    pub angle: f64,
    pub opacity: f64,
    pub text: String,
}

impl Snapshot {
    /// Capture the current live state of an object.
    #[must_use]
    pub fn capture(object: &dyn Renderable) -> Self {
        let (left, top) = object.position();
        Self {
            left,
            top,
            font_size: object.font_size(),
            angle: object.rotation(),
            opacity: object.opacity(),
            text: object.text(),
        }
    }
}

/// One running animation: an independent per-field state machine stepped by
/// the session's frame pump.
#[derive(Debug)]
pub struct Animation {
    id: AnimationId,
    field_id: String,
    spec: AnimationSpec,
    batch: Option<BatchId>,
    snapshot: Snapshot,
    /// Frame time at which the animation was first stepped.
    scheduled_at: Option<f64>,
    /// Frame time at which the delay elapsed and progress started.
    started_at: Option<f64>,
    finished: bool,
}

impl Animation {
    /// Create an animation over `snapshot` for the field `field_id`.
    #[must_use]
    pub fn new(
        id: AnimationId,
        field_id: String,
        spec: AnimationSpec,
        snapshot: Snapshot,
        batch: Option<BatchId>,
    ) -> Self {
        Self {
            id,
            field_id,
            spec,
            batch,
            snapshot,
            scheduled_at: None,
            started_at: None,
            finished: false,
        }
    }

    #[must_use]
    pub fn id(&self) -> AnimationId {
        self.id
    }

    /// The field this animation drives.
    #[must_use]
    pub fn field_id(&self) -> &str {
        &self.field_id
    }

    /// The batch this animation belongs to, if it was started as part of a
    /// multi-field orchestration.
    #[must_use]
    pub fn batch(&self) -> Option<BatchId> {
        self.batch
    }

    /// Whether the animation has reached its final state. Permanently false
    /// for looping kinds.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Rebase the geometric part of the snapshot onto the object's current
    /// live state. Called after a projection pass so subsequent frames
    /// animate in the new coordinate space. Opacity and text are kept: the
    /// projector never touches them.
    pub fn rebase(&mut self, object: &dyn Renderable) {
        let (left, top) = object.position();
        self.snapshot.left = left;
        self.snapshot.top = top;
        self.snapshot.font_size = object.font_size();
        self.snapshot.angle = object.rotation();
    }

    /// Advance the animation to frame time `now_ms` and apply the effect to
    /// `object`. Returns `true` exactly once, on the frame the animation
    /// completes.
    pub fn step(&mut self, now_ms: f64, object: &mut dyn Renderable) -> bool {
        if self.finished {
            return false;
        }
        let scheduled = *self.scheduled_at.get_or_insert(now_ms);
        if now_ms < scheduled + self.spec.delay_ms {
            return false;
        }
        let started = *self.started_at.get_or_insert(now_ms);
        let elapsed = now_ms - started;
        let raw = if self.spec.duration_ms <= 0.0 {
            1.0
        } else {
            (elapsed / self.spec.duration_ms).min(1.0)
        };
        let t = self.spec.easing.apply(raw);
        self.apply(t, elapsed, object);

        if raw >= 1.0 && !self.spec.kind.is_looping() {
            self.finished = true;
            return true;
        }
        false
    }

    /// Evaluate the effect at eased progress `t` against the snapshot.
    /// `elapsed_ms` is used only by looping kinds, which oscillate on wall
    /// time rather than converging on progress.
    fn apply(&self, t: f64, elapsed_ms: f64, object: &mut dyn Renderable) {
        let snap = &self.snapshot;
        match self.spec.kind {
            AnimationKind::FadeIn => {
                object.set_opacity(snap.opacity * t);
            }
            AnimationKind::SlideInLeft => {
                object.set_position(snap.left - SLIDE_OFFSET_PX * (1.0 - t), snap.top);
            }
            AnimationKind::SlideInRight => {
                object.set_position(snap.left + SLIDE_OFFSET_PX * (1.0 - t), snap.top);
            }
            AnimationKind::SlideInTop => {
                object.set_position(snap.left, snap.top - SLIDE_OFFSET_PX * (1.0 - t));
            }
            AnimationKind::SlideInBottom => {
                object.set_position(snap.left, snap.top + SLIDE_OFFSET_PX * (1.0 - t));
            }
            AnimationKind::ScaleIn => {
                object.set_font_size(snap.font_size * t);
            }
            AnimationKind::RotateIn => {
                object.set_rotation(snap.angle + ROTATE_IN_START_DEG * (1.0 - t));
            }
            AnimationKind::Bounce => {
                let offset = BOUNCE_HEIGHT_PX
                    * (1.0 - t)
                    * (t * BOUNCE_CYCLES * std::f64::consts::PI).sin().abs();
                object.set_position(snap.left, snap.top - offset);
            }
            AnimationKind::Pulse => {
                let phase = elapsed_ms / PULSE_PERIOD_MS * std::f64::consts::TAU;
                object.set_font_size(snap.font_size * (1.0 + PULSE_AMPLITUDE * phase.sin()));
            }
            AnimationKind::Typewriter => {
                object.set_text(&reveal(&snap.text, t));
            }
        }
    }
}

/// The first `floor(char_count * t)` characters of `text`, on character
/// boundaries.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
fn reveal(text: &str, t: f64) -> String {
    let count = text.chars().count();
    let visible = ((count as f64) * t.clamp(0.0, 1.0)).floor() as usize;
    text.chars().take(visible).collect()
}
