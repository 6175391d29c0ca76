#![allow(clippy::float_cmp)]

use std::str::FromStr;

use super::*;
use crate::consts::{PULSE_AMPLITUDE, PULSE_PERIOD_MS, SLIDE_OFFSET_PX};
use crate::testutil::FakeField;

const EPSILON: f64 = 1e-9;

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

fn field() -> FakeField {
    let mut f = FakeField::at(100.0, 50.0, 40.0);
    f.content = "HELLO".to_string();
    f
}

fn linear(kind: AnimationKind, duration_ms: f64) -> AnimationSpec {
    AnimationSpec::new(kind, duration_ms).with_easing(Easing::Linear)
}

fn animation(kind: AnimationKind, duration_ms: f64, object: &FakeField) -> Animation {
    Animation::new(1, "f".to_string(), linear(kind, duration_ms), Snapshot::capture(object), None)
}

// =============================================================
// AnimationKind parsing / serde
// =============================================================

#[test]
fn kind_from_str_all_names() {
    let cases = [
        ("fadeIn", AnimationKind::FadeIn),
        ("slideInLeft", AnimationKind::SlideInLeft),
        ("slideInRight", AnimationKind::SlideInRight),
        ("slideInTop", AnimationKind::SlideInTop),
        ("slideInBottom", AnimationKind::SlideInBottom),
        ("scaleIn", AnimationKind::ScaleIn),
        ("rotateIn", AnimationKind::RotateIn),
        ("bounce", AnimationKind::Bounce),
        ("pulse", AnimationKind::Pulse),
        ("typewriter", AnimationKind::Typewriter),
    ];
    for (name, expected) in cases {
        assert_eq!(AnimationKind::from_str(name).expect("known kind"), expected);
    }
}

#[test]
fn kind_from_str_unknown_is_config_error() {
    let err = AnimationKind::from_str("sparkle").expect_err("unknown kind");
    assert_eq!(err, AnimationError::UnknownKind("sparkle".to_string()));
}

#[test]
fn kind_serde_matches_persisted_names() {
    let json = serde_json::to_string(&AnimationKind::SlideInLeft).expect("serialize");
    assert_eq!(json, "\"slideInLeft\"");
    let back: AnimationKind = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(back, AnimationKind::SlideInLeft);
}

#[test]
fn only_pulse_loops() {
    assert!(AnimationKind::Pulse.is_looping());
    assert!(!AnimationKind::FadeIn.is_looping());
    assert!(!AnimationKind::Bounce.is_looping());
}

// =============================================================
// Easing
// =============================================================

#[test]
fn linear_is_identity() {
    assert_eq!(Easing::Linear.apply(0.0), 0.0);
    assert_eq!(Easing::Linear.apply(0.41), 0.41);
    assert_eq!(Easing::Linear.apply(1.0), 1.0);
}

#[test]
fn ease_out_cubic_endpoints_and_midpoint() {
    assert_eq!(Easing::EaseOutCubic.apply(0.0), 0.0);
    assert_eq!(Easing::EaseOutCubic.apply(1.0), 1.0);
    assert!(approx_eq(Easing::EaseOutCubic.apply(0.5), 0.875));
}

#[test]
fn ease_in_out_quad_endpoints_and_midpoint() {
    assert_eq!(Easing::EaseInOutQuad.apply(0.0), 0.0);
    assert_eq!(Easing::EaseInOutQuad.apply(1.0), 1.0);
    assert!(approx_eq(Easing::EaseInOutQuad.apply(0.5), 0.5));
}

#[test]
fn easing_clamps_out_of_range_progress() {
    assert_eq!(Easing::EaseOutCubic.apply(-1.0), 0.0);
    assert_eq!(Easing::EaseOutCubic.apply(2.0), 1.0);
}

#[test]
fn default_easing_is_ease_out_cubic() {
    assert_eq!(Easing::default(), Easing::EaseOutCubic);
}

// =============================================================
// Stepping / timing
// =============================================================

#[test]
fn fade_in_ramps_opacity_from_zero() {
    let mut object = field();
    let mut anim = animation(AnimationKind::FadeIn, 400.0, &object);

    anim.step(0.0, &mut object);
    assert_eq!(object.opacity, 0.0);

    anim.step(200.0, &mut object);
    assert!(approx_eq(object.opacity, 0.5));

    let finished = anim.step(400.0, &mut object);
    assert!(finished);
    assert_eq!(object.opacity, 1.0);
}

#[test]
fn step_reports_completion_exactly_once() {
    let mut object = field();
    let mut anim = animation(AnimationKind::FadeIn, 100.0, &object);

    anim.step(0.0, &mut object);
    assert!(anim.step(100.0, &mut object));
    assert!(anim.is_finished());
    assert!(!anim.step(200.0, &mut object));
}

#[test]
fn zero_duration_applies_final_state_on_first_frame() {
    let mut object = field();
    let mut anim = animation(AnimationKind::FadeIn, 0.0, &object);

    let finished = anim.step(0.0, &mut object);
    assert!(finished);
    assert_eq!(object.opacity, 1.0);
}

#[test]
fn negative_duration_applies_final_state_on_first_frame() {
    let mut object = field();
    let mut anim = animation(AnimationKind::Typewriter, -5.0, &object);

    assert!(anim.step(7.0, &mut object));
    assert_eq!(object.content, "HELLO");
}

#[test]
fn delay_defers_the_start_timestamp() {
    let mut object = field();
    let spec = linear(AnimationKind::FadeIn, 100.0).with_delay(50.0);
    let mut anim = Animation::new(1, "f".to_string(), spec, Snapshot::capture(&object), None);

    // First pump at t=0 schedules the animation; nothing applied yet.
    assert!(!anim.step(0.0, &mut object));
    assert_eq!(object.opacity, 1.0);

    // Still inside the delay window.
    assert!(!anim.step(49.0, &mut object));
    assert_eq!(object.opacity, 1.0);

    // Delay elapsed: this frame captures the start timestamp, progress 0.
    assert!(!anim.step(50.0, &mut object));
    assert_eq!(object.opacity, 0.0);

    // Progress is measured from the captured start, not from scheduling.
    assert!(!anim.step(100.0, &mut object));
    assert!(approx_eq(object.opacity, 0.5));

    assert!(anim.step(150.0, &mut object));
    assert_eq!(object.opacity, 1.0);
}

#[test]
fn start_is_relative_to_first_step_not_construction() {
    let mut object = field();
    let mut anim = animation(AnimationKind::FadeIn, 100.0, &object);

    // First pump happens late; progress starts there.
    assert!(!anim.step(10_000.0, &mut object));
    assert_eq!(object.opacity, 0.0);
    assert!(anim.step(10_100.0, &mut object));
}

// =============================================================
// Effects
// =============================================================

#[test]
fn slide_in_left_decays_to_snapshot_position() {
    let mut object = field();
    let mut anim = animation(AnimationKind::SlideInLeft, 200.0, &object);

    anim.step(0.0, &mut object);
    assert!(approx_eq(object.left, 100.0 - SLIDE_OFFSET_PX));
    assert_eq!(object.top, 50.0);

    anim.step(100.0, &mut object);
    assert!(approx_eq(object.left, 100.0 - SLIDE_OFFSET_PX * 0.5));

    anim.step(200.0, &mut object);
    assert_eq!((object.left, object.top), (100.0, 50.0));
}

#[test]
fn slide_in_right_starts_offset_positive() {
    let mut object = field();
    let mut anim = animation(AnimationKind::SlideInRight, 200.0, &object);
    anim.step(0.0, &mut object);
    assert!(approx_eq(object.left, 100.0 + SLIDE_OFFSET_PX));
}

#[test]
fn slide_in_top_and_bottom_offset_vertically() {
    let mut object = field();
    let mut top = animation(AnimationKind::SlideInTop, 200.0, &object);
    top.step(0.0, &mut object);
    assert!(approx_eq(object.top, 50.0 - SLIDE_OFFSET_PX));
    top.step(200.0, &mut object);

    let mut bottom = animation(AnimationKind::SlideInBottom, 200.0, &object);
    bottom.step(0.0, &mut object);
    assert!(approx_eq(object.top, 50.0 + SLIDE_OFFSET_PX));
    bottom.step(200.0, &mut object);
    assert_eq!(object.top, 50.0);
}

#[test]
fn scale_in_grows_to_snapshot_font_size() {
    let mut object = field();
    let mut anim = animation(AnimationKind::ScaleIn, 200.0, &object);

    anim.step(0.0, &mut object);
    assert_eq!(object.font_size, 0.0);

    anim.step(100.0, &mut object);
    assert!(approx_eq(object.font_size, 20.0));

    anim.step(200.0, &mut object);
    assert_eq!(object.font_size, 40.0);
}

#[test]
fn rotate_in_decays_from_full_turn_to_original_angle() {
    let mut object = field();
    object.rotation = 15.0;
    let mut anim = animation(AnimationKind::RotateIn, 200.0, &object);

    anim.step(0.0, &mut object);
    assert!(approx_eq(object.rotation, 15.0 + 360.0));

    anim.step(200.0, &mut object);
    assert!(approx_eq(object.rotation, 15.0));
}

#[test]
fn bounce_returns_to_rest_at_completion() {
    let mut object = field();
    let mut anim = animation(AnimationKind::Bounce, 300.0, &object);

    anim.step(0.0, &mut object);
    anim.step(150.0, &mut object);
    // Mid-flight the field is at or above its rest position.
    assert!(object.top <= 50.0);

    anim.step(300.0, &mut object);
    assert_eq!(object.top, 50.0);
}

#[test]
fn pulse_never_finishes_and_keeps_oscillating() {
    let mut object = field();
    let mut anim = animation(AnimationKind::Pulse, 100.0, &object);

    anim.step(0.0, &mut object);
    assert!(!anim.is_finished());

    // Quarter period: sin peaks, font size at maximum swing.
    anim.step(PULSE_PERIOD_MS / 4.0, &mut object);
    assert!(approx_eq(object.font_size, 40.0 * (1.0 + PULSE_AMPLITUDE)));

    // Far past its nominal duration it is still running.
    assert!(!anim.step(10_000.0, &mut object));
    assert!(!anim.is_finished());
}

#[test]
fn typewriter_reveals_floor_of_progress_times_length() {
    let mut object = field();
    let mut anim = animation(AnimationKind::Typewriter, 100.0, &object);

    anim.step(0.0, &mut object);
    assert_eq!(object.content, "");

    // progress 0.41 over "HELLO": floor(5 * 0.41) = 2 -> "HE".
    anim.step(41.0, &mut object);
    assert_eq!(object.content, "HE");

    anim.step(100.0, &mut object);
    assert_eq!(object.content, "HELLO");
}

#[test]
fn typewriter_respects_char_boundaries() {
    let mut object = field();
    object.content = "héllo🎉".to_string();
    let mut anim = animation(AnimationKind::Typewriter, 100.0, &object);

    anim.step(0.0, &mut object);
    // 6 chars; progress 0.5 reveals 3.
    anim.step(50.0, &mut object);
    assert_eq!(object.content, "hél");

    anim.step(100.0, &mut object);
    assert_eq!(object.content, "héllo🎉");
}

// =============================================================
// Snapshot / rebase
// =============================================================

#[test]
fn snapshot_captures_live_state() {
    let mut object = field();
    object.rotation = 12.0;
    object.opacity = 0.5;
    let snap = Snapshot::capture(&object);
    assert_eq!(snap.left, 100.0);
    assert_eq!(snap.top, 50.0);
    assert_eq!(snap.font_size, 40.0);
    assert_eq!(snap.angle, 12.0);
    assert_eq!(snap.opacity, 0.5);
    assert_eq!(snap.text, "HELLO");
}

#[test]
fn rebase_updates_geometry_but_keeps_opacity_and_text() {
    let mut object = field();
    let mut anim = animation(AnimationKind::SlideInLeft, 200.0, &object);
    anim.step(0.0, &mut object);

    // A projection pass moved and rescaled the object.
    let mut projected = FakeField::at(45.2, 22.6, 18.08);
    projected.rotation = 5.0;
    projected.opacity = 0.25;
    projected.content = "changed".to_string();
    anim.rebase(&projected);

    // Completing the slide now lands on the projected position.
    anim.step(200.0, &mut object);
    assert!(approx_eq(object.left, 45.2));
    assert!(approx_eq(object.top, 22.6));
}

#[test]
fn accessors_expose_identity_and_batch() {
    let object = field();
    let spec = linear(AnimationKind::FadeIn, 100.0);
    let anim = Animation::new(7, "title".to_string(), spec, Snapshot::capture(&object), Some(3));
    assert_eq!(anim.id(), 7);
    assert_eq!(anim.field_id(), "title");
    assert_eq!(anim.batch(), Some(3));
    assert!(!anim.is_finished());
}
