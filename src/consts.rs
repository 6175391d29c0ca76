//! Shared numeric constants for the card-canvas engine.

// ── Viewport fitting ────────────────────────────────────────────

/// Floor for the available container extent per axis, in pixels. Guards the
/// scale calculation against degenerate tiny containers during layout.
pub const MIN_AVAILABLE_PX: f64 = 240.0;

/// Default padding allowance subtracted from both container axes before
/// fitting, in pixels.
pub const DEFAULT_PADDING_PX: f64 = 48.0;

// ── Animation geometry ──────────────────────────────────────────

/// Slide-in travel distance, in viewport pixels.
pub const SLIDE_OFFSET_PX: f64 = 120.0;

/// Peak vertical offset of the bounce effect, in viewport pixels.
pub const BOUNCE_HEIGHT_PX: f64 = 30.0;

/// Number of half-oscillations a bounce performs over its duration.
pub const BOUNCE_CYCLES: f64 = 3.0;

/// Starting rotation of the rotate-in effect, in degrees.
pub const ROTATE_IN_START_DEG: f64 = 360.0;

/// Relative font-size swing of the pulse effect.
pub const PULSE_AMPLITUDE: f64 = 0.08;

/// Period of one full pulse oscillation, in milliseconds.
pub const PULSE_PERIOD_MS: f64 = 1000.0;

// ── Orchestration ───────────────────────────────────────────────

/// Default stagger between per-field start times in a multi-field
/// animation, in milliseconds.
pub const DEFAULT_STAGGER_MS: f64 = 150.0;
