//! Shared numeric constants for the camview crate.

// ── Zoom ────────────────────────────────────────────────────────

/// Multiplicative step applied by one wheel notch or zoom-button press.
pub const DEFAULT_ZOOM_SCALE: f64 = 1.2;

/// Lower bound of the user zoom factor (1.0 = whole frame visible).
pub const MIN_ZOOM_FACTOR: f64 = 1.0;

// ── Gestures ────────────────────────────────────────────────────

/// Manhattan path length, in display pixels, below which a press/release is a click.
pub const CLICK_THRESHOLD_PX: f64 = 10.0;

// ── Overlays ────────────────────────────────────────────────────

/// Half the arm length of the red centre crosshair, in frame pixels.
pub const CENTER_CROSS_HALF_PX: i64 = 10;

/// Half the arm length of the green anchor crosshair, in frame pixels.
pub const ANCHOR_CROSS_HALF_PX: i64 = 20;

/// Stroke width of both crosshairs, in frame pixels.
pub const CROSS_THICKNESS_PX: i64 = 2;

// ── Recording ───────────────────────────────────────────────────

/// Recording rate used when neither an override nor the device reports one.
pub const FALLBACK_RECORDING_FPS: f64 = 30.0;

/// Default scheduling interval of the frame pipeline, in milliseconds.
pub const DEFAULT_TICK_INTERVAL_MS: u64 = 10;
