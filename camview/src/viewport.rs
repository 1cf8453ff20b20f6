//! Viewport transform: digital zoom/pan state and its coordinate math.
//!
//! DESIGN
//! ======
//! `ViewportState` is a `Copy` value. Every transform is a free function that
//! takes a state and returns the next one, so the controllers holding the
//! authoritative instance decide when a new value is committed and a failed
//! transform leaves the old value untouched.
//!
//! Three coordinate spaces are involved:
//! - display pixels: where pointer events land, the fit-scaled image;
//! - zoomed-frame pixels: display pixels divided by `fit_scale`;
//! - source-frame pixels: zoomed-frame pixels divided by `zoom_factor`, then
//!   shifted by the pan offset.
//!
//! INVARIANTS
//! ==========
//! `zoom_factor >= 1.0` and `0 <= offset <= dim - dim / zoom_factor` on each
//! axis. Every function below returns a state that satisfies both.

#[cfg(test)]
#[path = "viewport_test.rs"]
mod viewport_test;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::consts::MIN_ZOOM_FACTOR;
use crate::error::ErrorCode;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ViewportError {
    /// No frame has been captured yet (zero dimension or zero fit-scale).
    #[error("viewport not ready: no frame dimensions or fit-scale yet")]
    NotReady,
    /// The crop rectangle collapsed to zero pixels on an axis.
    #[error("empty crop rectangle {width}x{height} at ({x0}, {y0})")]
    EmptyCrop { x0: u32, y0: u32, width: u32, height: u32 },
}

impl ErrorCode for ViewportError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady => "E_NOT_READY",
            Self::EmptyCrop { .. } => "E_TRANSIENT_FRAME",
        }
    }
}

// =============================================================================
// GEOMETRY
// =============================================================================

/// A point in display or frame space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[must_use]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Integer pixel dimensions: a device resolution, a frame size or a display area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

impl Resolution {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero.
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid resolution '{0}' (expected WIDTHxHEIGHT)")]
pub struct ResolutionParseError(pub String);

impl FromStr for Resolution {
    type Err = ResolutionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ResolutionParseError(s.to_string());
        let (w, h) = s.trim().split_once(['x', 'X']).ok_or_else(bad)?;
        let width: u32 = w.trim().parse().map_err(|_| bad())?;
        let height: u32 = h.trim().parse().map_err(|_| bad())?;
        if width == 0 || height == 0 {
            return Err(bad());
        }
        Ok(Self { width, height })
    }
}

/// Pointer position expressed as a fraction of the frame dimensions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Anchor {
    pub fx: f64,
    pub fy: f64,
}

impl Anchor {
    #[must_use]
    pub fn new(fx: f64, fy: f64) -> Self {
        Self { fx, fy }
    }

    /// The anchor in pixel coordinates of a frame with the given size.
    #[must_use]
    pub fn to_pixel(self, frame: Resolution) -> (i64, i64) {
        (
            (f64::from(frame.width) * self.fx).floor() as i64,
            (f64::from(frame.height) * self.fy).floor() as i64,
        )
    }
}

/// Sub-rectangle of the source frame, in fractional source pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CropRect {
    pub x0: f64,
    pub y0: f64,
    pub w: f64,
    pub h: f64,
}

/// A crop rectangle snapped to whole pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x0: u32,
    pub y0: u32,
    pub width: u32,
    pub height: u32,
}

impl CropRect {
    /// Snap to integer pixel bounds inside `frame`.
    ///
    /// Both edges are floored, matching how a slice `[x0 as int .. (x0 + w) as int]`
    /// would cut the buffer. An empty result is an error because the resize
    /// that follows cannot work with it.
    pub fn to_pixels(&self, frame: Resolution) -> Result<PixelRect, ViewportError> {
        let x0 = (self.x0.max(0.0).floor() as u32).min(frame.width);
        let y0 = (self.y0.max(0.0).floor() as u32).min(frame.height);
        let x1 = ((self.x0 + self.w).max(0.0).floor() as u32).min(frame.width);
        let y1 = ((self.y0 + self.h).max(0.0).floor() as u32).min(frame.height);
        let width = x1.saturating_sub(x0);
        let height = y1.saturating_sub(y0);
        if width == 0 || height == 0 {
            return Err(ViewportError::EmptyCrop { x0, y0, width, height });
        }
        Ok(PixelRect { x0, y0, width, height })
    }
}

// =============================================================================
// STATE
// =============================================================================

/// Zoom/pan window over the raw frame.
///
/// `offset_x` / `offset_y` are in source-frame pixels.
/// `fit_scale` is the display-to-zoomed-frame ratio measured on the last tick;
/// 0.0 until the first frame has been displayed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportState {
    pub zoom_factor: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    pub frame_dims: Resolution,
    pub fit_scale: f64,
}

impl Default for ViewportState {
    fn default() -> Self {
        Self { zoom_factor: MIN_ZOOM_FACTOR, offset_x: 0.0, offset_y: 0.0, frame_dims: Resolution::default(), fit_scale: 0.0 }
    }
}

impl ViewportState {
    /// Whether any digital zoom is applied.
    #[must_use]
    pub fn is_zoomed(&self) -> bool {
        self.zoom_factor > MIN_ZOOM_FACTOR
    }

    /// Largest valid offset on each axis for the current zoom.
    #[must_use]
    pub fn max_offset(&self) -> (f64, f64) {
        let w = f64::from(self.frame_dims.width);
        let h = f64::from(self.frame_dims.height);
        ((w - w / self.zoom_factor).max(0.0), (h - h / self.zoom_factor).max(0.0))
    }

    fn ensure_ready(&self) -> Result<(), ViewportError> {
        if self.frame_dims.is_empty() || self.fit_scale <= 0.0 || !self.fit_scale.is_finite() {
            return Err(ViewportError::NotReady);
        }
        Ok(())
    }
}

fn clamp_axis(offset: f64, max: f64) -> f64 {
    if !offset.is_finite() {
        return 0.0;
    }
    offset.max(0.0).min(max)
}

/// Pull both offsets back into `[0, dim - dim / zoom]`.
#[must_use]
pub fn clamp_offsets(state: ViewportState) -> ViewportState {
    let (max_x, max_y) = state.max_offset();
    ViewportState { offset_x: clamp_axis(state.offset_x, max_x), offset_y: clamp_axis(state.offset_y, max_y), ..state }
}

// =============================================================================
// TRANSFORMS
// =============================================================================

/// The visible sub-rectangle of the frame.
pub fn compute_crop_rect(state: &ViewportState) -> Result<CropRect, ViewportError> {
    if state.frame_dims.is_empty() {
        return Err(ViewportError::NotReady);
    }
    Ok(CropRect {
        x0: state.offset_x,
        y0: state.offset_y,
        w: f64::from(state.frame_dims.width) / state.zoom_factor,
        h: f64::from(state.frame_dims.height) / state.zoom_factor,
    })
}

/// Zoom in by `scale`, keeping the frame point under `anchor` (display pixels) fixed.
pub fn anchored_zoom_in(state: ViewportState, anchor: Point, scale: f64) -> Result<ViewportState, ViewportError> {
    state.ensure_ready()?;
    let zoom_factor = state.zoom_factor * scale;
    let shift = (scale - 1.0) / state.fit_scale / zoom_factor;
    Ok(clamp_offsets(ViewportState {
        zoom_factor,
        offset_x: state.offset_x + anchor.x * shift,
        offset_y: state.offset_y + anchor.y * shift,
        ..state
    }))
}

/// Zoom out by `scale` (never below 1.0), keeping the point under `anchor` fixed.
///
/// `(1 - 1/scale) / new_zoom` equals `(scale - 1) / old_zoom`, so this undoes
/// [`anchored_zoom_in`] exactly when nothing was clamped.
pub fn anchored_zoom_out(state: ViewportState, anchor: Point, scale: f64) -> Result<ViewportState, ViewportError> {
    state.ensure_ready()?;
    let zoom_factor = (state.zoom_factor / scale).max(MIN_ZOOM_FACTOR);
    let shift = (1.0 - 1.0 / scale) / state.fit_scale / zoom_factor;
    Ok(clamp_offsets(ViewportState {
        zoom_factor,
        offset_x: state.offset_x - anchor.x * shift,
        offset_y: state.offset_y - anchor.y * shift,
        ..state
    }))
}

/// Back to the whole frame.
#[must_use]
pub fn reset(state: ViewportState) -> ViewportState {
    ViewportState { zoom_factor: MIN_ZOOM_FACTOR, offset_x: 0.0, offset_y: 0.0, ..state }
}

/// Shift the window opposite to a pointer motion of `(dx, dy)` display pixels.
///
/// With `sticky` the motion is divided by the zoom factor as well. Motion
/// past a bound is dropped; it is not remembered for the way back.
pub fn pan(state: ViewportState, dx: f64, dy: f64, sticky: bool) -> Result<ViewportState, ViewportError> {
    state.ensure_ready()?;
    let zoom = if sticky { state.zoom_factor } else { 1.0 };
    let k = 1.0 / zoom / state.fit_scale;
    Ok(clamp_offsets(ViewportState { offset_x: state.offset_x - dx * k, offset_y: state.offset_y - dy * k, ..state }))
}

/// Map a display position back onto the frame, as a fraction of its size.
///
/// Undoes, in order, the window fit (`display_size / device_resolution`),
/// the user zoom and the pan shift.
pub fn map_display_to_frame(
    display_px: Point,
    display_size: Resolution,
    device_resolution: Resolution,
    state: &ViewportState,
) -> Result<Anchor, ViewportError> {
    if display_size.is_empty() || device_resolution.is_empty() || state.frame_dims.is_empty() {
        return Err(ViewportError::NotReady);
    }
    let scale_w = f64::from(display_size.width) / f64::from(device_resolution.width);
    let scale_h = f64::from(display_size.height) / f64::from(device_resolution.height);

    let x = display_px.x / scale_w / state.zoom_factor + state.offset_x;
    let y = display_px.y / scale_h / state.zoom_factor + state.offset_y;

    Ok(Anchor { fx: x / f64::from(state.frame_dims.width), fy: y / f64::from(state.frame_dims.height) })
}

/// Record what the last tick observed: the raw frame size and the fit-scale.
///
/// Offsets are re-clamped because a different frame size moves the bounds.
#[must_use]
pub fn with_frame_metrics(state: ViewportState, frame_dims: Resolution, fit_scale: f64) -> ViewportState {
    clamp_offsets(ViewportState { frame_dims, fit_scale, ..state })
}

/// Keep the visible region proportionally identical across a resolution change.
///
/// The zoom factor is unchanged; offsets scale with each axis. With no
/// previous frame size there is nothing to scale and only the size is taken.
#[must_use]
pub fn rescale_for_resolution(state: ViewportState, new_dims: Resolution) -> ViewportState {
    if state.frame_dims.is_empty() {
        return clamp_offsets(ViewportState { frame_dims: new_dims, ..state });
    }
    let scale_x = f64::from(new_dims.width) / f64::from(state.frame_dims.width);
    let scale_y = f64::from(new_dims.height) / f64::from(state.frame_dims.height);
    clamp_offsets(ViewportState {
        offset_x: state.offset_x * scale_x,
        offset_y: state.offset_y * scale_y,
        frame_dims: new_dims,
        ..state
    })
}
