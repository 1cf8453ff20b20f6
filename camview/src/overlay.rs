//! Frame overlays and the pluggable per-frame processor.
//!
//! Overlays draw into the raw frame before it is recorded, so markers show up
//! in videos and snapshots, not only on screen.

#[cfg(test)]
#[path = "overlay_test.rs"]
mod overlay_test;

use crate::consts::{ANCHOR_CROSS_HALF_PX, CENTER_CROSS_HALF_PX, CROSS_THICKNESS_PX};
use crate::frame::FrameBuffer;
use crate::viewport::Anchor;

pub const RED: [u8; 3] = [255, 0, 0];
pub const GREEN: [u8; 3] = [0, 255, 0];

/// Custom per-frame processing strategy: `(frame, anchor) -> frame`.
///
/// `anchor` is the last click position, normalized to the frame.
pub trait FrameProcessor {
    fn process(&mut self, frame: FrameBuffer, anchor: Option<Anchor>) -> FrameBuffer;
}

impl<F> FrameProcessor for F
where
    F: FnMut(FrameBuffer, Option<Anchor>) -> FrameBuffer,
{
    fn process(&mut self, frame: FrameBuffer, anchor: Option<Anchor>) -> FrameBuffer {
        self(frame, anchor)
    }
}

/// Default processor: a green crosshair on the clicked point, or the centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct AnchorCrosshair;

impl FrameProcessor for AnchorCrosshair {
    fn process(&mut self, mut frame: FrameBuffer, anchor: Option<Anchor>) -> FrameBuffer {
        let size = frame.size();
        let center = anchor.map_or((i64::from(size.width / 2), i64::from(size.height / 2)), |a| a.to_pixel(size));
        draw_cross(&mut frame, center, ANCHOR_CROSS_HALF_PX, GREEN);
        frame
    }
}

/// The fixed red crosshair in the middle of the frame.
pub fn draw_center_cross(frame: &mut FrameBuffer) {
    let size = frame.size();
    draw_cross(frame, (i64::from(size.width / 2), i64::from(size.height / 2)), CENTER_CROSS_HALF_PX, RED);
}

/// Axis-aligned `+` with arms of `half` pixels, clipped to the frame.
pub fn draw_cross(frame: &mut FrameBuffer, (cx, cy): (i64, i64), half: i64, color: [u8; 3]) {
    let lo = -CROSS_THICKNESS_PX / 2;
    let hi = lo + CROSS_THICKNESS_PX;
    for t in lo..hi {
        for d in -half..=half {
            frame.put_rgb(cx + d, cy + t, color);
            frame.put_rgb(cx + t, cy + d, color);
        }
    }
}
