//! Gesture model: normalized pointer events and the press/drag/release tracker.
//!
//! The host UI layer turns whatever its toolkit reports into `GestureEvent`s
//! (display-pixel coordinates, origin top-left of the displayed image).
//! `GestureTracker` is the state carried between a press and its release: it
//! yields the per-move delta for panning and decides on release whether the
//! press was a click.

#[cfg(test)]
#[path = "gesture_test.rs"]
mod gesture_test;

use serde::{Deserialize, Serialize};

use crate::consts::CLICK_THRESHOLD_PX;
use crate::viewport::Point;

/// Wheel / trackpad scroll direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WheelDirection {
    /// Away from the user; zooms in.
    Up,
    /// Towards the user; zooms out.
    Down,
}

/// A pointer event as delivered by the host UI layer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GestureEvent {
    Click { x: f64, y: f64 },
    DoubleClick { x: f64, y: f64 },
    DragStart { x: f64, y: f64 },
    DragMove { x: f64, y: f64 },
    DragEnd { x: f64, y: f64 },
    Wheel { direction: WheelDirection, x: f64, y: f64 },
    MiddleClick,
}

impl GestureEvent {
    /// The display position carried by the event, if any.
    #[must_use]
    pub fn position(&self) -> Option<Point> {
        match *self {
            Self::Click { x, y }
            | Self::DoubleClick { x, y }
            | Self::DragStart { x, y }
            | Self::DragMove { x, y }
            | Self::DragEnd { x, y }
            | Self::Wheel { x, y, .. } => Some(Point::new(x, y)),
            Self::MiddleClick => None,
        }
    }
}

/// How a press ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Release {
    /// Travelled less than the click threshold.
    Click,
    /// Travelled at least the click threshold.
    Drag,
}

/// Press-to-release tracking for the primary button.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTracker {
    /// Display position of the previous press/move event.
    pub prev_x: f64,
    pub prev_y: f64,
    /// Manhattan distance travelled since the press.
    pub path_accum: f64,
}

impl GestureTracker {
    /// Start tracking at the press position.
    #[must_use]
    pub fn press(x: f64, y: f64) -> Self {
        Self { prev_x: x, prev_y: y, path_accum: 0.0 }
    }

    /// Record a move and return the delta since the previous move (not since the press).
    pub fn motion(&mut self, x: f64, y: f64) -> (f64, f64) {
        let dx = x - self.prev_x;
        let dy = y - self.prev_y;
        self.path_accum += dx.abs() + dy.abs();
        self.prev_x = x;
        self.prev_y = y;
        (dx, dy)
    }

    /// Classify the finished press.
    #[must_use]
    pub fn release(&self) -> Release {
        if self.path_accum < CLICK_THRESHOLD_PX { Release::Click } else { Release::Drag }
    }
}
