//! Pan/zoom controller: pointer gestures in, viewport mutations out.
//!
//! DESIGN
//! ======
//! Events are first mapped to a `Command` by [`command_for`], a plain table
//! with no toolkit knowledge, then executed against the controller's
//! authoritative `ViewportState`. Each handler returns the `Action`s the host
//! should react to.
//!
//! A drag pans continuously from its first move. Classification on release
//! only decides whether an extra click fires; it never undoes the pan.
//!
//! ERROR HANDLING
//! ==============
//! Until the first frame has been displayed the transform has no dimensions
//! to work with. Gestures arriving then are logged at debug level and
//! dropped; the tracker still records motion so a drag that outlives the
//! warm-up keeps its path length.

#[cfg(test)]
#[path = "controller_test.rs"]
mod controller_test;

use tracing::debug;

use crate::consts::DEFAULT_ZOOM_SCALE;
use crate::gesture::{GestureEvent, GestureTracker, Release, WheelDirection};
use crate::viewport::{self, Anchor, Point, Resolution, ViewportError, ViewportState};

/// What a gesture asks the viewport to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    ZoomIn(Point),
    ZoomOut(Point),
    BeginDrag(Point),
    DragTo(Point),
    EndDrag(Point),
    Click(Point),
    ToggleFullScreen,
    Reset,
}

/// Event-to-command dispatch table.
#[must_use]
pub fn command_for(event: GestureEvent) -> Command {
    match event {
        GestureEvent::Wheel { direction: WheelDirection::Up, x, y } => Command::ZoomIn(Point::new(x, y)),
        GestureEvent::Wheel { direction: WheelDirection::Down, x, y } => Command::ZoomOut(Point::new(x, y)),
        GestureEvent::DragStart { x, y } => Command::BeginDrag(Point::new(x, y)),
        GestureEvent::DragMove { x, y } => Command::DragTo(Point::new(x, y)),
        GestureEvent::DragEnd { x, y } => Command::EndDrag(Point::new(x, y)),
        GestureEvent::Click { x, y } => Command::Click(Point::new(x, y)),
        GestureEvent::DoubleClick { .. } => Command::ToggleFullScreen,
        GestureEvent::MiddleClick => Command::Reset,
    }
}

/// Actions returned from gesture handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// The zoom/pan window moved; the next tick will show it.
    ViewportChanged(ViewportState),
    /// A click landed on the frame at this normalized position.
    AnchorSet(Anchor),
    /// Full-screen was toggled; carries the new flag.
    FullScreenToggled(bool),
}

/// Owns the authoritative viewport state and the in-flight gesture.
#[derive(Debug, Clone)]
pub struct PanZoomController {
    viewport: ViewportState,
    tracker: Option<GestureTracker>,
    anchor: Option<Anchor>,
    full_screen: bool,
    /// Size of the area the display image is shown in, in display pixels.
    display_size: Resolution,
    /// Resolution the capture device currently reports.
    device_resolution: Resolution,
    /// Sticky pan: the dragged point follows the pointer at any zoom.
    pub sticky: bool,
    pub zoom_scale: f64,
}

impl Default for PanZoomController {
    fn default() -> Self {
        Self {
            viewport: ViewportState::default(),
            tracker: None,
            anchor: None,
            full_screen: false,
            display_size: Resolution::default(),
            device_resolution: Resolution::default(),
            sticky: true,
            zoom_scale: DEFAULT_ZOOM_SCALE,
        }
    }
}

impl PanZoomController {
    #[must_use]
    pub fn new(zoom_scale: f64, sticky: bool) -> Self {
        Self { zoom_scale, sticky, ..Self::default() }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.viewport
    }

    /// Last clicked position, normalized to the frame.
    #[must_use]
    pub fn anchor(&self) -> Option<Anchor> {
        self.anchor
    }

    #[must_use]
    pub fn is_full_screen(&self) -> bool {
        self.full_screen
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.tracker.is_some()
    }

    // --- Host-supplied context ---

    pub fn set_display_size(&mut self, size: Resolution) {
        self.display_size = size;
    }

    pub fn set_device_resolution(&mut self, resolution: Resolution) {
        self.device_resolution = resolution;
    }

    /// Store what the last tick measured.
    pub fn observe_frame(&mut self, frame_dims: Resolution, fit_scale: f64) {
        self.viewport = viewport::with_frame_metrics(self.viewport, frame_dims, fit_scale);
    }

    /// Commit a state computed elsewhere (the resolution controller's rescale).
    pub fn replace_viewport(&mut self, state: ViewportState) {
        self.viewport = viewport::clamp_offsets(state);
    }

    /// Forget the in-flight press; later moves are ignored until the next press.
    pub fn abort_gesture(&mut self) {
        if self.tracker.take().is_some() {
            debug!("in-flight gesture aborted");
        }
    }

    // --- Gestures ---

    /// Handle one pointer event.
    pub fn handle(&mut self, event: GestureEvent) -> Vec<Action> {
        self.execute(command_for(event))
    }

    /// Execute a command against the viewport.
    pub fn execute(&mut self, command: Command) -> Vec<Action> {
        match command {
            Command::ZoomIn(at) => self.commit(viewport::anchored_zoom_in(self.viewport, at, self.zoom_scale)),
            Command::ZoomOut(at) => self.commit(viewport::anchored_zoom_out(self.viewport, at, self.zoom_scale)),
            Command::BeginDrag(at) => {
                self.tracker = Some(GestureTracker::press(at.x, at.y));
                Vec::new()
            }
            Command::DragTo(at) => {
                let Some(tracker) = self.tracker.as_mut() else {
                    return Vec::new();
                };
                let (dx, dy) = tracker.motion(at.x, at.y);
                self.commit(viewport::pan(self.viewport, dx, dy, self.sticky))
            }
            Command::EndDrag(at) => match self.tracker.take().map(|t| t.release()) {
                Some(Release::Click) => self.click(at),
                Some(Release::Drag) | None => Vec::new(),
            },
            Command::Click(at) => self.click(at),
            Command::ToggleFullScreen => {
                self.full_screen = !self.full_screen;
                debug!(full_screen = self.full_screen, "full screen toggled");
                vec![Action::FullScreenToggled(self.full_screen)]
            }
            Command::Reset => {
                debug!("zoom reset");
                self.commit(Ok(viewport::reset(self.viewport)))
            }
        }
    }

    // --- Zoom button ---

    /// Zoom in around the centre of the displayed image.
    pub fn zoom_in_center(&mut self) -> Vec<Action> {
        let center = self.display_center();
        self.execute(Command::ZoomIn(center))
    }

    /// Zoom out around the centre of the displayed image.
    pub fn zoom_out_center(&mut self) -> Vec<Action> {
        let center = self.display_center();
        self.execute(Command::ZoomOut(center))
    }

    /// A three-zone zoom control: left third zooms out, right third zooms in,
    /// the middle resets. `fraction` is the horizontal press position in `0..=1`.
    pub fn zoom_button(&mut self, fraction: f64) -> Vec<Action> {
        if fraction < 1.0 / 3.0 {
            self.zoom_out_center()
        } else if fraction > 2.0 / 3.0 {
            self.zoom_in_center()
        } else {
            self.execute(Command::Reset)
        }
    }

    fn display_center(&self) -> Point {
        let v = &self.viewport;
        Point::new(f64::from(v.frame_dims.width) * v.fit_scale / 2.0, f64::from(v.frame_dims.height) * v.fit_scale / 2.0)
    }

    fn click(&mut self, at: Point) -> Vec<Action> {
        match viewport::map_display_to_frame(at, self.display_size, self.device_resolution, &self.viewport) {
            Ok(anchor) => {
                debug!(fx = anchor.fx, fy = anchor.fy, "click anchor set");
                self.anchor = Some(anchor);
                vec![Action::AnchorSet(anchor)]
            }
            Err(e) => {
                debug!(error = %e, x = at.x, y = at.y, "click skipped");
                Vec::new()
            }
        }
    }

    fn commit(&mut self, next: Result<ViewportState, ViewportError>) -> Vec<Action> {
        match next {
            Ok(state) if state == self.viewport => Vec::new(),
            Ok(state) => {
                self.viewport = state;
                debug!(zoom = state.zoom_factor, offset_x = state.offset_x, offset_y = state.offset_y, "viewport changed");
                vec![Action::ViewportChanged(state)]
            }
            Err(e) => {
                debug!(error = %e, "gesture skipped");
                Vec::new()
            }
        }
    }
}
