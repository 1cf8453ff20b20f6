//! Player, one viewing session: a source, its controllers and the pipeline.
//!
//! DESIGN
//! ======
//! The player is the only place the components meet. It owns one
//! `PanZoomController`, `RecordingController`, `ResolutionController` and
//! `FramePipeline`, and exposes three entry points for the host loop:
//!
//! - `handle_gesture` for pointer events (between ticks)
//! - `handle_command` for the control surface (buttons, keys, stdin)
//! - `tick` once per scheduling interval
//!
//! After every presented frame the measured frame size and fit-scale are fed
//! back into the pan/zoom controller, so the next gesture maps through the
//! geometry that is actually on screen. Recording is sized from the last
//! frame read, displayed or not.
//!
//! A resolution change aborts any in-flight drag and stops a running
//! recording: the drag's deltas and the video's frame size both belong to
//! the old dimensions. The next recording opens at the new size.
//!
//! ERROR HANDLING
//! ==============
//! Command failures come back as `PlayerError` with the component error
//! inside. None of them are fatal; the host logs them and keeps ticking.

#[cfg(test)]
#[path = "player_test.rs"]
mod player_test;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::controller::{Action, Command, PanZoomController};
use crate::device::{FrameSource, ImageSink, SourceError, VideoSink};
use crate::error::ErrorCode;
use crate::gesture::GestureEvent;
use crate::overlay::{AnchorCrosshair, FrameProcessor};
use crate::pipeline::{FramePipeline, PipelineSettings, TickOutcome};
use crate::recording::{RecordingController, RecordingError, RecordingSettings};
use crate::resolution::{ResolutionController, ResolutionError};
use crate::sink::now_local;
use crate::viewport::{Resolution, ViewportState};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PlayerError {
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Recording(#[from] RecordingError),
    #[error(transparent)]
    Resolution(#[from] ResolutionError),
    #[error("display area {0} has no pixels")]
    EmptyDisplay(Resolution),
}

impl ErrorCode for PlayerError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Source(e) => e.error_code(),
            Self::Recording(e) => e.error_code(),
            Self::Resolution(e) => e.error_code(),
            Self::EmptyDisplay(_) => "E_INVALID_COMMAND",
        }
    }
}

/// The control surface, one variant per button or key of a viewer window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "command", rename_all = "snake_case")]
pub enum ControlCommand {
    PlayStop,
    Reconnect,
    Disconnect,
    Crosshair,
    CustomProc,
    /// Three-zone zoom button; `fraction` is where it was pressed, `0..=1`.
    ZoomButton { fraction: f64 },
    ZoomIn,
    ZoomOut,
    ResetZoom,
    Snapshot,
    Record,
    Resolution { width: u32, height: u32 },
    /// The area available for the display image changed.
    Display { width: u32, height: u32 },
    Quit,
}

/// Whether the host loop should keep going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// The capabilities a session runs on.
pub struct Devices {
    pub source: Box<dyn FrameSource>,
    pub video_sink: Box<dyn VideoSink>,
    pub image_sink: Box<dyn ImageSink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSettings {
    /// Device ids to try, in order.
    pub camera_ids: Vec<u32>,
    /// Candidate resolutions offered for switching.
    pub resolutions: Vec<Resolution>,
    /// Requested right after the device opens.
    pub initial_resolution: Option<Resolution>,
    pub zoom_scale: f64,
    pub sticky: bool,
    pub display_area: Resolution,
    pub recording: RecordingSettings,
    pub snapshots: PipelineSettings,
}

// =============================================================================
// PLAYER
// =============================================================================

pub struct Player {
    view: PanZoomController,
    recorder: RecordingController,
    resolutions: ResolutionController,
    pipeline: FramePipeline,
    camera_ids: Vec<u32>,
    initial_resolution: Option<Resolution>,
    display_area: Resolution,
    last_frame_dims: Option<Resolution>,
}

impl Player {
    /// Build a session around `devices`. The source is not opened yet; see [`Player::start`].
    #[must_use]
    pub fn new(devices: Devices, settings: PlayerSettings) -> Self {
        let processor: Box<dyn FrameProcessor> = Box::new(AnchorCrosshair);
        Self {
            view: PanZoomController::new(settings.zoom_scale, settings.sticky),
            recorder: RecordingController::new(devices.video_sink, settings.recording),
            resolutions: ResolutionController::new(&settings.resolutions),
            pipeline: FramePipeline::new(devices.source, devices.image_sink, processor, settings.snapshots),
            camera_ids: settings.camera_ids,
            initial_resolution: settings.initial_resolution,
            display_area: settings.display_area,
            last_frame_dims: None,
        }
    }

    // --- Queries ---

    #[must_use]
    pub fn viewport(&self) -> ViewportState {
        self.view.viewport()
    }

    #[must_use]
    pub fn view(&self) -> &PanZoomController {
        &self.view
    }

    #[must_use]
    pub fn recorder(&self) -> &RecordingController {
        &self.recorder
    }

    #[must_use]
    pub fn resolutions(&self) -> &ResolutionController {
        &self.resolutions
    }

    #[must_use]
    pub fn pipeline(&self) -> &FramePipeline {
        &self.pipeline
    }

    pub fn pipeline_mut(&mut self) -> &mut FramePipeline {
        &mut self.pipeline
    }

    #[must_use]
    pub fn display_area(&self) -> Resolution {
        self.display_area
    }

    /// Window-title style summary: `Camera(0) zoom: 1.44`.
    #[must_use]
    pub fn status_line(&self) -> String {
        let id = self.pipeline.source().id().map_or_else(|| "?".to_string(), |id| id.to_string());
        format!("Camera({id}) zoom: {:.2}", self.view.viewport().zoom_factor)
    }

    // --- Lifecycle ---

    /// Open the first usable device and apply the initial resolution.
    pub fn start(&mut self) -> Result<u32, PlayerError> {
        let id = self.pipeline.source_mut().open(&self.camera_ids)?;
        info!(camera = id, "capture device opened");

        if let Some(resolution) = self.initial_resolution {
            if let Err(e) = self.change_resolution(resolution) {
                warn!(%resolution, error = %e, "initial resolution not applied");
            }
        }
        if self.resolutions.highlighted().is_none() {
            self.resolutions.sync_with_device(self.pipeline.source().resolution());
        }
        Ok(id)
    }

    /// Close the recording and the device. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        self.recorder.shutdown();
        let source = self.pipeline.source_mut();
        if source.is_open() {
            source.close();
            info!("capture device closed");
        }
    }

    // --- Input ---

    /// Feed one pointer event to the pan/zoom controller.
    pub fn handle_gesture(&mut self, event: GestureEvent) -> Vec<Action> {
        self.view.handle(event)
    }

    /// Execute one control command.
    pub fn handle_command(&mut self, command: ControlCommand) -> Result<Flow, PlayerError> {
        match command {
            ControlCommand::PlayStop => {
                self.pipeline.playing = !self.pipeline.playing;
                info!(playing = self.pipeline.playing, "play/stop");
            }
            ControlCommand::Reconnect => self.reconnect()?,
            ControlCommand::Disconnect => self.disconnect(),
            ControlCommand::Crosshair => {
                self.pipeline.crosshair = !self.pipeline.crosshair;
                info!(enabled = self.pipeline.crosshair, "centre crosshair");
            }
            ControlCommand::CustomProc => {
                self.pipeline.custom_processing = !self.pipeline.custom_processing;
                info!(enabled = self.pipeline.custom_processing, "custom processing");
            }
            ControlCommand::ZoomButton { fraction } => {
                self.view.zoom_button(fraction);
            }
            ControlCommand::ZoomIn => {
                self.view.zoom_in_center();
            }
            ControlCommand::ZoomOut => {
                self.view.zoom_out_center();
            }
            ControlCommand::ResetZoom => {
                self.view.execute(Command::Reset);
            }
            ControlCommand::Snapshot => self.recorder.request_snapshot(),
            ControlCommand::Record => self.toggle_recording()?,
            ControlCommand::Resolution { width, height } => self.change_resolution(Resolution::new(width, height))?,
            ControlCommand::Display { width, height } => {
                let area = Resolution::new(width, height);
                if area.is_empty() {
                    return Err(PlayerError::EmptyDisplay(area));
                }
                self.display_area = area;
                info!(display = %self.display_area, "display area changed");
            }
            ControlCommand::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // --- Per-tick ---

    /// Run one pipeline tick and feed its measurements back into the view.
    pub fn tick(&mut self) -> TickOutcome {
        let viewport = self.view.viewport();
        let outcome = self.pipeline.tick(&viewport, self.view.anchor(), &mut self.recorder, self.display_area);
        if let Some(frame_dims) = outcome.frame_dims() {
            self.last_frame_dims = Some(frame_dims);
        }
        if let TickOutcome::Presented(p) = &outcome {
            self.view.observe_frame(p.frame_dims, p.fit_scale);
            self.view.set_display_size(p.display.size());
            self.view.set_device_resolution(self.pipeline.source().resolution().unwrap_or(p.frame_dims));
        }
        outcome
    }

    // --- Operations ---

    /// Switch the device resolution and rescale the viewport to match.
    pub fn change_resolution(&mut self, resolution: Resolution) -> Result<(), PlayerError> {
        self.view.abort_gesture();
        let next = self.resolutions.change_resolution(self.pipeline.source_mut(), self.view.viewport(), resolution)?;
        self.view.replace_viewport(next);
        // the next frames come in the new size; a recording started before
        // the next tick must open at it
        self.last_frame_dims = Some(resolution);
        if self.recorder.stop().is_some() {
            info!(%resolution, "recording stopped by resolution change");
        }
        Ok(())
    }

    /// Close and reopen the device; every resolution option becomes selectable again.
    pub fn reconnect(&mut self) -> Result<(), PlayerError> {
        self.view.abort_gesture();
        let source = self.pipeline.source_mut();
        source.close();
        self.last_frame_dims = None;
        let id = source.open(&self.camera_ids)?;
        self.resolutions.reset_availability();
        self.last_frame_dims = self.pipeline.source().resolution();
        self.resolutions.sync_with_device(self.last_frame_dims);
        info!(camera = id, "capture device reconnected");
        Ok(())
    }

    /// Close the device; ticks are skipped until a reconnect.
    pub fn disconnect(&mut self) {
        self.view.abort_gesture();
        self.pipeline.source_mut().close();
        self.last_frame_dims = None;
        info!("capture device disconnected");
    }

    fn toggle_recording(&mut self) -> Result<(), PlayerError> {
        let fps = self.pipeline.source().fps();
        self.recorder.toggle(self.last_frame_dims, fps, now_local())?;
        Ok(())
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.shutdown();
    }
}
