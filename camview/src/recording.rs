//! Recording controller: video sink lifecycle and the one-shot snapshot trigger.
//!
//! DESIGN
//! ======
//! `Idle -> Recording -> Idle`. The sink is owned here and nowhere else; the
//! session data (path, fps, frame count) only exists inside
//! `RecordingState::Recording`, so "recording without an open sink" cannot be
//! represented.
//!
//! ERROR HANDLING
//! ==============
//! A sink that fails to open disables the start trigger for the rest of the
//! session; there is no automatic retry. Per-frame write failures are logged
//! and counted but never end the recording. The sink is closed on stop, on
//! `shutdown`, and from `Drop`, so every exit path releases it.

#[cfg(test)]
#[path = "recording_test.rs"]
mod recording_test;

use std::path::PathBuf;

use time::OffsetDateTime;
use tracing::{error, info, warn};

use crate::consts::FALLBACK_RECORDING_FPS;
use crate::device::{SinkError, VideoSink};
use crate::error::ErrorCode;
use crate::frame::FrameBuffer;
use crate::sink::video_file_name;
use crate::viewport::Resolution;

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum RecordingError {
    #[error("recording is disabled for this session after an earlier sink failure")]
    Disabled,
    #[error("no frame captured yet; frame size unknown")]
    NoFrameYet,
    #[error("failed to open video sink at {path}: {source}")]
    SinkOpen { path: PathBuf, source: SinkError },
}

impl ErrorCode for RecordingError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Disabled | Self::SinkOpen { .. } => "E_SINK_OPEN_FAILURE",
            Self::NoFrameYet => "E_NOT_READY",
        }
    }
}

/// Where and how recordings are written.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSettings {
    pub folder: PathBuf,
    /// Codec identifier handed to the sink (a fourcc such as `mp4v`).
    pub codec: String,
    /// Container extension, without the dot.
    pub video_ext: String,
    /// Fixed recording rate; the device-reported rate is used when `None`.
    pub fps_override: Option<f64>,
}

/// One open recording.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSession {
    pub output_path: PathBuf,
    pub fps: f64,
    pub frame_size: Resolution,
    pub frames_written: u64,
    pub write_failures: u64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum RecordingState {
    Idle,
    Recording(RecordingSession),
}

// =============================================================================
// CONTROLLER
// =============================================================================

pub struct RecordingController {
    sink: Box<dyn VideoSink>,
    settings: RecordingSettings,
    state: RecordingState,
    start_enabled: bool,
    snapshot_pending: bool,
}

impl RecordingController {
    #[must_use]
    pub fn new(sink: Box<dyn VideoSink>, settings: RecordingSettings) -> Self {
        Self { sink, settings, state: RecordingState::Idle, start_enabled: true, snapshot_pending: false }
    }

    // --- Queries ---

    #[must_use]
    pub fn state(&self) -> &RecordingState {
        &self.state
    }

    #[must_use]
    pub fn is_recording(&self) -> bool {
        matches!(self.state, RecordingState::Recording(_))
    }

    #[must_use]
    pub fn session(&self) -> Option<&RecordingSession> {
        match &self.state {
            RecordingState::Recording(session) => Some(session),
            RecordingState::Idle => None,
        }
    }

    /// Whether the start trigger is still available this session.
    #[must_use]
    pub fn can_start(&self) -> bool {
        self.start_enabled
    }

    #[must_use]
    pub fn settings(&self) -> &RecordingSettings {
        &self.settings
    }

    // --- Transitions ---

    /// Idle -> Recording. Starting while already recording is a no-op.
    pub fn start(
        &mut self,
        frame_size: Option<Resolution>,
        device_fps: Option<f64>,
        at: OffsetDateTime,
    ) -> Result<&RecordingSession, RecordingError> {
        if !self.is_recording() {
            self.open_session(frame_size, device_fps, at)?;
        }
        self.session().ok_or(RecordingError::NoFrameYet)
    }

    fn open_session(
        &mut self,
        frame_size: Option<Resolution>,
        device_fps: Option<f64>,
        at: OffsetDateTime,
    ) -> Result<(), RecordingError> {
        if !self.start_enabled {
            return Err(RecordingError::Disabled);
        }
        let frame_size = frame_size.filter(|s| !s.is_empty()).ok_or(RecordingError::NoFrameYet)?;
        let fps = self.recording_fps(device_fps);
        let output_path = self.settings.folder.join(video_file_name(at, &self.settings.video_ext));

        if let Err(source) = self.sink.open(&output_path, &self.settings.codec, fps, frame_size) {
            error!(path = %output_path.display(), error = %source, "creating video file failed; recording disabled");
            self.sink.close();
            self.start_enabled = false;
            return Err(RecordingError::SinkOpen { path: output_path, source });
        }

        info!(path = %output_path.display(), fps, size = %frame_size, codec = %self.settings.codec, "recording started");
        self.state = RecordingState::Recording(RecordingSession {
            output_path,
            fps,
            frame_size,
            frames_written: 0,
            write_failures: 0,
        });
        Ok(())
    }

    /// Recording -> Idle. Returns the finished session, if one was open.
    pub fn stop(&mut self) -> Option<RecordingSession> {
        let RecordingState::Recording(session) = std::mem::replace(&mut self.state, RecordingState::Idle) else {
            return None;
        };
        self.sink.close();
        info!(
            path = %session.output_path.display(),
            frames = session.frames_written,
            failures = session.write_failures,
            "recording stopped"
        );
        Some(session)
    }

    /// The single record button: start when idle, stop when recording.
    /// Returns whether a recording is running afterwards.
    pub fn toggle(
        &mut self,
        frame_size: Option<Resolution>,
        device_fps: Option<f64>,
        at: OffsetDateTime,
    ) -> Result<bool, RecordingError> {
        if self.stop().is_some() {
            return Ok(false);
        }
        self.start(frame_size, device_fps, at)?;
        Ok(true)
    }

    /// Release the sink if a recording is open. Safe to call repeatedly.
    pub fn shutdown(&mut self) {
        if self.stop().is_some() {
            info!("recording closed on shutdown");
        }
    }

    // --- Per-tick ---

    /// Append a frame to the open recording; no-op when idle.
    pub fn write_frame(&mut self, frame: &FrameBuffer) {
        let RecordingState::Recording(session) = &mut self.state else {
            return;
        };
        match self.sink.write_frame(frame) {
            Ok(()) => session.frames_written += 1,
            Err(e) => {
                session.write_failures += 1;
                warn!(error = %e, frame = session.frames_written, "video frame write failed; recording continues");
            }
        }
    }

    // --- Snapshot trigger ---

    /// Ask for the next processed frame to be saved.
    pub fn request_snapshot(&mut self) {
        self.snapshot_pending = true;
    }

    #[must_use]
    pub fn snapshot_pending(&self) -> bool {
        self.snapshot_pending
    }

    /// Consume the pending request. Exactly one caller sees `true`.
    pub fn take_snapshot_request(&mut self) -> bool {
        std::mem::take(&mut self.snapshot_pending)
    }

    fn recording_fps(&self, device_fps: Option<f64>) -> f64 {
        let usable = |fps: &f64| fps.is_finite() && *fps > 0.0;
        self.settings
            .fps_override
            .filter(usable)
            .or(device_fps.filter(usable))
            .unwrap_or(FALLBACK_RECORDING_FPS)
    }
}

impl Drop for RecordingController {
    fn drop(&mut self) {
        self.shutdown();
    }
}
