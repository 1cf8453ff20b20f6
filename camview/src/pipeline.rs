//! Frame pipeline: one scheduling tick from acquire to presentation.
//!
//! DESIGN
//! ======
//! Order within a tick is fixed:
//!
//! 1. acquire (paused, closed device, or failed read: skip the tick)
//! 2. custom processor, with the current click anchor
//! 3. red centre crosshair
//! 4. record the frame (full camera view, pre-crop)
//! 5. snapshot the same frame if one was requested
//! 6. crop to the viewport and scale back to frame size (digital zoom)
//! 7. fit into the display area, convert to RGBA, present
//!
//! Recording and snapshots therefore never see the digital zoom, and the
//! display copy is never fed back into them.
//!
//! ERROR HANDLING
//! ==============
//! Nothing here returns an error to the scheduler. Sink failures are logged
//! by the sink owners; a crop/resize failure drops that tick's display
//! update (`TickOutcome::Dropped`) and the next tick starts clean.

#[cfg(test)]
#[path = "pipeline_test.rs"]
mod pipeline_test;

use std::path::PathBuf;

use image::imageops::{self, FilterType};
use tracing::{debug, info, warn};

use crate::device::{FrameSource, ImageSink};
use crate::error::ErrorCode;
use crate::frame::{DisplayFrame, FrameBuffer};
use crate::overlay::{self, FrameProcessor};
use crate::recording::RecordingController;
use crate::sink::{now_local, snapshot_file_name};
use crate::viewport::{self, Anchor, Resolution, ViewportError, ViewportState};

// =============================================================================
// TYPES
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PipelineError {
    #[error("crop failed: {0}")]
    Crop(#[from] ViewportError),
    #[error("display area {0} is empty")]
    NoDisplayArea(Resolution),
    #[error("fit-scaled image of {frame} into {display} has no pixels")]
    EmptyDisplay { frame: Resolution, display: Resolution },
}

impl ErrorCode for PipelineError {
    fn error_code(&self) -> &'static str {
        "E_TRANSIENT_FRAME"
    }
}

/// Where snapshots go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineSettings {
    pub snapshot_folder: PathBuf,
    /// Image extension, without the dot; also selects the encoder.
    pub image_ext: String,
}

/// What one tick produced.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub display: DisplayFrame,
    /// Size of the raw frame this tick.
    pub frame_dims: Resolution,
    /// Display size over zoomed-frame size, for mapping the next gestures.
    pub fit_scale: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No frame this tick; the host keeps showing the previous one.
    Skipped,
    /// A frame was read, recorded and snapshotted, but could not be displayed.
    Dropped { frame_dims: Resolution, error: PipelineError },
    Presented(Presentation),
}

impl TickOutcome {
    /// Size of the raw frame read this tick, displayed or not.
    #[must_use]
    pub fn frame_dims(&self) -> Option<Resolution> {
        match self {
            Self::Skipped => None,
            Self::Dropped { frame_dims, .. } => Some(*frame_dims),
            Self::Presented(p) => Some(p.frame_dims),
        }
    }
}

/// Running counters, for the status line and diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickStats {
    pub ticks: u64,
    pub presented: u64,
    pub skipped: u64,
    pub dropped: u64,
    pub snapshots: u64,
}

// =============================================================================
// PIPELINE
// =============================================================================

pub struct FramePipeline {
    source: Box<dyn FrameSource>,
    image_sink: Box<dyn ImageSink>,
    processor: Box<dyn FrameProcessor>,
    settings: PipelineSettings,
    stats: TickStats,
    /// Play/stop: when false no frames are read.
    pub playing: bool,
    /// Draw the red centre crosshair.
    pub crosshair: bool,
    /// Run the custom processor.
    pub custom_processing: bool,
}

impl FramePipeline {
    #[must_use]
    pub fn new(
        source: Box<dyn FrameSource>,
        image_sink: Box<dyn ImageSink>,
        processor: Box<dyn FrameProcessor>,
        settings: PipelineSettings,
    ) -> Self {
        Self {
            source,
            image_sink,
            processor,
            settings,
            stats: TickStats::default(),
            playing: true,
            crosshair: false,
            custom_processing: false,
        }
    }

    #[must_use]
    pub fn source(&self) -> &dyn FrameSource {
        self.source.as_ref()
    }

    pub fn source_mut(&mut self) -> &mut dyn FrameSource {
        self.source.as_mut()
    }

    /// Swap in a different processing strategy.
    pub fn set_processor(&mut self, processor: Box<dyn FrameProcessor>) {
        self.processor = processor;
    }

    #[must_use]
    pub fn stats(&self) -> TickStats {
        self.stats
    }

    /// Run one tick.
    pub fn tick(
        &mut self,
        viewport: &ViewportState,
        anchor: Option<Anchor>,
        recorder: &mut RecordingController,
        display_area: Resolution,
    ) -> TickOutcome {
        self.stats.ticks += 1;

        let Some(frame) = self.acquire() else {
            self.stats.skipped += 1;
            return TickOutcome::Skipped;
        };

        let frame = self.process(frame, anchor);
        let frame_dims = frame.size();

        recorder.write_frame(&frame);
        if recorder.take_snapshot_request() {
            self.save_snapshot(&frame);
        }

        match present(frame, viewport, display_area) {
            Ok(presentation) => {
                self.stats.presented += 1;
                TickOutcome::Presented(presentation)
            }
            Err(error) => {
                self.stats.dropped += 1;
                warn!(error = %error, code = error.error_code(), "display update dropped");
                TickOutcome::Dropped { frame_dims, error }
            }
        }
    }

    fn acquire(&mut self) -> Option<FrameBuffer> {
        if !self.playing || !self.source.is_open() {
            return None;
        }
        let frame = self.source.read();
        if frame.is_none() {
            debug!("frame read failed; tick skipped");
        }
        frame
    }

    fn process(&mut self, mut frame: FrameBuffer, anchor: Option<Anchor>) -> FrameBuffer {
        if self.custom_processing {
            frame = self.processor.process(frame, anchor);
        }
        if self.crosshair {
            overlay::draw_center_cross(&mut frame);
        }
        frame
    }

    fn save_snapshot(&mut self, frame: &FrameBuffer) {
        let name = snapshot_file_name(now_local(), &self.settings.image_ext);
        let path = self.settings.snapshot_folder.join(name);
        match self.image_sink.write_frame(frame, &path) {
            Ok(()) => {
                self.stats.snapshots += 1;
                info!(path = %path.display(), "snapshot saved");
            }
            Err(e) => warn!(path = %path.display(), error = %e, "snapshot failed"),
        }
    }
}

/// Steps 6 and 7: digital zoom, then fit into the display area.
fn present(frame: FrameBuffer, viewport: &ViewportState, display_area: Resolution) -> Result<Presentation, PipelineError> {
    let frame_dims = frame.size();
    let layout = frame.layout();

    // Re-base on this frame's size: after a resolution change the stored
    // dimensions can lag one tick behind.
    let view = viewport::with_frame_metrics(*viewport, frame_dims, viewport.fit_scale);

    let zoomed = if view.is_zoomed() {
        let rect = viewport::compute_crop_rect(&view)?.to_pixels(frame_dims)?;
        let crop = imageops::crop_imm(frame.image(), rect.x0, rect.y0, rect.width, rect.height).to_image();
        imageops::resize(&crop, frame_dims.width, frame_dims.height, FilterType::Triangle)
    } else {
        frame.into_image()
    };

    if display_area.is_empty() {
        return Err(PipelineError::NoDisplayArea(display_area));
    }
    let fit_scale = fit_scale(frame_dims, display_area);
    let target = Resolution::new(
        (f64::from(frame_dims.width) * fit_scale).floor() as u32,
        (f64::from(frame_dims.height) * fit_scale).floor() as u32,
    );
    if target.is_empty() {
        return Err(PipelineError::EmptyDisplay { frame: frame_dims, display: display_area });
    }

    let scaled = if target == frame_dims {
        zoomed
    } else {
        imageops::resize(&zoomed, target.width, target.height, FilterType::Triangle)
    };
    let display = DisplayFrame { image: FrameBuffer::new(scaled, layout).to_rgba_image() };

    Ok(Presentation { display, frame_dims, fit_scale })
}

/// Largest uniform scale that fits `frame` into `display`.
#[must_use]
pub fn fit_scale(frame: Resolution, display: Resolution) -> f64 {
    let scale_w = f64::from(display.width) / f64::from(frame.width);
    let scale_h = f64::from(display.height) / f64::from(frame.height);
    scale_w.min(scale_h)
}
