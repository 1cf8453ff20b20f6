//! Capabilities the core consumes: frame sources, video sinks, image sinks.
//!
//! DESIGN
//! ======
//! The capture backend and the on-disk encoders live outside this crate.
//! They plug in through these traits; the pipeline and the recording
//! controller only ever see `dyn FrameSource` / `dyn VideoSink` /
//! `dyn ImageSink`.
//!
//! A failed `read` is a normal per-tick outcome (`None`), not an error.

use std::path::Path;

use crate::error::ErrorCode;
use crate::frame::FrameBuffer;
use crate::viewport::Resolution;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("no usable capture device among ids {ids:?}")]
    Unavailable { ids: Vec<u32> },
    #[error("capture device is not open")]
    Closed,
    #[error("device rejected resolution {0}")]
    UnsupportedResolution(Resolution),
}

impl ErrorCode for SourceError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } | Self::Closed => "E_SOURCE_UNAVAILABLE",
            Self::UnsupportedResolution(_) => "E_UNSUPPORTED_RESOLUTION",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SinkError {
    #[error("sink I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("encoding failed: {0}")]
    Encode(#[from] image::ImageError),
    #[error("unsupported output format '{0}'")]
    UnsupportedFormat(String),
    #[error("sink is not open")]
    NotOpen,
    #[error("frame size {got} does not match sink size {expected}")]
    SizeMismatch { expected: Resolution, got: Resolution },
}

impl ErrorCode for SinkError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Io(_) | Self::Encode(_) => "E_SINK_IO",
            Self::UnsupportedFormat(_) => "E_CONFIGURATION",
            Self::NotOpen => "E_SINK_CLOSED",
            Self::SizeMismatch { .. } => "E_SINK_FRAME_SIZE",
        }
    }
}

// =============================================================================
// CAPABILITIES
// =============================================================================

/// A live video source such as a camera.
pub trait FrameSource {
    /// Open the first id in `ids` that works; returns the id that opened.
    fn open(&mut self, ids: &[u32]) -> Result<u32, SourceError>;

    /// Release the device. Safe to call when already closed.
    fn close(&mut self);

    fn is_open(&self) -> bool;

    /// Id of the open device, if any.
    fn id(&self) -> Option<u32>;

    /// Current capture resolution; `None` while closed.
    fn resolution(&self) -> Option<Resolution>;

    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), SourceError>;

    /// Grab the next frame; `None` when the read fails or the device is closed.
    fn read(&mut self) -> Option<FrameBuffer>;

    /// Device-reported frame rate, when it reports one.
    fn fps(&self) -> Option<f64>;
}

/// A video writer fed one frame at a time.
pub trait VideoSink {
    fn open(&mut self, path: &Path, codec: &str, fps: f64, size: Resolution) -> Result<(), SinkError>;

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), SinkError>;

    /// Flush and release. Idempotent.
    fn close(&mut self);

    fn is_open(&self) -> bool;
}

/// A still-image encoder.
pub trait ImageSink {
    fn write_frame(&mut self, frame: &FrameBuffer, path: &Path) -> Result<(), SinkError>;
}
