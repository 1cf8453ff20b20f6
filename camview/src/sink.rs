//! Image-file snapshot sink and timestamped output names.

#[cfg(test)]
#[path = "sink_test.rs"]
mod sink_test;

use std::path::Path;

use image::ImageFormat;
use time::OffsetDateTime;
use time::macros::format_description;
use tracing::debug;

use crate::device::{ImageSink, SinkError};
use crate::frame::FrameBuffer;

/// Resolve an image extension (`jpg`, `png`, `tiff`, ...) to an encoder format.
pub fn image_format_for(ext: &str) -> Result<ImageFormat, SinkError> {
    ImageFormat::from_extension(ext)
        .filter(|f| f.can_write())
        .ok_or_else(|| SinkError::UnsupportedFormat(ext.to_string()))
}

/// Encodes snapshots with the `image` crate, format taken from the path extension.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageFileSink;

impl ImageSink for ImageFileSink {
    fn write_frame(&mut self, frame: &FrameBuffer, path: &Path) -> Result<(), SinkError> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or_default();
        let format = image_format_for(ext)?;
        frame.to_rgb_image().save_with_format(path, format)?;
        debug!(path = %path.display(), "image written");
        Ok(())
    }
}

/// Local wall-clock time, or UTC when the local offset cannot be determined.
#[must_use]
pub fn now_local() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}

/// `<prefix>_YYYY-MM-DD_HHMMSS.<ext>`
#[must_use]
pub fn timestamped_name(prefix: &str, at: OffsetDateTime, ext: &str) -> String {
    let stamp = at
        .format(format_description!("[year]-[month]-[day]_[hour][minute][second]"))
        .unwrap_or_else(|_| at.unix_timestamp().to_string());
    format!("{prefix}_{stamp}.{ext}")
}

#[must_use]
pub fn snapshot_file_name(at: OffsetDateTime, ext: &str) -> String {
    timestamped_name("snapshot", at, ext)
}

#[must_use]
pub fn video_file_name(at: OffsetDateTime, ext: &str) -> String {
    timestamped_name("video", at, ext)
}
