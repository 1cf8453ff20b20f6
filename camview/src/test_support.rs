//! In-memory capability fakes shared by the unit tests.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::device::{FrameSource, ImageSink, SinkError, SourceError, VideoSink};
use crate::frame::{ColorLayout, FrameBuffer};
use crate::viewport::Resolution;

// =============================================================================
// VIDEO SINK
// =============================================================================

#[derive(Debug, Default)]
pub struct VideoLog {
    pub opens: Vec<(PathBuf, String, f64, Resolution)>,
    pub writes: usize,
    /// Writes refused because the frame size differed from the open size.
    pub mismatched: usize,
    pub closes: usize,
    pub open: bool,
    pub fail_open: bool,
    pub fail_writes: bool,
}

/// Counts every call; the log is shared so tests can inspect it after the
/// sink has been boxed into a controller.
#[derive(Debug, Clone, Default)]
pub struct FakeVideoSink {
    pub log: Rc<RefCell<VideoLog>>,
}

impl FakeVideoSink {
    pub fn new() -> (Self, Rc<RefCell<VideoLog>>) {
        let sink = Self::default();
        let log = Rc::clone(&sink.log);
        (sink, log)
    }
}

impl VideoSink for FakeVideoSink {
    fn open(&mut self, path: &Path, codec: &str, fps: f64, size: Resolution) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        log.opens.push((path.to_path_buf(), codec.to_string(), fps, size));
        if log.fail_open {
            return Err(SinkError::Io(std::io::Error::other("codec not available")));
        }
        log.open = true;
        Ok(())
    }

    fn write_frame(&mut self, frame: &FrameBuffer) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        if !log.open {
            return Err(SinkError::NotOpen);
        }
        if let Some(&(_, _, _, expected)) = log.opens.last() {
            let got = frame.size();
            if got != expected {
                log.mismatched += 1;
                return Err(SinkError::SizeMismatch { expected, got });
            }
        }
        if log.fail_writes {
            return Err(SinkError::Io(std::io::Error::other("disk full")));
        }
        log.writes += 1;
        Ok(())
    }

    fn close(&mut self) {
        let mut log = self.log.borrow_mut();
        if log.open {
            log.closes += 1;
        }
        log.open = false;
    }

    fn is_open(&self) -> bool {
        self.log.borrow().open
    }
}

// =============================================================================
// IMAGE SINK
// =============================================================================

#[derive(Debug, Default)]
pub struct ImageLog {
    pub paths: Vec<PathBuf>,
    pub centre_pixels: Vec<Option<[u8; 3]>>,
    pub sizes: Vec<Resolution>,
    pub fail: bool,
}

#[derive(Debug, Clone, Default)]
pub struct FakeImageSink {
    pub log: Rc<RefCell<ImageLog>>,
}

impl FakeImageSink {
    pub fn new() -> (Self, Rc<RefCell<ImageLog>>) {
        let sink = Self::default();
        let log = Rc::clone(&sink.log);
        (sink, log)
    }
}

impl ImageSink for FakeImageSink {
    fn write_frame(&mut self, frame: &FrameBuffer, path: &Path) -> Result<(), SinkError> {
        let mut log = self.log.borrow_mut();
        if log.fail {
            return Err(SinkError::UnsupportedFormat("fake".into()));
        }
        log.paths.push(path.to_path_buf());
        log.sizes.push(frame.size());
        let size = frame.size();
        log.centre_pixels.push(frame.rgb_at(size.width / 2, size.height / 2));
        Ok(())
    }
}

// =============================================================================
// FRAME SOURCE
// =============================================================================

#[derive(Debug)]
pub struct SourceLog {
    pub available_ids: Vec<u32>,
    pub open_id: Option<u32>,
    pub resolution: Resolution,
    pub max_resolution: Resolution,
    /// Scripted read results; when empty every read succeeds.
    pub script: VecDeque<bool>,
    pub reads: usize,
    pub fps: Option<f64>,
    pub closes: usize,
}

impl Default for SourceLog {
    fn default() -> Self {
        Self {
            available_ids: vec![0],
            open_id: None,
            resolution: Resolution::new(64, 48),
            max_resolution: Resolution::new(1920, 1080),
            script: VecDeque::new(),
            reads: 0,
            fps: Some(25.0),
            closes: 0,
        }
    }
}

/// Produces mid-grey frames of the current resolution.
#[derive(Debug, Clone, Default)]
pub struct FakeSource {
    pub log: Rc<RefCell<SourceLog>>,
}

impl FakeSource {
    /// An already opened source at `resolution`.
    pub fn opened(resolution: Resolution) -> (Self, Rc<RefCell<SourceLog>>) {
        let source = Self::default();
        {
            let mut log = source.log.borrow_mut();
            log.resolution = resolution;
            log.open_id = Some(0);
        }
        let log = Rc::clone(&source.log);
        (source, log)
    }
}

impl FrameSource for FakeSource {
    fn open(&mut self, ids: &[u32]) -> Result<u32, SourceError> {
        let mut log = self.log.borrow_mut();
        let id = ids.iter().copied().find(|id| log.available_ids.contains(id));
        let Some(id) = id else {
            return Err(SourceError::Unavailable { ids: ids.to_vec() });
        };
        log.open_id = Some(id);
        Ok(id)
    }

    fn close(&mut self) {
        let mut log = self.log.borrow_mut();
        log.open_id = None;
        log.closes += 1;
    }

    fn is_open(&self) -> bool {
        self.log.borrow().open_id.is_some()
    }

    fn id(&self) -> Option<u32> {
        self.log.borrow().open_id
    }

    fn resolution(&self) -> Option<Resolution> {
        let log = self.log.borrow();
        log.open_id.map(|_| log.resolution)
    }

    fn set_resolution(&mut self, resolution: Resolution) -> Result<(), SourceError> {
        let mut log = self.log.borrow_mut();
        if log.open_id.is_none() {
            return Err(SourceError::Closed);
        }
        if resolution.width > log.max_resolution.width || resolution.height > log.max_resolution.height {
            return Err(SourceError::UnsupportedResolution(resolution));
        }
        log.resolution = resolution;
        Ok(())
    }

    fn read(&mut self) -> Option<FrameBuffer> {
        let mut log = self.log.borrow_mut();
        log.open_id?;
        log.reads += 1;
        if !log.script.pop_front().unwrap_or(true) {
            return None;
        }
        let mut frame = FrameBuffer::blank(log.resolution, ColorLayout::Bgr);
        for y in 0..log.resolution.height {
            for x in 0..log.resolution.width {
                frame.put_rgb(i64::from(x), i64::from(y), [128, 128, 128]);
            }
        }
        Some(frame)
    }

    fn fps(&self) -> Option<f64> {
        self.log.borrow().fps
    }
}
