//! Pixel buffers: the per-tick raw frame and the derived display image.

#[cfg(test)]
#[path = "frame_test.rs"]
mod frame_test;

use image::{Rgb, RgbImage, Rgba, RgbaImage};

use crate::viewport::Resolution;

/// Channel order of a three-channel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorLayout {
    /// Capture-device native order.
    #[default]
    Bgr,
    Rgb,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("buffer of {len} bytes does not hold a {width}x{height} three-channel frame")]
pub struct FrameSizeError {
    pub width: u32,
    pub height: u32,
    pub len: usize,
}

/// Raw frame for one tick, moved through the pipeline by value.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    image: RgbImage,
    layout: ColorLayout,
}

impl FrameBuffer {
    #[must_use]
    pub fn new(image: RgbImage, layout: ColorLayout) -> Self {
        Self { image, layout }
    }

    /// A black frame.
    #[must_use]
    pub fn blank(size: Resolution, layout: ColorLayout) -> Self {
        Self { image: RgbImage::new(size.width, size.height), layout }
    }

    /// Wrap a tightly packed three-channel byte buffer.
    pub fn from_raw(width: u32, height: u32, bytes: Vec<u8>, layout: ColorLayout) -> Result<Self, FrameSizeError> {
        let len = bytes.len();
        let image = RgbImage::from_raw(width, height, bytes).ok_or(FrameSizeError { width, height, len })?;
        Ok(Self { image, layout })
    }

    #[must_use]
    pub fn size(&self) -> Resolution {
        Resolution::new(self.image.width(), self.image.height())
    }

    #[must_use]
    pub fn layout(&self) -> ColorLayout {
        self.layout
    }

    #[must_use]
    pub fn image(&self) -> &RgbImage {
        &self.image
    }

    #[must_use]
    pub fn into_image(self) -> RgbImage {
        self.image
    }

    /// Pixel at `(x, y)` as `[r, g, b]`, whatever the stored layout.
    #[must_use]
    pub fn rgb_at(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        let Rgb(p) = *self.image.get_pixel_checked(x, y)?;
        Some(match self.layout {
            ColorLayout::Rgb => p,
            ColorLayout::Bgr => [p[2], p[1], p[0]],
        })
    }

    /// Write an `[r, g, b]` colour, clipping coordinates outside the frame.
    pub fn put_rgb(&mut self, x: i64, y: i64, [r, g, b]: [u8; 3]) {
        let (Ok(x), Ok(y)) = (u32::try_from(x), u32::try_from(y)) else {
            return;
        };
        if x >= self.image.width() || y >= self.image.height() {
            return;
        }
        let stored = match self.layout {
            ColorLayout::Rgb => [r, g, b],
            ColorLayout::Bgr => [b, g, r],
        };
        self.image.put_pixel(x, y, Rgb(stored));
    }

    /// Same pixels in RGB order, for encoders.
    #[must_use]
    pub fn to_rgb_image(&self) -> RgbImage {
        match self.layout {
            ColorLayout::Rgb => self.image.clone(),
            ColorLayout::Bgr => {
                let mut out = self.image.clone();
                for Rgb(p) in out.pixels_mut() {
                    p.swap(0, 2);
                }
                out
            }
        }
    }

    /// Same pixels as an opaque RGBA image, the layout display surfaces take.
    #[must_use]
    pub fn to_rgba_image(&self) -> RgbaImage {
        let (w, h) = self.image.dimensions();
        RgbaImage::from_fn(w, h, |x, y| {
            let Rgb(p) = *self.image.get_pixel(x, y);
            match self.layout {
                ColorLayout::Rgb => Rgba([p[0], p[1], p[2], u8::MAX]),
                ColorLayout::Bgr => Rgba([p[2], p[1], p[0], u8::MAX]),
            }
        })
    }
}

/// Presentation copy of a tick's frame: cropped, fit-scaled, RGBA.
///
/// Never fed back into recording.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFrame {
    pub image: RgbaImage,
}

impl DisplayFrame {
    #[must_use]
    pub fn size(&self) -> Resolution {
        Resolution::new(self.image.width(), self.image.height())
    }
}
