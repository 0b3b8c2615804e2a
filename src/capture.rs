//! Captured frames handed to the comparison engine

use image::{DynamicImage, RgbaImage};

/// A raw frame as delivered by a capture backend
#[derive(Debug, Clone)]
pub struct CapturedFrame {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// RGBA pixel data
    pub data: Vec<u8>,
}

impl CapturedFrame {
    /// Create a new frame
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self { width, height, data }
    }

    /// Convert into an image the comparison methods accept.
    /// Returns `None` when the buffer doesn't hold `width * height` RGBA pixels.
    pub fn into_image(self) -> Option<DynamicImage> {
        RgbaImage::from_raw(self.width, self.height, self.data).map(DynamicImage::ImageRgba8)
    }
}

/// Whether a capture can be compared at all: present, non-empty and with color channels
pub fn is_valid_capture(capture: Option<&DynamicImage>) -> bool {
    match capture {
        Some(image) => {
            image.width() > 0 && image.height() > 0 && image.color().channel_count() > 0
        }
        None => false,
    }
}
