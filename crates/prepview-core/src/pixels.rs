//! Decoded pixel storage shared by the decoder, the transforms and the encoder.

use serde::{Deserialize, Serialize};

/// A decoded image as a `height x width x channels` grid of 8-bit samples.
///
/// Samples are stored row-major with channels interleaved, so the sample for
/// `(y, x, c)` lives at `(y * width + x) * channels + c`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelArray {
    /// Image height in pixels.
    pub height: u32,
    /// Image width in pixels.
    pub width: u32,
    /// Samples per pixel (1 = gray, 3 = RGB, 4 = RGBA).
    pub channels: u8,
    /// Interleaved sample data, `height * width * channels` bytes.
    pub data: Vec<u8>,
}

impl PixelArray {
    /// Create a new PixelArray with the given shape and sample data.
    pub fn new(height: u32, width: u32, channels: u8, data: Vec<u8>) -> Self {
        debug_assert_eq!(
            data.len(),
            Self::expected_len(height, width, channels),
            "Pixel buffer size mismatch"
        );
        Self {
            height,
            width,
            channels,
            data,
        }
    }

    /// Create an image where every pixel holds the same samples.
    pub fn filled(height: u32, width: u32, pixel: &[u8]) -> Self {
        let count = (height as usize) * (width as usize);
        let data = pixel.repeat(count);
        Self {
            height,
            width,
            channels: pixel.len() as u8,
            data,
        }
    }

    /// Create a 3-channel PixelArray from an `image::RgbImage`.
    pub fn from_rgb_image(img: image::RgbImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            height,
            width,
            channels: 3,
            data: img.into_raw(),
        }
    }

    /// Convert into a `DynamicImage` matching the channel layout.
    ///
    /// Returns `None` for channel counts the `image` crate has no 8-bit
    /// buffer type for, or when the buffer length is inconsistent.
    pub fn into_dynamic(self) -> Option<image::DynamicImage> {
        use image::{DynamicImage, ImageBuffer};
        let (w, h) = (self.width, self.height);
        match self.channels {
            1 => ImageBuffer::from_raw(w, h, self.data).map(DynamicImage::ImageLuma8),
            2 => ImageBuffer::from_raw(w, h, self.data).map(DynamicImage::ImageLumaA8),
            3 => ImageBuffer::from_raw(w, h, self.data).map(DynamicImage::ImageRgb8),
            4 => ImageBuffer::from_raw(w, h, self.data).map(DynamicImage::ImageRgba8),
            _ => None,
        }
    }

    /// Spatial shape as `(height, width)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.height, self.width)
    }

    /// Full shape as `(height, width, channels)`.
    pub fn shape(&self) -> (u32, u32, u8) {
        (self.height, self.width, self.channels)
    }

    /// Get the total number of pixels.
    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Samples of the pixel at `(y, x)`.
    pub fn pixel(&self, y: u32, x: u32) -> &[u8] {
        let c = self.channels as usize;
        let start = (y as usize * self.width as usize + x as usize) * c;
        &self.data[start..start + c]
    }

    /// Iterate over pixels as channel slices in row-major order.
    pub fn pixels(&self) -> std::slice::ChunksExact<'_, u8> {
        self.data.chunks_exact(self.channels.max(1) as usize)
    }

    /// Check if this is an empty/invalid image.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.data.is_empty()
    }

    pub(crate) fn expected_len(height: u32, width: u32, channels: u8) -> usize {
        (height as usize) * (width as usize) * (channels as usize)
    }
}
