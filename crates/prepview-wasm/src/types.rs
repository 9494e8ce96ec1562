//! WASM-compatible wrapper types for image data.
//!
//! This module provides JavaScript-friendly types that wrap the core Prepview
//! types, handling the conversion between Rust and JavaScript data representations.

use prepview_core::PixelArray;
use wasm_bindgen::prelude::*;

/// A transformed image for JavaScript.
///
/// # Memory Management
///
/// The pixel data is stored in WASM memory. When you call `pixels()`, a copy is made
/// to JavaScript memory as a `Uint8Array`.
#[wasm_bindgen]
#[derive(Debug)]
pub struct JsPixelArray {
    inner: PixelArray,
}

#[wasm_bindgen]
impl JsPixelArray {
    /// Create a new image from dimensions and interleaved samples.
    ///
    /// # Arguments
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    /// * `channels` - Samples per pixel (1, 2, 3 or 4)
    /// * `pixels` - Row-major sample data
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, channels: u8, pixels: Vec<u8>) -> JsPixelArray {
        JsPixelArray {
            inner: PixelArray {
                height,
                width,
                channels,
                data: pixels,
            },
        }
    }

    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn channels(&self) -> u8 {
        self.inner.channels
    }

    /// Number of bytes in the sample buffer.
    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.data.len()
    }

    /// Returns the samples as a Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.data.clone()
    }

    /// Explicitly free WASM memory.
    pub fn free(self) {}
}

impl JsPixelArray {
    pub(crate) fn from_pixels(inner: PixelArray) -> Self {
        Self { inner }
    }

    pub(crate) fn as_pixels(&self) -> &PixelArray {
        &self.inner
    }
}
