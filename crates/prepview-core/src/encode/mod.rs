//! Encoding pixel arrays into transport formats.
//!
//! This module provides functionality for:
//! - Encoding to JPEG with configurable quality (lossy)
//! - Encoding to PNG (lossless)
//!
//! # Examples
//!
//! ```ignore
//! use prepview_core::encode::{encode, OutputFormat};
//!
//! let bytes = encode(&pixels, OutputFormat::Jpeg { quality: 90 }).unwrap();
//! println!("Encoded {} bytes", bytes.len());
//! ```

mod jpeg;
mod png;

pub use jpeg::encode_jpeg;
pub use png::encode_png;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pixels::PixelArray;

/// Errors that can occur during encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Pixel data length doesn't match expected dimensions
    #[error("Invalid pixel data: expected {expected} bytes (height * width * channels), got {actual}")]
    InvalidPixelData { expected: usize, actual: usize },

    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// The target format cannot store this channel layout
    #[error("Unsupported channel count for encoding: {0}")]
    UnsupportedChannels(u8),

    /// The underlying encoder failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),
}

/// Target format for [`encode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "format")]
pub enum OutputFormat {
    /// Lossy JPEG at the given quality (1-100, clamped).
    Jpeg { quality: u8 },
    /// Lossless PNG.
    Png,
}

impl Default for OutputFormat {
    fn default() -> Self {
        OutputFormat::Jpeg { quality: 90 }
    }
}

impl OutputFormat {
    /// MIME type for responses carrying this format.
    pub const fn content_type(self) -> &'static str {
        match self {
            OutputFormat::Jpeg { .. } => "image/jpeg",
            OutputFormat::Png => "image/png",
        }
    }
}

/// Encode a pixel array in the requested format.
pub fn encode(image: &PixelArray, format: OutputFormat) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;
    match format {
        OutputFormat::Jpeg { quality } => encode_jpeg(image, quality),
        OutputFormat::Png => encode_png(image),
    }
}

/// Check dimensions and buffer length before handing data to an encoder.
fn validate(image: &PixelArray) -> Result<(), EncodeError> {
    if image.width == 0 || image.height == 0 {
        return Err(EncodeError::InvalidDimensions {
            width: image.width,
            height: image.height,
        });
    }

    let expected = PixelArray::expected_len(image.height, image.width, image.channels);
    if image.data.len() != expected {
        return Err(EncodeError::InvalidPixelData {
            expected,
            actual: image.data.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_types() {
        assert_eq!(OutputFormat::default().content_type(), "image/jpeg");
        assert_eq!(OutputFormat::Png.content_type(), "image/png");
    }

    #[test]
    fn test_encode_dispatches_by_format() {
        let img = PixelArray::filled(4, 4, &[10, 20, 30]);

        let jpeg = encode(&img, OutputFormat::Jpeg { quality: 80 }).unwrap();
        assert_eq!(&jpeg[0..2], &[0xFF, 0xD8]);

        let png = encode(&img, OutputFormat::Png).unwrap();
        assert_eq!(&png[1..4], b"PNG");
    }

    #[test]
    fn test_encode_zero_width() {
        let img = PixelArray {
            height: 10,
            width: 0,
            channels: 3,
            data: vec![],
        };
        let result = encode(&img, OutputFormat::Png);
        assert!(matches!(result, Err(EncodeError::InvalidDimensions { .. })));
    }

    #[test]
    fn test_encode_short_buffer() {
        let img = PixelArray {
            height: 10,
            width: 10,
            channels: 3,
            data: vec![0; 299],
        };
        let result = encode(&img, OutputFormat::default());
        assert!(matches!(
            result,
            Err(EncodeError::InvalidPixelData {
                expected: 300,
                actual: 299
            })
        ));
    }

    #[test]
    fn test_output_format_deserializes() {
        let format: OutputFormat = serde_json::from_str(r#"{"format":"jpeg","quality":75}"#).unwrap();
        assert_eq!(format, OutputFormat::Jpeg { quality: 75 });

        let format: OutputFormat = serde_json::from_str(r#"{"format":"png"}"#).unwrap();
        assert_eq!(format, OutputFormat::Png);
    }
}
