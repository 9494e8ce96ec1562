//! Invoker configuration.

use serde::{Deserialize, Serialize};

use crate::decode::DecodeOptions;
use crate::encode::OutputFormat;

/// Settings shared by every invocation.
///
/// Missing fields in serialized form fall back to their defaults, so `{}`
/// is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvokerConfig {
    /// Correct orientation from the EXIF tag while decoding.
    pub apply_exif_orientation: bool,
    /// Quality used when results are encoded as JPEG (1-100).
    pub jpeg_quality: u8,
    /// Reject sources whose decoded area exceeds this many pixels.
    pub max_decode_pixels: Option<u64>,
}

impl Default for InvokerConfig {
    fn default() -> Self {
        Self {
            apply_exif_orientation: true,
            jpeg_quality: 90,
            max_decode_pixels: None,
        }
    }
}

impl InvokerConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decoder options derived from this configuration.
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            apply_orientation: self.apply_exif_orientation,
            max_pixels: self.max_decode_pixels,
        }
    }

    /// Default output format for encoded results.
    pub fn output_format(&self) -> OutputFormat {
        OutputFormat::Jpeg {
            quality: self.jpeg_quality.clamp(1, 100),
        }
    }
}
