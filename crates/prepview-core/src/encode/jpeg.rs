//! JPEG encoding for transform results.
//!
//! Uses the `image` crate's JPEG encoder. JPEG has no alpha channel, so
//! alpha is dropped before encoding.

use std::borrow::Cow;
use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError};
use crate::pixels::PixelArray;

/// Encode a pixel array to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Gray, gray+alpha, RGB or RGBA pixels
/// * `quality` - JPEG quality (1-100, where 100 is highest quality)
///
/// # Quality Guidelines
///
/// * 90-100: High quality
/// * 80-90: Good quality, recommended for previews
/// * Below 60: Visible artifacts
pub fn encode_jpeg(image: &PixelArray, quality: u8) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    // Clamp quality to valid range (1-100)
    let quality = quality.clamp(1, 100);

    let (data, color) = match image.channels {
        1 => (Cow::Borrowed(&image.data[..]), ExtendedColorType::L8),
        2 => (Cow::Owned(strip_alpha(&image.data, 2)), ExtendedColorType::L8),
        3 => (Cow::Borrowed(&image.data[..]), ExtendedColorType::Rgb8),
        4 => (Cow::Owned(strip_alpha(&image.data, 4)), ExtendedColorType::Rgb8),
        other => return Err(EncodeError::UnsupportedChannels(other)),
    };

    let mut buffer = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut buffer, quality)
        .write_image(&data, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Drop the last channel of every pixel.
fn strip_alpha(data: &[u8], channels: usize) -> Vec<u8> {
    data.chunks_exact(channels)
        .flat_map(|px| px[..channels - 1].iter().copied())
        .collect()
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Encoding always produces valid JPEG when given valid input.
        #[test]
        fn prop_valid_input_produces_valid_jpeg(
            (height, width) in (1u32..=32, 1u32..=32),
            quality in 1u8..=100,
        ) {
            let img = PixelArray::filled(height, width, &[128, 64, 32]);
            let jpeg_bytes = encode_jpeg(&img, quality).unwrap();

            prop_assert_eq!(&jpeg_bytes[0..2], &[0xFF, 0xD8], "Should have SOI marker");
            let len = jpeg_bytes.len();
            prop_assert_eq!(&jpeg_bytes[len - 2..], &[0xFF, 0xD9], "Should have EOI marker");
        }

        /// Property: Same input always produces same output (deterministic).
        #[test]
        fn prop_deterministic_output(
            (height, width) in (1u32..=16, 1u32..=16),
            quality in 1u8..=100,
        ) {
            let img = PixelArray::filled(height, width, &[10, 200, 90]);
            prop_assert_eq!(encode_jpeg(&img, quality).unwrap(), encode_jpeg(&img, quality).unwrap());
        }
    }
}
