//! Lossless PNG encoding.

use std::io::Cursor;

use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder};

use super::{validate, EncodeError};
use crate::pixels::PixelArray;

/// Encode a pixel array to PNG bytes, keeping every sample exactly.
pub fn encode_png(image: &PixelArray) -> Result<Vec<u8>, EncodeError> {
    validate(image)?;

    let color = match image.channels {
        1 => ExtendedColorType::L8,
        2 => ExtendedColorType::La8,
        3 => ExtendedColorType::Rgb8,
        4 => ExtendedColorType::Rgba8,
        other => return Err(EncodeError::UnsupportedChannels(other)),
    };

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(&image.data, image.width, image.height, color)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}
