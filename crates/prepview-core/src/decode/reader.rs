//! Decoding encoded sources into RGB pixel arrays.

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

use super::{DecodeError, DecodeOptions, ImageSource, Orientation};
use crate::pixels::PixelArray;

/// Decode an image source into a 3-channel RGB pixel array.
///
/// The format is sniffed from the content, so any format enabled on the
/// `image` crate is accepted. Alpha is dropped and higher bit depths are
/// reduced to 8 bits.
///
/// # Errors
///
/// Returns `DecodeError::IoError` if a path cannot be read,
/// `DecodeError::InvalidFormat` if the format is not recognized,
/// `DecodeError::CorruptedFile` if decoding fails and
/// `DecodeError::TooLarge` if the image exceeds `options.max_pixels`.
pub fn decode(source: ImageSource<'_>, options: &DecodeOptions) -> Result<PixelArray, DecodeError> {
    match source {
        ImageSource::Bytes(bytes) => decode_bytes(bytes, options),
        ImageSource::Path(path) => {
            let bytes = std::fs::read(path)
                .map_err(|e| DecodeError::IoError(format!("{}: {}", path.display(), e)))?;
            decode_bytes(&bytes, options)
        }
    }
}

/// Decode in-memory encoded bytes into a 3-channel RGB pixel array.
pub fn decode_bytes(bytes: &[u8], options: &DecodeOptions) -> Result<PixelArray, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::InvalidFormat);
    }

    if let Some(limit) = options.max_pixels {
        let (width, height) = open(bytes)?
            .into_dimensions()
            .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
        if u64::from(width) * u64::from(height) > limit {
            return Err(DecodeError::TooLarge {
                width,
                height,
                limit,
            });
        }
    }

    let img = open(bytes)?
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    let img = if options.apply_orientation {
        apply_orientation(img, extract_orientation(bytes))
    } else {
        img
    };

    Ok(PixelArray::from_rgb_image(img.into_rgb8()))
}

fn open(bytes: &[u8]) -> Result<ImageReader<Cursor<&[u8]>>, DecodeError> {
    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;
    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }
    Ok(reader)
}

/// Extract EXIF orientation from encoded bytes.
///
/// Returns `Orientation::Normal` if no EXIF data is found or orientation
/// cannot be determined.
pub fn extract_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);

    match Reader::new().read_from_container(&mut cursor) {
        Ok(exif) => exif
            .get_field(Tag::Orientation, In::PRIMARY)
            .and_then(|field| field.value.get_uint(0))
            .map(Orientation::from)
            .unwrap_or_default(),
        Err(_) => Orientation::Normal,
    }
}

/// Apply EXIF orientation transformation to an image.
fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageFormat;

    /// Encode a small RGB image in the given container format.
    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let pixels: Vec<u8> = (0..width * height * 3).map(|i| (i * 7 % 256) as u8).collect();
        let img = image::RgbImage::from_raw(width, height, pixels).unwrap();
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(img).write_to(&mut out, format).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png_is_lossless() {
        let bytes = encoded(4, 3, ImageFormat::Png);
        let img = decode_bytes(&bytes, &DecodeOptions::default()).unwrap();

        assert_eq!(img.shape(), (3, 4, 3));
        let expected: Vec<u8> = (0..4 * 3 * 3).map(|i: u32| (i * 7 % 256) as u8).collect();
        assert_eq!(img.data, expected);
    }

    #[test]
    fn test_decode_jpeg() {
        let bytes = encoded(16, 8, ImageFormat::Jpeg);
        let img = decode(ImageSource::Bytes(&bytes), &DecodeOptions::default()).unwrap();
        assert_eq!(img.dimensions(), (8, 16));
        assert_eq!(img.channels, 3);
    }

    #[test]
    fn test_decode_rgba_drops_alpha() {
        let rgba = image::RgbaImage::from_raw(1, 1, vec![10, 20, 30, 40]).unwrap();
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(rgba)
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();

        let img = decode_bytes(&out.into_inner(), &DecodeOptions::default()).unwrap();
        assert_eq!(img.data, vec![10, 20, 30]);
    }

    #[test]
    fn test_decode_garbage_is_invalid_format() {
        let result = decode_bytes(&[0x00, 0x01, 0x02, 0x03], &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        let result = decode_bytes(&[], &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_truncated() {
        let bytes = encoded(8, 8, ImageFormat::Png);
        let result = decode_bytes(&bytes[..bytes.len() / 2], &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_decode_missing_path() {
        let path = std::path::Path::new("/nonexistent/prepview/upload");
        let result = decode(ImageSource::Path(path), &DecodeOptions::default());
        assert!(matches!(result, Err(DecodeError::IoError(_))));
    }

    #[test]
    fn test_decode_pixel_limit() {
        let bytes = encoded(10, 10, ImageFormat::Png);
        let options = DecodeOptions {
            max_pixels: Some(99),
            ..Default::default()
        };
        let result = decode_bytes(&bytes, &options);
        assert!(matches!(
            result,
            Err(DecodeError::TooLarge {
                width: 10,
                height: 10,
                limit: 99
            })
        ));

        let options = DecodeOptions {
            max_pixels: Some(100),
            ..Default::default()
        };
        assert!(decode_bytes(&bytes, &options).is_ok());
    }

    #[test]
    fn test_orientation_extraction_no_exif() {
        let bytes = encoded(2, 2, ImageFormat::Jpeg);
        assert_eq!(extract_orientation(&bytes), Orientation::Normal);
        assert_eq!(extract_orientation(&[0x00, 0x01, 0x02]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb), Orientation::Rotate90CW);
        assert_eq!(result.into_rgb8().dimensions(), (1, 2));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let rgb = image::RgbImage::from_raw(2, 1, vec![255, 0, 0, 0, 255, 0]).unwrap();
        let result = apply_orientation(DynamicImage::ImageRgb8(rgb), Orientation::FlipHorizontal);
        let rgb_result = result.into_rgb8();

        assert_eq!(rgb_result.get_pixel(0, 0).0, [0, 255, 0]);
        assert_eq!(rgb_result.get_pixel(1, 0).0, [255, 0, 0]);
    }
}
