//! Colour twist: brightness, contrast, saturation and hue in one affine map.
//!
//! The chroma adjustments run in YIQ space. For an RGB sample `v`:
//!
//! ```text
//! yiq    = RGB_TO_YIQ * v
//! i', q' = rotate(i, q, hue) * saturation
//! v'     = YIQ_TO_RGB * (y, i', q')
//! out    = brightness * ((v' - 128) * contrast + 128)
//! ```
//!
//! `brightness = contrast = saturation = 1` and `hue = 0` is the identity.
//! Saturation 0 collapses every pixel onto its luma, which is how
//! [`GrayScale`] is built.

use super::{check_buffer, EngineError, TransformHandler, TransformMethod};
use crate::error::InvokeError;
use crate::params::ParameterSet;
use crate::pixels::PixelArray;
use crate::schema::{ParamSpec, ParameterSchema};

/// NTSC RGB -> YIQ.
const RGB_TO_YIQ: [[f32; 3]; 3] = [
    [0.299, 0.587, 0.114],
    [0.596, -0.274, -0.322],
    [0.211, -0.523, 0.312],
];

/// NTSC YIQ -> RGB.
const YIQ_TO_RGB: [[f32; 3]; 3] = [
    [1.0, 0.956, 0.621],
    [1.0, -0.272, -0.647],
    [1.0, -1.106, 1.703],
];

const IDENTITY: [[f32; 3]; 3] = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

/// Midpoint contrast pivots around.
const HALF_RANGE: f32 = 128.0;

/// Precomputed colour transform applied to the first three channels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorTwist {
    matrix: [[f32; 3]; 3],
    scale: f32,
    offset: f32,
}

impl ColorTwist {
    /// Build the transform from the four colour factors.
    pub fn new(brightness: f32, contrast: f32, saturation: f32, hue_degrees: f32) -> Self {
        let matrix = if saturation == 1.0 && hue_degrees == 0.0 {
            IDENTITY
        } else {
            chroma_matrix(saturation, hue_degrees)
        };
        Self {
            matrix,
            scale: brightness * contrast,
            offset: brightness * HALF_RANGE * (1.0 - contrast),
        }
    }

    /// Transform one RGB triple of 0..=255 values.
    #[inline]
    pub fn apply_rgb(&self, rgb: [f32; 3]) -> [f32; 3] {
        let m = &self.matrix;
        let mut out = [0.0_f32; 3];
        for (row, value) in m.iter().zip(out.iter_mut()) {
            let mixed = row[0] * rgb[0] + row[1] * rgb[1] + row[2] * rgb[2];
            *value = mixed * self.scale + self.offset;
        }
        out
    }

    /// Apply to every pixel of an image with at least three channels.
    ///
    /// Channels beyond the third (alpha) are left untouched.
    pub fn apply_image(&self, mut image: PixelArray) -> Result<PixelArray, EngineError> {
        check_buffer(&image)?;
        if image.channels < 3 {
            return Err(EngineError::UnsupportedChannels {
                channels: image.channels,
                expected: "at least 3",
            });
        }

        let stride = image.channels as usize;
        for chunk in image.data.chunks_exact_mut(stride) {
            let out = self.apply_rgb([chunk[0] as f32, chunk[1] as f32, chunk[2] as f32]);
            chunk[0] = to_u8(out[0]);
            chunk[1] = to_u8(out[1]);
            chunk[2] = to_u8(out[2]);
        }
        Ok(image)
    }
}

/// `YIQ_TO_RGB * diag(1, R(hue) * saturation) * RGB_TO_YIQ`.
fn chroma_matrix(saturation: f32, hue_degrees: f32) -> [[f32; 3]; 3] {
    let (sin, cos) = hue_degrees.to_radians().sin_cos();
    let twist = [
        [1.0, 0.0, 0.0],
        [0.0, cos * saturation, -sin * saturation],
        [0.0, sin * saturation, cos * saturation],
    ];
    mat_mul(&mat_mul(&YIQ_TO_RGB, &twist), &RGB_TO_YIQ)
}

fn mat_mul(a: &[[f32; 3]; 3], b: &[[f32; 3]; 3]) -> [[f32; 3]; 3] {
    let mut out = [[0.0_f32; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

#[inline]
fn to_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Brightness, contrast, saturation and hue jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorJitter {
    /// Multiplicative brightness (1.0 = unchanged).
    pub brightness: f32,
    /// Contrast around mid-gray (1.0 = unchanged, 0.0 = flat gray).
    pub contrast: f32,
    /// Chroma scale (1.0 = unchanged, 0.0 = grayscale).
    pub saturation: f32,
    /// Hue rotation in degrees.
    pub hue: f32,
}

impl Default for ColorJitter {
    fn default() -> Self {
        Self {
            brightness: 1.0,
            contrast: 1.0,
            saturation: 1.0,
            hue: 0.0,
        }
    }
}

impl ColorJitter {
    pub fn twist(&self) -> ColorTwist {
        ColorTwist::new(self.brightness, self.contrast, self.saturation, self.hue)
    }
}

impl TransformHandler for ColorJitter {
    fn method(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: PixelArray) -> Result<PixelArray, EngineError> {
        self.twist().apply_image(image)
    }
}

impl TransformMethod for ColorJitter {
    const NAME: &'static str = "dali.color_jitter";

    fn schema() -> ParameterSchema {
        ParameterSchema::new([
            ParamSpec::float("brightness", "Brightness", 1.0)
                .with_step(0.01)
                .with_min(0.0),
            ParamSpec::float("contrast", "Contrast", 1.0)
                .with_step(0.01)
                .with_min(0.0),
            ParamSpec::float("saturation", "Saturation", 1.0).with_step(0.01),
            ParamSpec::float("hue", "Hue", 0.0).with_step(0.01),
        ])
    }

    fn from_params(params: &ParameterSet) -> Result<Self, InvokeError> {
        Ok(Self {
            brightness: params.float("brightness")? as f32,
            contrast: params.float("contrast")? as f32,
            saturation: params.float("saturation")? as f32,
            hue: params.float("hue")? as f32,
        })
    }
}

/// Drops all chroma, leaving each pixel at its luma in every colour channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GrayScale;

impl TransformHandler for GrayScale {
    fn method(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: PixelArray) -> Result<PixelArray, EngineError> {
        ColorTwist::new(1.0, 1.0, 0.0, 0.0).apply_image(image)
    }
}

impl TransformMethod for GrayScale {
    const NAME: &'static str = "dali.gray_scale";

    fn schema() -> ParameterSchema {
        ParameterSchema::empty()
    }

    fn from_params(_params: &ParameterSet) -> Result<Self, InvokeError> {
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to run a handler over a 2x2 image of one pixel value
    fn apply(handler: &dyn TransformHandler, pixel: &[u8]) -> Vec<u8> {
        let img = PixelArray::filled(2, 2, pixel);
        handler.apply(img).unwrap().pixel(1, 1).to_vec()
    }

    // ===== Identity Tests =====

    #[test]
    fn test_default_jitter_is_identity() {
        let jitter = ColorJitter::default();
        for pixel in [[128, 64, 192], [0, 0, 0], [255, 255, 255], [12, 250, 7]] {
            assert_eq!(apply(&jitter, &pixel), pixel.to_vec());
        }
    }

    #[test]
    fn test_full_hue_turn_is_identity() {
        let jitter = ColorJitter {
            hue: 360.0,
            ..Default::default()
        };
        let result = apply(&jitter, &[200, 100, 50]);
        for (got, want) in result.iter().zip([200u8, 100, 50]) {
            assert!((*got as i32 - want as i32).abs() <= 1, "{result:?}");
        }
    }

    // ===== Brightness / Contrast Tests =====

    #[test]
    fn test_brightness_scales() {
        let jitter = ColorJitter {
            brightness: 2.0,
            ..Default::default()
        };
        assert_eq!(apply(&jitter, &[64, 100, 10]), vec![128, 200, 20]);
        assert_eq!(apply(&jitter, &[200, 200, 200]), vec![255, 255, 255]);
    }

    #[test]
    fn test_contrast_zero_is_flat_gray() {
        let jitter = ColorJitter {
            contrast: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&jitter, &[0, 90, 255]), vec![128, 128, 128]);
    }

    #[test]
    fn test_contrast_spreads_from_mid() {
        let jitter = ColorJitter {
            contrast: 2.0,
            ..Default::default()
        };
        let result = apply(&jitter, &[100, 128, 150]);
        assert_eq!(result, vec![72, 128, 172]);
    }

    // ===== Saturation / Hue Tests =====

    #[test]
    fn test_zero_saturation_equalizes_channels() {
        let jitter = ColorJitter {
            saturation: 0.0,
            ..Default::default()
        };
        let result = apply(&jitter, &[200, 128, 100]);
        assert_eq!(result[0], result[1]);
        assert_eq!(result[1], result[2]);
    }

    #[test]
    fn test_saturation_increases_spread() {
        let jitter = ColorJitter {
            saturation: 1.5,
            ..Default::default()
        };
        let result = apply(&jitter, &[160, 128, 100]);
        let orig_diff = 160 - 100;
        let new_diff = result[0] as i32 - result[2] as i32;
        assert!(new_diff > orig_diff, "Color difference should increase");
    }

    #[test]
    fn test_hue_rotation_keeps_gray() {
        let jitter = ColorJitter {
            hue: 90.0,
            ..Default::default()
        };
        let result = apply(&jitter, &[90, 90, 90]);
        for v in result {
            assert!((v as i32 - 90).abs() <= 1);
        }
    }

    #[test]
    fn test_hue_rotation_changes_color() {
        let jitter = ColorJitter {
            hue: 120.0,
            ..Default::default()
        };
        let result = apply(&jitter, &[220, 40, 40]);
        assert_ne!(result, vec![220, 40, 40]);
    }

    // ===== GrayScale Tests =====

    #[test]
    fn test_grayscale_equal_channels() {
        for pixel in [[255, 0, 0], [0, 255, 0], [0, 0, 255], [37, 180, 222]] {
            let result = apply(&GrayScale, &pixel);
            assert_eq!(result[0], result[1], "{pixel:?} -> {result:?}");
            assert_eq!(result[1], result[2], "{pixel:?} -> {result:?}");
        }
    }

    #[test]
    fn test_grayscale_uses_luma_weights() {
        // Green carries the most luma
        let red = apply(&GrayScale, &[255, 0, 0])[0];
        let green = apply(&GrayScale, &[0, 255, 0])[0];
        let blue = apply(&GrayScale, &[0, 0, 255])[0];
        assert!(green > red && red > blue);
        assert!((green as i32 - 150).abs() <= 1);
    }

    #[test]
    fn test_grayscale_keeps_gray_pixels() {
        let result = apply(&GrayScale, &[77, 77, 77]);
        assert_eq!(result, vec![77, 77, 77]);
    }

    #[test]
    fn test_alpha_passes_through() {
        let result = apply(&GrayScale, &[255, 0, 0, 42]);
        assert_eq!(result.len(), 4);
        assert_eq!(result[3], 42);
        assert_eq!(result[0], result[2]);
    }

    #[test]
    fn test_rejects_single_channel() {
        let img = PixelArray::filled(2, 2, &[10]);
        let err = GrayScale.apply(img).unwrap_err();
        assert!(matches!(
            err,
            EngineError::UnsupportedChannels { channels: 1, .. }
        ));
    }

    #[test]
    fn test_from_params_defaults() {
        let params = ParameterSet::defaults(ColorJitter::NAME, &ColorJitter::schema());
        assert_eq!(ColorJitter::from_params(&params).unwrap(), ColorJitter::default());
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================
