//! Image encoding WASM bindings.
//!
//! # Functions
//!
//! - [`encode_jpeg_from_image`] - Encode a JsPixelArray to JPEG bytes
//! - [`encode_png_from_image`] - Encode a JsPixelArray to PNG bytes
//!
//! # Example
//!
//! ```typescript
//! import { invoke, encode_png_from_image } from '@prepview/wasm';
//!
//! const out = invoke('dali.gray_scale', undefined, bytes);
//! const png = encode_png_from_image(out);
//! const blob = new Blob([png], { type: 'image/png' });
//! ```

use prepview_core::encode;
use wasm_bindgen::prelude::*;

use crate::types::JsPixelArray;

/// Encode an image to JPEG bytes.
///
/// # Arguments
///
/// * `image` - Image to encode; alpha is dropped
/// * `quality` - JPEG quality (1-100, where 100 is highest quality, recommended: 90)
///
/// # Errors
///
/// Returns an error if the buffer does not match the dimensions, a dimension
/// is zero, or the channel layout is not encodable.
#[wasm_bindgen]
pub fn encode_jpeg_from_image(image: &JsPixelArray, quality: u8) -> Result<Vec<u8>, JsValue> {
    encode::encode_jpeg(image.as_pixels(), quality).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Encode an image to lossless PNG bytes, keeping alpha.
#[wasm_bindgen]
pub fn encode_png_from_image(image: &JsPixelArray) -> Result<Vec<u8>, JsValue> {
    encode::encode_png(image.as_pixels()).map_err(|e| JsValue::from_str(&e.to_string()))
}
