//! Prepview WASM - WebAssembly bindings for Prepview
//!
//! This crate exposes the prepview-core dispatcher to JavaScript/TypeScript
//! applications.
//!
//! # Module Structure
//!
//! - `invoke` - Method dispatch and schema discovery
//! - `types` - WASM-compatible wrapper types for image data
//! - `encode` - JPEG and PNG encoding of results
//!
//! # Usage
//!
//! ```typescript
//! import init, { invoke, list_methods } from '@prepview/wasm';
//!
//! await init();
//!
//! console.log(list_methods());
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = invoke('dali.gaussian_blur', { sigma: '2.0' }, bytes);
//! ```

use wasm_bindgen::prelude::*;

mod encode;
mod invoke;
mod types;

pub use encode::{encode_jpeg_from_image, encode_png_from_image};
pub use invoke::{invoke, list_methods, method_defaults, method_schema};
pub use types::JsPixelArray;

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    let methods = invoke::invoker().registry().len();
    web_sys::console::debug_1(&JsValue::from_str(&format!(
        "prepview ready with {} methods",
        methods
    )));
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
