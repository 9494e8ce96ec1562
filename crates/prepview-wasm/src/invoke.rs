//! Method dispatch WASM bindings.
//!
//! # Functions
//!
//! - [`invoke`] - Decode image bytes and apply a named method
//! - [`list_methods`] - Names of the registered methods
//! - [`method_schema`] - Parameter schema of one method
//! - [`method_defaults`] - Effective parameters for a set of overrides
//!
//! # Example
//!
//! ```typescript
//! import { invoke, method_schema } from '@prepview/wasm';
//!
//! const schema = method_schema('dali.solorize');
//! const bytes = new Uint8Array(await file.arrayBuffer());
//! const out = invoke('dali.solorize', { threshold: '100' }, bytes);
//! console.log(`${out.width}x${out.height}x${out.channels}`);
//! ```
//!
//! Errors are thrown as `Error` objects whose `name` is the error class
//! (`NotFound`, `BadRequest` or `Internal`).

use std::collections::HashMap;
use std::sync::OnceLock;

use prepview_core::{ErrorKind, ImageSource, InvokeError, PipelineInvoker};
use serde::Deserialize;
use wasm_bindgen::prelude::*;

use crate::types::JsPixelArray;

static INVOKER: OnceLock<PipelineInvoker> = OnceLock::new();

/// The process-wide invoker, built with the built-in methods on first use.
pub(crate) fn invoker() -> &'static PipelineInvoker {
    INVOKER.get_or_init(PipelineInvoker::default)
}

/// Decode `bytes` and apply `method` with string overrides.
///
/// # Arguments
///
/// * `method` - Method name, e.g. `dali.gray_scale`
/// * `overrides` - Plain object of parameter overrides (strings or numbers), or `undefined`
/// * `bytes` - Encoded image (JPEG or PNG)
#[wasm_bindgen]
pub fn invoke(method: &str, overrides: JsValue, bytes: &[u8]) -> Result<JsPixelArray, JsValue> {
    let overrides = overrides_from_js(overrides)?;
    invoke_bytes(method, &overrides, bytes).map_err(|e| {
        web_sys::console::warn_1(&JsValue::from_str(&e.to_string()));
        to_js_error(&e)
    })
}

/// Names of all registered methods, in registration order.
#[wasm_bindgen]
pub fn list_methods() -> Vec<String> {
    invoker().registry().names().map(String::from).collect()
}

/// Parameter schema of `method` as a plain object.
#[wasm_bindgen]
pub fn method_schema(method: &str) -> Result<JsValue, JsValue> {
    let entry = invoker().registry().lookup(method).map_err(|e| to_js_error(&e))?;
    serde_wasm_bindgen::to_value(&entry.schema)
        .map_err(|e| js_error(ErrorKind::Internal, &e.to_string()))
}

/// Effective parameters `method` would run with under `overrides`.
#[wasm_bindgen]
pub fn method_defaults(method: &str, overrides: JsValue) -> Result<JsValue, JsValue> {
    let overrides = overrides_from_js(overrides)?;
    let params = invoker()
        .resolve(method, &overrides)
        .map_err(|e| to_js_error(&e))?;
    serde_wasm_bindgen::to_value(&params.to_string_map())
        .map_err(|e| js_error(ErrorKind::Internal, &e.to_string()))
}

pub(crate) fn invoke_bytes(
    method: &str,
    overrides: &HashMap<String, String>,
    bytes: &[u8],
) -> Result<JsPixelArray, InvokeError> {
    invoker()
        .invoke(method, overrides, ImageSource::Bytes(bytes))
        .map(JsPixelArray::from_pixels)
}

pub(crate) fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::NotFound => "NotFound",
        ErrorKind::BadRequest => "BadRequest",
        ErrorKind::Internal => "Internal",
    }
}

/// A JS `Error` with `name` set to the error class.
fn js_error(kind: ErrorKind, message: &str) -> JsValue {
    let error = js_sys::Error::new(message);
    error.set_name(kind_name(kind));
    error.into()
}

fn to_js_error(error: &InvokeError) -> JsValue {
    js_error(error.kind(), &error.to_string())
}

/// One override as sent from JavaScript.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum JsOverride {
    Text(String),
    Number(f64),
}

impl JsOverride {
    pub(crate) fn into_raw(self) -> String {
        match self {
            JsOverride::Text(text) => text,
            JsOverride::Number(value) => value.to_string(),
        }
    }
}

/// Read a plain `{ key: value }` object into string overrides.
fn overrides_from_js(value: JsValue) -> Result<HashMap<String, String>, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(HashMap::new());
    }
    let parsed: HashMap<String, JsOverride> = serde_wasm_bindgen::from_value(value).map_err(|e| {
        js_error(
            ErrorKind::BadRequest,
            &format!("Overrides must map names to strings or numbers: {}", e),
        )
    })?;
    Ok(parsed
        .into_iter()
        .map(|(key, raw)| (key, raw.into_raw()))
        .collect())
}
