//! Prepview Core - parameterized image transform dispatch
//!
//! This crate maps a method name plus string-typed parameter overrides onto
//! a concrete transform, runs it on a decoded image, and hands back the
//! transformed pixels. Built-in methods:
//!
//! | Method | Parameters |
//! |--------|------------|
//! | `dali.color_jitter` | brightness, contrast, saturation, hue |
//! | `dali.gray_scale` | none |
//! | `dali.solorize` | threshold |
//! | `dali.gaussian_blur` | sigma |
//!
//! ```ignore
//! use std::collections::HashMap;
//! use prepview_core::{ImageSource, PipelineInvoker};
//!
//! let invoker = PipelineInvoker::default();
//! let mut overrides = HashMap::new();
//! overrides.insert("threshold".to_string(), "100".to_string());
//! let pixels = invoker.invoke("dali.solorize", &overrides, ImageSource::Bytes(&bytes))?;
//! ```

pub mod config;
pub mod decode;
pub mod encode;
pub mod error;
pub mod handler;
pub mod invoker;
pub mod params;
pub mod pixels;
pub mod registry;
pub mod schema;

pub use config::InvokerConfig;
pub use decode::{DecodeError, DecodeOptions, ImageSource};
pub use encode::{encode, EncodeError, OutputFormat};
pub use error::{ErrorKind, InvokeError};
pub use handler::{
    ColorJitter, EngineError, GaussianBlur, GrayScale, Solarize, TransformHandler,
    TransformMethod,
};
pub use invoker::PipelineInvoker;
pub use params::{resolve, ParameterSet};
pub use pixels::PixelArray;
pub use registry::{MethodEntry, MethodRegistry};
pub use schema::{ParamKind, ParamSpec, ParamValue, ParameterSchema};
