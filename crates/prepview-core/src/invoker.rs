//! One-shot execution of a named method on one image.
//!
//! # Steps
//!
//! 1. Look up the method in the registry
//! 2. Resolve overrides against its schema
//! 3. Build the handler (domain checks on parameters happen here)
//! 4. Decode the source
//! 5. Apply the handler and check the output kept the input's height/width
//!
//! Building the handler before decoding means a bad parameter is reported
//! without reading the source at all.
//!
//! Every call builds its own handler and owns its own pixels; the invoker
//! itself is immutable and can be shared between threads.

use std::collections::HashMap;

use crate::config::InvokerConfig;
use crate::decode::{decode, ImageSource};
use crate::error::InvokeError;
use crate::handler::{EngineError, TransformHandler};
use crate::params::{resolve, ParameterSet};
use crate::pixels::PixelArray;
use crate::registry::MethodRegistry;

/// Dispatches `(method, overrides, image)` requests to transform handlers.
#[derive(Debug, Clone)]
pub struct PipelineInvoker {
    registry: MethodRegistry,
    config: InvokerConfig,
}

impl Default for PipelineInvoker {
    fn default() -> Self {
        Self::new(MethodRegistry::builtin(), InvokerConfig::default())
    }
}

impl PipelineInvoker {
    pub fn new(registry: MethodRegistry, config: InvokerConfig) -> Self {
        Self { registry, config }
    }

    /// The registry this invoker dispatches through.
    pub fn registry(&self) -> &MethodRegistry {
        &self.registry
    }

    pub fn config(&self) -> &InvokerConfig {
        &self.config
    }

    /// Resolve overrides for `method` without running anything.
    ///
    /// # Errors
    ///
    /// `UnknownMethod` if the method is not registered, `InvalidParameter`
    /// if an override cannot be coerced.
    pub fn resolve(
        &self,
        method: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<ParameterSet, InvokeError> {
        let entry = self.registry.lookup(method)?;
        resolve(method, &entry.schema, overrides)
    }

    /// Decode `source` and apply `method` to it.
    ///
    /// # Errors
    ///
    /// - `UnknownMethod` if the method is not registered
    /// - `InvalidParameter` if an override cannot be coerced or is out of domain
    /// - `ImageDecode` if the source is unreadable or not an image
    /// - `Execution` if the transform itself fails
    pub fn invoke(
        &self,
        method: &str,
        overrides: &HashMap<String, String>,
        source: ImageSource<'_>,
    ) -> Result<PixelArray, InvokeError> {
        let _span = tracing::debug_span!("invoke", method).entered();

        let result = self.prepare(method, overrides).and_then(|handler| {
            let image = decode(source, &self.config.decode_options())?;
            tracing::debug!(width = image.width, height = image.height, "Decoded source");
            run(method, handler.as_ref(), image)
        });
        report(method, result)
    }

    /// Apply `method` to an already decoded image.
    pub fn invoke_pixels(
        &self,
        method: &str,
        overrides: &HashMap<String, String>,
        image: PixelArray,
    ) -> Result<PixelArray, InvokeError> {
        let _span = tracing::debug_span!("invoke_pixels", method).entered();

        let result = self
            .prepare(method, overrides)
            .and_then(|handler| run(method, handler.as_ref(), image));
        report(method, result)
    }

    /// Steps 1-3: lookup, resolve, construct.
    fn prepare(
        &self,
        method: &str,
        overrides: &HashMap<String, String>,
    ) -> Result<Box<dyn TransformHandler>, InvokeError> {
        let entry = self.registry.lookup(method)?;
        let params = resolve(method, &entry.schema, overrides)?;
        tracing::debug!(params = ?params.to_string_map(), "Resolved parameters");
        let handler = (entry.factory)(&params)?;
        tracing::debug!(handler = handler.method(), "Constructed handler");
        Ok(handler)
    }
}

/// Apply a handler and check it kept the spatial shape.
///
/// Errors carry `method`, the name the handler was looked up under.
fn run(
    method: &str,
    handler: &dyn TransformHandler,
    image: PixelArray,
) -> Result<PixelArray, InvokeError> {
    let expected = image.dimensions();

    let output = handler
        .apply(image)
        .map_err(|source| InvokeError::Execution {
            method: method.to_string(),
            source,
        })?;

    if output.dimensions() != expected {
        return Err(InvokeError::Execution {
            method: method.to_string(),
            source: EngineError::ShapeMismatch {
                expected,
                actual: output.dimensions(),
            },
        });
    }
    Ok(output)
}

fn report(method: &str, result: Result<PixelArray, InvokeError>) -> Result<PixelArray, InvokeError> {
    match &result {
        Ok(image) => tracing::info!(
            method,
            width = image.width,
            height = image.height,
            "Transform complete"
        ),
        Err(e) => tracing::warn!(method, error = %e, "Transform failed"),
    }
    result
}
