//! Transform handlers: the executable side of a method.
//!
//! A handler is built fresh for every invocation from a resolved
//! [`ParameterSet`] and applied to exactly one decoded image. Handlers hold
//! nothing but their constructor parameters.
//!
//! # Methods
//!
//! | Key | Handler | Parameters |
//! |-----|---------|------------|
//! | `dali.color_jitter` | [`ColorJitter`] | brightness, contrast, saturation, hue |
//! | `dali.gray_scale` | [`GrayScale`] | none |
//! | `dali.solorize` | [`Solarize`] | threshold |
//! | `dali.gaussian_blur` | [`GaussianBlur`] | sigma |

mod blur;
mod color;
mod solarize;

pub use blur::GaussianBlur;
pub use color::{ColorJitter, ColorTwist, GrayScale};
pub use solarize::Solarize;

use thiserror::Error;

use crate::error::InvokeError;
use crate::params::ParameterSet;
use crate::pixels::PixelArray;
use crate::schema::ParameterSchema;

/// Failures raised while executing a transform.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The transform cannot handle this channel layout.
    #[error("Unsupported channel count {channels}, expected {expected}")]
    UnsupportedChannels { channels: u8, expected: &'static str },

    /// The pixel buffer does not match the declared shape.
    #[error("Invalid pixel buffer: expected {expected} bytes, got {actual}")]
    InvalidBuffer { expected: usize, actual: usize },

    /// The transform returned an image of a different spatial shape.
    #[error("Output shape {actual:?} differs from input shape {expected:?}")]
    ShapeMismatch {
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// A transform ready to run on one image.
pub trait TransformHandler: Send {
    /// Registry key of the method this handler implements.
    fn method(&self) -> &'static str;

    /// Apply the transform, producing an image of the same height and width.
    fn apply(&self, image: PixelArray) -> Result<PixelArray, EngineError>;
}

/// A named method: its schema plus how to build its handler.
pub trait TransformMethod: TransformHandler + Sized + 'static {
    /// Registry key.
    const NAME: &'static str;

    /// Parameters this method accepts.
    fn schema() -> ParameterSchema;

    /// Build the handler from resolved parameters, checking domain
    /// constraints the schema cannot express.
    fn from_params(params: &ParameterSet) -> Result<Self, InvokeError>;
}

/// Builds a handler from resolved parameters.
pub type HandlerFactory = fn(&ParameterSet) -> Result<Box<dyn TransformHandler>, InvokeError>;

/// Type-erased factory for a [`TransformMethod`].
pub fn factory<M: TransformMethod>(params: &ParameterSet) -> Result<Box<dyn TransformHandler>, InvokeError> {
    Ok(Box::new(M::from_params(params)?))
}

/// Check that the buffer length agrees with the declared shape.
pub(crate) fn check_buffer(image: &PixelArray) -> Result<(), EngineError> {
    let expected = PixelArray::expected_len(image.height, image.width, image.channels);
    if image.data.len() != expected {
        return Err(EngineError::InvalidBuffer {
            expected,
            actual: image.data.len(),
        });
    }
    Ok(())
}
