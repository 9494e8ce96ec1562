//! Gaussian blur, delegated to `image::imageops`.

use super::{check_buffer, EngineError, TransformHandler, TransformMethod};
use crate::error::InvokeError;
use crate::params::ParameterSet;
use crate::pixels::PixelArray;
use crate::schema::{ParamSpec, ParameterSchema};

/// Largest accepted sigma; the blur kernel grows linearly with it.
const MAX_SIGMA: f32 = 1000.0;

/// Isotropic Gaussian blur with standard deviation `sigma` (in pixels).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianBlur {
    sigma: f32,
}

impl Default for GaussianBlur {
    fn default() -> Self {
        Self { sigma: 5.0 }
    }
}

impl GaussianBlur {
    /// Returns `None` unless `sigma` is a normal float in `(0, 1000]`.
    pub fn new(sigma: f32) -> Option<Self> {
        (sigma.is_normal() && sigma > 0.0 && sigma <= MAX_SIGMA).then_some(Self { sigma })
    }

    pub fn sigma(&self) -> f32 {
        self.sigma
    }
}

impl TransformHandler for GaussianBlur {
    fn method(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, image: PixelArray) -> Result<PixelArray, EngineError> {
        check_buffer(&image)?;
        let (height, width, channels) = image.shape();

        let dynamic = image
            .into_dynamic()
            .ok_or(EngineError::UnsupportedChannels {
                channels,
                expected: "1, 2, 3 or 4",
            })?;

        let blurred = dynamic.blur(self.sigma);
        Ok(PixelArray::new(height, width, channels, blurred.into_bytes()))
    }
}

impl TransformMethod for GaussianBlur {
    const NAME: &'static str = "dali.gaussian_blur";

    fn schema() -> ParameterSchema {
        ParameterSchema::new([ParamSpec::float("sigma", "Sigma", 5.0)
            .with_step(0.01)
            .with_max(f64::from(MAX_SIGMA))])
    }

    /// The range check runs on the `f32` the blur will actually use, so
    /// values that underflow to zero or overflow to infinity are rejected.
    fn from_params(params: &ParameterSet) -> Result<Self, InvokeError> {
        let sigma = params.float("sigma")?;
        Self::new(sigma as f32).ok_or_else(|| {
            InvokeError::invalid(
                params.method(),
                "sigma",
                sigma.to_string(),
                format!("sigma must be positive and at most {MAX_SIGMA}"),
            )
        })
    }
}
