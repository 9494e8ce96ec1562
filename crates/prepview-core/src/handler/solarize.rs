//! Threshold inversion.

use super::{check_buffer, EngineError, TransformHandler, TransformMethod};
use crate::error::InvokeError;
use crate::params::ParameterSet;
use crate::pixels::PixelArray;
use crate::schema::{ParamSpec, ParameterSchema};

/// Inverts every sample at or above `threshold`.
///
/// Formula: `out = if in >= threshold { 255 - in } else { in }`, applied to
/// every channel independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Solarize {
    pub threshold: i64,
}

impl Default for Solarize {
    fn default() -> Self {
        Self { threshold: 128 }
    }
}

impl Solarize {
    #[inline]
    fn solarize_sample(&self, sample: u8) -> u8 {
        if i64::from(sample) >= self.threshold {
            255 - sample
        } else {
            sample
        }
    }
}

impl TransformHandler for Solarize {
    fn method(&self) -> &'static str {
        Self::NAME
    }

    fn apply(&self, mut image: PixelArray) -> Result<PixelArray, EngineError> {
        check_buffer(&image)?;

        // Nothing reaches a threshold above the sample range
        if self.threshold > 255 {
            return Ok(image);
        }

        for sample in image.data.iter_mut() {
            *sample = self.solarize_sample(*sample);
        }
        Ok(image)
    }
}

impl TransformMethod for Solarize {
    const NAME: &'static str = "dali.solorize";

    fn schema() -> ParameterSchema {
        ParameterSchema::new([ParamSpec::int("threshold", "Threshold", 128)])
    }

    fn from_params(params: &ParameterSet) -> Result<Self, InvokeError> {
        Ok(Self {
            threshold: params.int("threshold")?,
        })
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Property: Every output sample follows the threshold rule.
        #[test]
        fn prop_sample_rule(
            samples in prop::collection::vec(any::<u8>(), 3..=96),
            threshold in -10i64..300,
        ) {
            let len = samples.len() / 3 * 3;
            let data = samples[..len].to_vec();
            let img = PixelArray::new(1, (len / 3) as u32, 3, data.clone());
            let out = Solarize { threshold }.apply(img).unwrap();

            for (before, after) in data.iter().zip(out.data.iter()) {
                if i64::from(*before) >= threshold {
                    prop_assert_eq!(*after, 255 - *before);
                } else {
                    prop_assert_eq!(*after, *before);
                }
            }
        }
    }
}
