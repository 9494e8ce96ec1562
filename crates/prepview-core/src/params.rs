//! Merging caller overrides onto schema defaults.
//!
//! Overrides arrive as raw strings (query parameters, form fields). The
//! resolver walks the schema, takes the override for each declared key when
//! one is present and coerces it to the declared kind, and falls back to the
//! default otherwise. Keys the schema does not declare are ignored.

use std::collections::HashMap;

use serde::Serialize;

use crate::error::InvokeError;
use crate::schema::{ParamKind, ParamValue, ParameterSchema};

/// Fully resolved parameters for one invocation.
///
/// Holds exactly the keys of the schema it was resolved against, in
/// declaration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterSet {
    method: String,
    values: Vec<(String, ParamValue)>,
}

impl ParameterSet {
    /// The defaults of `schema`, with no overrides applied.
    pub fn defaults(method: &str, schema: &ParameterSchema) -> Self {
        Self {
            method: method.to_string(),
            values: schema
                .params()
                .iter()
                .map(|p| (p.name.clone(), p.default))
                .collect(),
        }
    }

    /// Method these parameters were resolved for.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Look up a value by key.
    pub fn get(&self, key: &str) -> Option<ParamValue> {
        self.values
            .iter()
            .find(|(name, _)| name == key)
            .map(|(_, value)| *value)
    }

    /// Keys in schema order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|(name, _)| name.as_str())
    }

    /// `(key, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, ParamValue)> {
        self.values.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Number of resolved parameters.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True for methods without parameters.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Read a float parameter.
    ///
    /// A missing key means a handler reads something its schema does not
    /// declare; it is reported as an invalid parameter for that key.
    pub fn float(&self, key: &str) -> Result<f64, InvokeError> {
        self.get(key)
            .map(ParamValue::as_f64)
            .ok_or_else(|| self.undeclared(key))
    }

    /// Read an integer parameter, truncating float values.
    pub fn int(&self, key: &str) -> Result<i64, InvokeError> {
        self.get(key)
            .map(ParamValue::as_i64)
            .ok_or_else(|| self.undeclared(key))
    }

    /// Render values back to strings, e.g. to pre-fill a form.
    pub fn to_string_map(&self) -> HashMap<String, String> {
        self.iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect()
    }

    fn undeclared(&self, key: &str) -> InvokeError {
        InvokeError::invalid(&self.method, key, "", "parameter is not declared by the method")
    }
}

/// Merge `overrides` onto the defaults declared by `schema`.
///
/// # Errors
///
/// Returns `InvokeError::InvalidParameter` naming the key and raw value when
/// an override for a declared key cannot be coerced to its kind.
pub fn resolve(
    method: &str,
    schema: &ParameterSchema,
    overrides: &HashMap<String, String>,
) -> Result<ParameterSet, InvokeError> {
    let mut values = Vec::with_capacity(schema.len());

    for spec in schema.params() {
        let value = match overrides.get(&spec.name) {
            Some(raw) => coerce(spec.kind(), raw)
                .map_err(|reason| InvokeError::invalid(method, &spec.name, raw.as_str(), reason))?,
            None => spec.default,
        };
        values.push((spec.name.clone(), value));
    }

    let ignored = overrides.keys().filter(|k| schema.get(k).is_none()).count();
    if ignored > 0 {
        tracing::debug!(method, ignored, "Ignoring overrides for undeclared parameters");
    }

    Ok(ParameterSet {
        method: method.to_string(),
        values,
    })
}

/// Coerce a raw override string to the given kind.
///
/// Integers accept fractional literals and truncate them toward zero.
fn coerce(kind: ParamKind, raw: &str) -> Result<ParamValue, String> {
    let trimmed = raw.trim();
    match kind {
        ParamKind::Float => {
            let value: f64 = trimmed
                .parse()
                .map_err(|_| format!("expected a {kind}"))?;
            if !value.is_finite() {
                return Err("value must be finite".to_string());
            }
            Ok(ParamValue::Float(value))
        }
        ParamKind::Int => {
            if let Ok(value) = trimmed.parse::<i64>() {
                return Ok(ParamValue::Int(value));
            }
            let value: f64 = trimmed
                .parse()
                .map_err(|_| format!("expected an {kind}"))?;
            if !value.is_finite() {
                return Err("value must be finite".to_string());
            }
            let truncated = value.trunc();
            if truncated < i64::MIN as f64 || truncated > i64::MAX as f64 {
                return Err("value out of range".to_string());
            }
            Ok(ParamValue::Int(truncated as i64))
        }
    }
}


// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use crate::schema::ParamSpec;
    use proptest::prelude::*;

    fn schema() -> ParameterSchema {
        ParameterSchema::new([
            ParamSpec::float("brightness", "Brightness", 1.0),
            ParamSpec::float("hue", "Hue", 0.0),
            ParamSpec::int("threshold", "Threshold", 128),
        ])
    }

    /// Strategy for override keys that the schema never declares.
    fn foreign_key_strategy() -> impl Strategy<Value = String> {
        "[a-z_]{1,12}".prop_filter("must not be declared", |k| {
            !matches!(k.as_str(), "brightness" | "hue" | "threshold")
        })
    }

    proptest! {
        /// Property: Resolved keys always equal the schema keys.
        #[test]
        fn prop_keys_match_schema(
            extra in prop::collection::hash_map(foreign_key_strategy(), ".*", 0..8),
        ) {
            let schema = schema();
            let params = resolve("m", &schema, &extra).unwrap();

            let keys: Vec<&str> = params.keys().collect();
            let expected: Vec<&str> = schema.names().collect();
            prop_assert_eq!(keys, expected);
            prop_assert_eq!(params, ParameterSet::defaults("m", &schema));
        }

        /// Property: Integer overrides round-trip exactly.
        #[test]
        fn prop_int_override_round_trips(threshold in any::<i64>()) {
            let mut overrides = HashMap::new();
            overrides.insert("threshold".to_string(), threshold.to_string());

            let params = resolve("m", &schema(), &overrides).unwrap();
            prop_assert_eq!(params.int("threshold").unwrap(), threshold);
            prop_assert_eq!(params.float("brightness").unwrap(), 1.0);
        }

        /// Property: Finite float overrides are taken verbatim.
        #[test]
        fn prop_float_override_taken(hue in -1.0e6f64..1.0e6) {
            let mut overrides = HashMap::new();
            overrides.insert("hue".to_string(), hue.to_string());

            let params = resolve("m", &schema(), &overrides).unwrap();
            prop_assert_eq!(params.float("hue").unwrap(), hue);
        }
    }
}
