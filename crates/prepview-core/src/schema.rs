//! Parameter schemas: which knobs a method exposes and their defaults.
//!
//! A [`ParameterSchema`] is the sole source of truth for what a caller may
//! override. Handlers only read keys that appear in their schema, and the
//! resolver only produces keys that appear in it.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primitive type a parameter is coerced to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    /// 64-bit float.
    Float,
    /// 64-bit signed integer.
    Int,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float => write!(f, "float"),
            Self::Int => write!(f, "int"),
        }
    }
}

/// A typed parameter value.
// Int is listed first so untagged deserialization keeps whole numbers integral.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Float(f64),
}

impl ParamValue {
    /// The kind this value belongs to.
    pub const fn kind(self) -> ParamKind {
        match self {
            Self::Float(_) => ParamKind::Float,
            Self::Int(_) => ParamKind::Int,
        }
    }

    /// Numeric value widened to `f64`.
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Float(v) => v,
            Self::Int(v) => v as f64,
        }
    }

    /// Numeric value as an integer, truncating floats toward zero.
    pub fn as_i64(self) -> i64 {
        match self {
            Self::Float(v) => v as i64,
            Self::Int(v) => v,
        }
    }
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(v) => write!(f, "{v}"),
            Self::Int(v) => write!(f, "{v}"),
        }
    }
}

/// Declaration of a single tunable parameter.
///
/// `label`, `min`, `max` and `step` are hints for whoever renders an
/// input control; the resolver ignores them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSpec {
    /// Key used in overrides and in the resolved parameter set.
    pub name: String,
    /// Human-readable label.
    pub label: String,
    /// Value used when the caller supplies no override.
    pub default: ParamValue,
    /// Suggested lower bound for input controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper bound for input controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Suggested increment for input controls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

impl ParamSpec {
    /// Declare a float parameter.
    pub fn float(name: &str, label: &str, default: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            default: ParamValue::Float(default),
            min: None,
            max: None,
            step: None,
        }
    }

    /// Declare an integer parameter.
    pub fn int(name: &str, label: &str, default: i64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            default: ParamValue::Int(default),
            min: None,
            max: None,
            step: None,
        }
    }

    /// Attach a lower-bound hint.
    pub fn with_min(mut self, min: f64) -> Self {
        self.min = Some(min);
        self
    }

    /// Attach an upper-bound hint.
    pub fn with_max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    /// Attach a step hint.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Declared type of this parameter.
    pub fn kind(&self) -> ParamKind {
        self.default.kind()
    }
}

/// Ordered, immutable list of the parameters a method accepts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterSchema {
    params: Vec<ParamSpec>,
}

impl ParameterSchema {
    /// A schema with no tunable parameters.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a schema from parameter declarations.
    ///
    /// Later declarations with a name already seen are dropped, so every key
    /// appears exactly once.
    pub fn new(params: impl IntoIterator<Item = ParamSpec>) -> Self {
        let mut unique: Vec<ParamSpec> = Vec::new();
        for spec in params {
            if unique.iter().all(|p| p.name != spec.name) {
                unique.push(spec);
            }
        }
        Self { params: unique }
    }

    /// Declarations in order.
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Look up a declaration by name.
    pub fn get(&self, name: &str) -> Option<&ParamSpec> {
        self.params.iter().find(|p| p.name == name)
    }

    /// Parameter names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.params.iter().map(|p| p.name.as_str())
    }

    /// Number of declared parameters.
    pub fn len(&self) -> usize {
        self.params.len()
    }

    /// True when the method has nothing to tune.
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
