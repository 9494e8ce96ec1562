//! Errors surfaced at the dispatcher boundary.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::handler::EngineError;

/// Coarse classification a transport can map onto its own status codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The requested method does not exist.
    NotFound,
    /// The caller supplied bad parameters or a bad image.
    BadRequest,
    /// The execution engine or registry setup failed.
    Internal,
}

/// Errors from registering, resolving or invoking a method.
#[derive(Debug, Error)]
pub enum InvokeError {
    /// No method is registered under this name.
    #[error("Unknown method: {method}")]
    UnknownMethod { method: String },

    /// A method with this name is already registered.
    #[error("Method already registered: {method}")]
    DuplicateMethod { method: String },

    /// An override could not be coerced, or violates the parameter's domain.
    #[error("Invalid value {raw:?} for parameter '{key}' of {method}: {reason}")]
    InvalidParameter {
        method: String,
        key: String,
        raw: String,
        reason: String,
    },

    /// The image source could not be read or decoded.
    #[error("Failed to decode image: {source}")]
    ImageDecode {
        #[from]
        source: DecodeError,
    },

    /// The execution engine failed while applying the transform.
    #[error("{method} failed: {source}")]
    Execution {
        method: String,
        #[source]
        source: EngineError,
    },
}

impl InvokeError {
    /// Classify this error for transport-level reporting.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::UnknownMethod { .. } => ErrorKind::NotFound,
            Self::InvalidParameter { .. } | Self::ImageDecode { .. } => ErrorKind::BadRequest,
            Self::DuplicateMethod { .. } | Self::Execution { .. } => ErrorKind::Internal,
        }
    }

    /// Name of the offending parameter, if the error concerns one.
    pub fn parameter(&self) -> Option<&str> {
        match self {
            Self::InvalidParameter { key, .. } => Some(key),
            _ => None,
        }
    }

    pub(crate) fn invalid(
        method: &str,
        key: &str,
        raw: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidParameter {
            method: method.to_string(),
            key: key.to_string(),
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}
