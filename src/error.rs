//! Errors and non-fatal warnings raised while building a transform.

use std::fmt;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, TransformError>;

/// Everything that can stop a transform, a matrix operation or an export.
#[derive(Debug, Error)]
pub enum TransformError {
    /// The vector space name is not `rectangular` or `circular`.
    #[error("vector space type '{0}' is not supported, available types are: rectangular, circular")]
    InvalidDomain(String),

    /// The transformation name is not one of the five families.
    #[error(
        "matrix type '{0}' is not supported, available types are: rotation, scaling, shearing, reflection, collapse"
    )]
    UnsupportedTransform(String),

    /// A parameter table is keyed by something that is not a transformation kind.
    #[error("parameter key '{key}' does not name a matrix type, available types are: {available}")]
    UnknownParameterKey { key: String, available: String },

    /// A vector space must hold at least one point.
    #[error("a vector space needs at least one point")]
    EmptyPointSet,

    #[error("coordinate lists differ in length: {xs} x values, {ys} y values")]
    LengthMismatch { xs: usize, ys: usize },

    #[error("matrix must be square and non-empty")]
    NotSquare,

    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("matrix cannot be inverted, det(A) = 0")]
    SingularMatrix,

    #[error("angle is undefined for a zero-length vector")]
    ZeroLengthVector,

    /// A simulation input is out of its physical range.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: &'static str },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("json serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TransformError {
    pub(crate) fn invalid(name: &'static str, reason: &'static str) -> TransformError {
        TransformError::InvalidParameter { name, reason }
    }
}

/// A recoverable problem in a parameter table. The transform still gets built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamWarning {
    /// The kind's table is present but lacks a sub-key; its default is used.
    MissingSubParameter { kind: String, key: &'static str },
    /// The kind's table carries a sub-key that kind does not read.
    UnexpectedSubParameter { kind: String, key: String },
    /// Two tables name the same kind in different case; `key` is the one that won.
    DuplicateTable { kind: String, key: String },
}

impl fmt::Display for ParamWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamWarning::MissingSubParameter { kind, key } => write!(
                f,
                "expected parameter '{key}' not provided for type '{kind}', using default value"
            ),
            ParamWarning::UnexpectedSubParameter { kind, key } => {
                write!(f, "parameter '{key}' is not used by type '{kind}', ignoring it")
            }
            ParamWarning::DuplicateTable { kind, key } => write!(
                f,
                "type '{kind}' has more than one parameter table, values from '{key}' override the others"
            ),
        }
    }
}
