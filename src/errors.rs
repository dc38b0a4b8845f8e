//! Errors for the outer surfaces of the crate.
//!
//! Geometry construction and boolean evaluation never fail: degenerate parameters yield
//! degenerate solids. Only configuration loading, parameter lookup by name and raw
//! polyhedron input can be rejected.

use crate::float_types::Real;
use nalgebra::Point3;

/// Problems found in raw geometry handed to the primitive constructors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    /// (IndexOutOfRange) A face references a point that does not exist
    #[error("(IndexOutOfRange) Face index {index} is out of range (points.len = {len})")]
    IndexOutOfRange { index: usize, len: usize },
    /// (TooFewPoints) A face has fewer than three corners
    #[error("(TooFewPoints) A face has fewer than 3 points, starting at: {0}")]
    TooFewPoints(Point3<Real>),
    /// (InvalidCoordinate) The coordinate has a NaN or infinite
    #[error("(InvalidCoordinate) The coordinate ({0}) has a NaN or infinite")]
    InvalidCoordinate(Point3<Real>),
}

/// Errors raised by the parameter panel, config loading and the editor
#[derive(Debug, thiserror::Error)]
pub enum DeviceError {
    /// The panel has no control with this name
    #[error("unknown parameter `{0}`")]
    UnknownParameter(String),
    /// A `name=value` assignment could not be parsed
    #[error("malformed parameter assignment `{0}` (expected name=value)")]
    MalformedAssignment(String),
    /// A boolean knob was written with a number or vice versa
    #[error("parameter `{name}` expects a {expected} value")]
    WrongKind { name: String, expected: &'static str },
    /// Unknown device variant name
    #[error("unknown device variant `{0}`")]
    UnknownVariant(String),
    #[error("failed to parse device configuration: {0}")]
    Config(#[from] serde_json::Error),
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
