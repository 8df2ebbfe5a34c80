//! Error taxonomy shared by every measurement and rectification stage.

use thiserror::Error;

/// Errors raised synchronously by camera, geometry and measurement operations.
///
/// There are no partial results: an operation either returns a fully valid
/// value or one of these variants.
#[derive(Debug, Error)]
pub enum RulerError {
    /// Non-positive physical dimensions, malformed arity or out-of-range options.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),
    /// Wrong number of points or wrong dimensionality for the operation.
    #[error("invalid polygon: {0}")]
    InvalidPolygon(String),
    /// Perspective correction requested on a camera without sensor shape.
    #[error("missing calibration: {0}")]
    MissingCalibration(String),
    /// Degenerate geometry, e.g. a zero or negative sensor length.
    #[error("invalid measurement: {0}")]
    InvalidMeasurement(String),
    /// The interactive capture collaborator reported cancellation.
    #[error("interactive capture aborted")]
    InteractiveAborted,
    /// Projective transform could not be estimated.
    #[error("homography estimation failed: {0}")]
    Homography(String),
    /// The image warping collaborator failed.
    #[error("image warp failed: {0}")]
    Warp(String),
}

pub type Result<T> = std::result::Result<T, RulerError>;

impl RulerError {
    pub(crate) fn param(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn polygon(msg: impl Into<String>) -> Self {
        Self::InvalidPolygon(msg.into())
    }
}
