//! Rectification of obliquely viewed quadrilaterals.
//!
//! The [`Rectifier`] turns four image points into a fronto-parallel
//! rectangle: it derives the target rectangle ([`compute_output_polygon`]),
//! places it on a canvas, solves the exact four-point homography and hands
//! the pixel work to an [`ImageWarper`].
//!
//! Points may come from the caller or from a [`PolygonCapture`]
//! collaborator; [`InteractiveCapture`] drives any [`PointPicker`] UI
//! through the pick/confirm/retry loop.

mod angle;
pub mod capture;
mod rectify;
pub mod warp;

pub use angle::*;
pub use capture::{
    CaptureOptions, CaptureOutcome, CaptureState, InteractiveCapture, PointPicker, PolygonCapture,
};
pub use rectify::*;
pub use warp::{ImageWarper, InterpolationKind, ProjectiveWarper};
