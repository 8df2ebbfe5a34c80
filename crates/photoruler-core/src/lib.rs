//! Core math and measurement primitives for `photoruler`.
//!
//! This crate contains:
//! - linear algebra type aliases (`Real`, `Pt2`, `Mat3`, ...),
//! - the immutable calibrated [`Camera`] and its unit conversions,
//! - N-dimensional [`Polygon`] utilities (bounds, centering, resizing, ordering),
//! - foreshortening compensation ([`correct_perspective`]),
//! - the similar-triangles [`Ruler`] converting pixels to centimetres.
//!
//! Measurement pipeline:
//! `pixels -> sensor cm (perspective corrected) -> magnification -> real cm`

/// Calibrated camera model.
pub mod camera;
/// Error taxonomy.
pub mod error;
/// N-dimensional polygon utilities.
pub mod geometry;
/// Linear algebra type aliases and helpers.
pub mod math;
/// Viewing-angle compensation.
pub mod perspective;
mod ruler;

pub use camera::*;
pub use error::*;
pub use geometry::*;
pub use math::*;
pub use perspective::*;
pub use ruler::*;
