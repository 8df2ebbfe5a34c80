//! Projective transforms for `photoruler`.
//!
//! - [`perspective_transform`]: exact transform for four correspondences,
//!   used to rectify a quadrilateral.
//! - [`apply_homography`]: map a point with perspective division.
//! - [`rotation_about_center`]: in-plane rotation of an image about its center.

mod homography;
mod rotation;

pub use homography::*;
pub use rotation::*;
