//! Estimate real-world lengths and distances from photographs.
//!
//! ```no_run
//! use photoruler::CameraCatalog;
//!
//! # fn main() -> anyhow::Result<()> {
//! let ruler = CameraCatalog::with_reference_presets().ruler(CameraCatalog::CANON_EOS_R6)?;
//!
//! // A 150 cm object spanning 3179 px, seen fronto-parallel.
//! let distance_cm = ruler.distance_to_object(3179.0, 150.0, None, 0.0)?;
//! let length_cm = ruler.object_length_in_cm(distance_cm, 3179.0, None, 0.0)?;
//! println!("{distance_cm:.1} cm away, {length_cm:.1} cm long");
//! # Ok(())
//! # }
//! ```
//!
//! Rectifying a quadrilateral:
//!
//! ```no_run
//! use photoruler::pipeline::{AngleSpec, ProjectiveWarper, RectifyOptions, Rectifier};
//! use photoruler::core::Polygon;
//!
//! # fn main() -> anyhow::Result<()> {
//! let image = image::open("board.jpg")?.to_rgba8();
//! let corners = Polygon::from_rows(&[[120.0, 80.0], [620.0, 110.0], [590.0, 460.0], [90.0, 400.0]])?;
//! let opts = RectifyOptions {
//!     angle: AngleSpec::Scalar { degrees: 30.0 },
//!     ..Default::default()
//! };
//! let rectified = Rectifier::new(ProjectiveWarper::default()).rectify(&image, &corners, &opts)?;
//! rectified.image.save("board-rectified.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Organization
//!
//! - **[`core`]**: camera model, polygon utilities, perspective correction, ruler
//! - **[`linear`]**: homography estimation and rotation transforms
//! - **[`pipeline`]**: rectifier, interactive capture, image warping
//! - **[`CameraCatalog`]**: named camera calibrations

mod catalog;

pub use catalog::CameraCatalog;

/// Camera model, polygon utilities, perspective correction and the ruler.
pub mod core {
    pub use photoruler_core::*;
}

/// Projective transform estimation.
pub mod linear {
    pub use photoruler_linear::*;
}

/// Quadrilateral rectification.
pub mod pipeline {
    pub use photoruler_pipeline::*;
}

/// Convenient re-exports for common use cases.
pub mod prelude {
    pub use crate::core::{
        Camera, CameraParams, Known, Measurement, MeasurementResult, Polygon, Pt2, Real, Ruler,
        RulerError, Unit,
    };
    pub use crate::pipeline::{AngleSpec, ProjectiveWarper, RectifyOptions, Rectifier};
    pub use crate::CameraCatalog;
}
