//! Pixel resampling collaborators.

use image::{Rgba, RgbaImage};
use imageproc::geometric_transformations::{warp_into, Interpolation, Projection};
use photoruler_core::{Mat3, Result, RulerError};
use serde::{Deserialize, Serialize};

/// Resamples an image through a projective transform.
///
/// `transform` maps input pixel coordinates to output pixel coordinates;
/// `output_size` is `[width, height]`.
pub trait ImageWarper {
    type Image;

    fn warp(&self, image: &Self::Image, transform: &Mat3, output_size: [u32; 2]) -> Result<Self::Image>;

    /// `[width, height]` of `image`.
    fn dimensions(&self, image: &Self::Image) -> [u32; 2];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterpolationKind {
    Nearest,
    #[default]
    Bilinear,
    Bicubic,
}

impl From<InterpolationKind> for Interpolation {
    fn from(kind: InterpolationKind) -> Self {
        match kind {
            InterpolationKind::Nearest => Interpolation::Nearest,
            InterpolationKind::Bilinear => Interpolation::Bilinear,
            InterpolationKind::Bicubic => Interpolation::Bicubic,
        }
    }
}

/// [`ImageWarper`] for RGBA images backed by `imageproc`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectiveWarper {
    pub interpolation: InterpolationKind,
    /// Colour of output pixels that fall outside the source image.
    pub fill: [u8; 4],
}

impl Default for ProjectiveWarper {
    fn default() -> Self {
        Self {
            interpolation: InterpolationKind::Bilinear,
            fill: [0, 0, 0, 0],
        }
    }
}

impl ImageWarper for ProjectiveWarper {
    type Image = RgbaImage;

    fn warp(&self, image: &RgbaImage, transform: &Mat3, output_size: [u32; 2]) -> Result<RgbaImage> {
        let [width, height] = output_size;
        if width == 0 || height == 0 {
            return Err(RulerError::Warp(format!(
                "output size must be positive, got {width}x{height}"
            )));
        }

        let projection = to_projection(transform)?;

        let mut output = RgbaImage::new(width, height);
        warp_into(
            image,
            &projection,
            self.interpolation.into(),
            Rgba(self.fill),
            &mut output,
        );
        Ok(output)
    }

    fn dimensions(&self, image: &RgbaImage) -> [u32; 2] {
        [image.width(), image.height()]
    }
}

/// `imageproc` scales its matrix by `H[2,2]`, so that entry must be usable
/// on top of the whole transform being invertible.
fn to_projection(transform: &Mat3) -> Result<Projection> {
    if transform.iter().any(|v| !v.is_finite()) {
        return Err(RulerError::Warp("transform has non-finite entries".into()));
    }
    let scale = transform[(2, 2)];
    if scale.abs() <= f64::EPSILON {
        return Err(RulerError::Warp(format!(
            "transform must have a non-zero H[2,2], got {scale}"
        )));
    }
    if transform.try_inverse().is_none() {
        return Err(RulerError::Warp("transform is not invertible".into()));
    }

    let normalized = transform / scale;
    let mut matrix = [0f32; 9];
    for r in 0..3 {
        for c in 0..3 {
            matrix[3 * r + c] = normalized[(r, c)] as f32;
        }
    }
    Projection::from_matrix(matrix)
        .ok_or_else(|| RulerError::Warp("transform is not invertible".into()))
}
