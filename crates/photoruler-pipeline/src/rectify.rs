use log::{debug, warn};
use photoruler_core::{center_polygon, order_clockwise, polygon_shape, validate_pad, CenterOptions, Mat3, Polygon, Pt2, Real, Result, RulerError};
use photoruler_linear::{perspective_transform, rotation_about_center};
use serde::{Deserialize, Serialize};

use crate::{compute_output_polygon, AngleSpec, CaptureOutcome, ImageWarper, PolygonCapture};

const QUAD_SIDES: usize = 4;

/// How the rectified region is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RectifyOptions {
    /// Canvas `[width, height]`. When unset, the canvas is exactly the size
    /// of the rectified region.
    pub output_shape: Option<[u32; 2]>,
    pub angle: AngleSpec,
    /// Margin fraction kept on each side when the region is fitted into
    /// `output_shape`; `[0, 0.95)`.
    pub pad: Real,
}

/// A rectified image with the geometry that produced it.
#[derive(Debug, Clone)]
pub struct Rectified<I> {
    pub image: I,
    /// Maps source pixels to output pixels.
    pub transform: Mat3,
    /// Where the source quadrilateral's corners landed.
    pub output_polygon: Polygon,
    pub output_size: [u32; 2],
}

/// Perspective rectifier driving an [`ImageWarper`].
#[derive(Debug, Clone, Default)]
pub struct Rectifier<W> {
    warper: W,
}

impl<W: ImageWarper> Rectifier<W> {
    pub fn new(warper: W) -> Self {
        Self { warper }
    }

    pub fn warper(&self) -> &W {
        &self.warper
    }

    /// Warp `image` so that `origin` becomes an axis-aligned rectangle.
    pub fn rectify(&self, image: &W::Image, origin: &Polygon, opts: &RectifyOptions) -> Result<Rectified<W::Image>> {
        let (output_polygon, output_size, transform) = plan_rectification(origin, opts)?;
        let image = self.warper.warp(image, &transform, output_size)?;
        Ok(Rectified {
            image,
            transform,
            output_polygon,
            output_size,
        })
    }

    /// Like [`rectify`](Self::rectify), asking `capture` for the quadrilateral.
    ///
    /// `fallback` is offered to the capture as a hint and used in its place
    /// if the user aborts.
    pub fn rectify_captured<C>(
        &self,
        image: &W::Image,
        capture: &mut C,
        fallback: Option<&Polygon>,
        opts: &RectifyOptions,
    ) -> Result<Rectified<W::Image>>
    where
        C: PolygonCapture<Image = W::Image>,
    {
        let origin = match capture.capture(image, QUAD_SIDES, fallback)? {
            CaptureOutcome::Captured(polygon) => polygon,
            CaptureOutcome::Aborted => match fallback {
                Some(polygon) => {
                    warn!("capture aborted, falling back to the default polygon");
                    polygon.clone()
                }
                None => return Err(RulerError::InteractiveAborted),
            },
        };
        self.rectify(image, &origin, opts)
    }

    /// Rotate `image` by `degrees` about its center, keeping its size.
    pub fn rotate_image(&self, image: &W::Image, degrees: Real) -> Result<W::Image> {
        if !degrees.is_finite() {
            return Err(RulerError::InvalidParameter(format!(
                "rotation must be finite, got {degrees}"
            )));
        }
        let size = self.warper.dimensions(image);
        self.warper.warp(image, &rotation_about_center(size, degrees), size)
    }
}

/// Target polygon, canvas size and transform for rectifying `origin`,
/// without touching any pixels.
///
/// The corners of `origin` may come in either winding; they are put in
/// clockwise order first so the result is never mirrored.
pub fn plan_rectification(origin: &Polygon, opts: &RectifyOptions) -> Result<(Polygon, [u32; 2], Mat3)> {
    quad_corners(origin)?;
    let origin = order_clockwise(origin)?;
    let src = quad_corners(&origin)?;
    validate_pad(opts.pad)?;

    let mut output_polygon = compute_output_polygon(&origin, &opts.angle)?;
    let output_size = match opts.output_shape {
        None => {
            let shape = polygon_shape(&output_polygon, true);
            let size = [shape[0] as u32, shape[1] as u32];
            if size.contains(&0) {
                return Err(RulerError::InvalidPolygon(format!(
                    "rectified region is empty ({}x{} px)",
                    shape[0], shape[1]
                )));
            }
            size
        }
        Some(size) => {
            let shape = [size[0] as Real, size[1] as Real];
            let center = CenterOptions {
                pad: opts.pad,
                ..CenterOptions::default()
            };
            output_polygon = center_polygon(&output_polygon, &shape, &center)?;
            size
        }
    };

    let dst = quad_corners(&output_polygon)?;
    let transform = perspective_transform(&src, &dst)?;
    debug!(
        "rectify: {:?} -> {:?} on a {}x{} canvas",
        origin.to_rows(),
        output_polygon.to_rows(),
        output_size[0],
        output_size[1]
    );
    Ok((output_polygon, output_size, transform))
}

fn quad_corners(polygon: &Polygon) -> Result<[Pt2; 4]> {
    if polygon.len() != QUAD_SIDES || polygon.dim() != 2 {
        return Err(RulerError::InvalidPolygon(format!(
            "rectification needs exactly 4 two-dimensional points, got {} of dimension {}",
            polygon.len(),
            polygon.dim()
        )));
    }
    let pts = polygon.to_pt2()?;
    Ok([pts[0], pts[1], pts[2], pts[3]])
}
