use log::debug;
use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use super::{min_max_coords, Polygon};
use crate::{Real, Result, RulerError};

/// Exclusive upper bound for padding fractions.
pub const MAX_PAD: Real = 0.95;

/// Check that `pad` lies in `[0, MAX_PAD)`.
pub fn validate_pad(pad: Real) -> Result<()> {
    if !(0.0..MAX_PAD).contains(&pad) {
        return Err(RulerError::param(format!(
            "pad must be in [0, {}), got {}",
            MAX_PAD, pad
        )));
    }
    Ok(())
}

fn shape_vector(polygon: &Polygon, output_shape: &[Real]) -> Result<DVector<Real>> {
    polygon.check_axes("output shape", output_shape.len())?;
    if output_shape.iter().any(|&s| !(s.is_finite() && s > 0.0)) {
        return Err(RulerError::param(format!(
            "output shape must be positive, got {:?}",
            output_shape
        )));
    }
    Ok(DVector::from_column_slice(output_shape))
}

/// Uniform scale factor that fits the padded bounding box into `output_shape`.
///
/// This is `max_i(extent_i * (1 + 2 * pad) / output_i)`: the polygon is
/// divided by it, so values above 1 shrink and below 1 enlarge.
pub fn fit_scale(polygon: &Polygon, output_shape: &[Real], pad: Real) -> Result<Real> {
    validate_pad(pad)?;
    let shape = shape_vector(polygon, output_shape)?;
    let required = min_max_coords(polygon).extents() * (1.0 + 2.0 * pad);
    let scale = required.component_div(&shape).max();
    if scale <= 0.0 {
        return Err(RulerError::param(
            "cannot fit a polygon with zero extent on every axis",
        ));
    }
    Ok(scale)
}

/// Scale `polygon` uniformly so its padded bounding box fits `output_shape`,
/// then center it there.
pub fn fit_polygon_in_shape(polygon: &Polygon, output_shape: &[Real], pad: Real) -> Result<Polygon> {
    let scale = fit_scale(polygon, output_shape, pad)?;
    let shape = DVector::from_column_slice(output_shape);
    let bounds = min_max_coords(polygon);
    let offset = (&shape - bounds.extents() / scale) * 0.5;
    debug!(
        "fitting polygon extents {:?} into {:?} (scale 1/{:.4}, pad {})",
        bounds.extents().as_slice(),
        output_shape,
        scale,
        pad
    );
    Ok(polygon.map_points(|p| (p - &bounds.min) / scale + &offset))
}

/// When [`center_polygon`] rescales before centering.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CenterOptions {
    /// Shrink when the polygon exceeds the output on any axis.
    pub resize_on_bigger: bool,
    /// Enlarge when the polygon undershoots the output on any axis.
    pub resize_on_lower: bool,
    /// Padding fraction kept around the polygon on each side when resizing.
    pub pad: Real,
}

impl Default for CenterOptions {
    fn default() -> Self {
        Self {
            resize_on_bigger: true,
            resize_on_lower: false,
            pad: 0.0,
        }
    }
}

/// Place `polygon` in the middle of `output_shape`, resizing first if the
/// options ask for it.
pub fn center_polygon(polygon: &Polygon, output_shape: &[Real], opts: &CenterOptions) -> Result<Polygon> {
    validate_pad(opts.pad)?;
    let shape = shape_vector(polygon, output_shape)?;
    let extents = min_max_coords(polygon).extents();

    let bigger = extents.iter().zip(shape.iter()).any(|(e, s)| e > s);
    let lower = extents.iter().zip(shape.iter()).any(|(e, s)| e < s);

    let polygon = if (opts.resize_on_bigger && bigger) || (opts.resize_on_lower && lower) {
        fit_polygon_in_shape(polygon, output_shape, opts.pad)?
    } else {
        polygon.clone()
    };

    let offset = shape * 0.5 - min_max_coords(&polygon).center();
    Ok(polygon.translate(&offset))
}

/// Rescale each axis independently to an absolute extent.
///
/// `None` entries leave that axis untouched. The minimum coordinate of each
/// resized axis stays in place.
pub fn resize_polygon(polygon: &Polygon, new_size: &[Option<Real>]) -> Result<Polygon> {
    polygon.check_axes("new size", new_size.len())?;
    let bounds = min_max_coords(polygon);
    let extents = bounds.extents();

    let mut factors = DVector::from_element(polygon.dim(), 1.0);
    for (axis, size) in new_size.iter().enumerate() {
        let Some(size) = *size else {
            continue;
        };
        if !(size.is_finite() && size >= 0.0) {
            return Err(RulerError::param(format!(
                "axis {} size must be non-negative, got {}",
                axis, size
            )));
        }
        if extents[axis] <= 0.0 {
            return Err(RulerError::param(format!(
                "axis {} has zero extent and cannot be resized",
                axis
            )));
        }
        factors[axis] = size / extents[axis];
    }

    Ok(polygon.map_points(|p| (p - &bounds.min).component_mul(&factors) + &bounds.min))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::polygon_shape;
    use approx::assert_relative_eq;

    fn square(side: Real) -> Polygon {
        Polygon::from_rows(&[[0.0, 0.0], [side, 0.0], [side, side], [0.0, side]]).unwrap()
    }

    #[test]
    fn fit_limited_by_tighter_axis() {
        let sq = square(100.0);
        assert_relative_eq!(fit_scale(&sq, &[50.0, 200.0], 0.0).unwrap(), 2.0);

        let fitted = fit_polygon_in_shape(&sq, &[50.0, 200.0], 0.0).unwrap();
        let shape = polygon_shape(&fitted, false);
        assert_relative_eq!(shape[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(shape[1], 50.0, epsilon = 1e-9);

        let b = min_max_coords(&fitted);
        assert_relative_eq!(b.min[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(b.min[1], 75.0, epsilon = 1e-9);
    }

    #[test]
    fn fit_leaves_padding() {
        let sq = square(100.0);
        let fitted = fit_polygon_in_shape(&sq, &[200.0, 200.0], 0.25).unwrap();
        let b = min_max_coords(&fitted);
        // padded box is 150 wide -> scale 0.75 -> polygon 133.3 wide
        assert_relative_eq!(b.extents()[0], 100.0 / 0.75, epsilon = 1e-9);
        assert_relative_eq!(b.min[0], (200.0 - 100.0 / 0.75) / 2.0, epsilon = 1e-9);
        assert_relative_eq!(b.center()[1], 100.0, epsilon = 1e-9);
    }

    #[test]
    fn pad_out_of_range_is_rejected() {
        let sq = square(10.0);
        for pad in [-0.1, 0.95, 1.5] {
            assert!(matches!(
                fit_polygon_in_shape(&sq, &[20.0, 20.0], pad),
                Err(RulerError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn center_without_resize_only_translates() {
        let poly = Polygon::from_rows(&[[3.0, 4.0], [403.0, 9.0], [390.0, 304.0], [7.0, 290.0]]).unwrap();
        let opts = CenterOptions {
            resize_on_bigger: false,
            resize_on_lower: false,
            pad: 0.0,
        };
        let centered = center_polygon(&poly, &[100.0, 100.0], &opts).unwrap();
        assert_eq!(polygon_shape(&centered, false), polygon_shape(&poly, false));
        let c = min_max_coords(&centered).center();
        assert_relative_eq!(c[0], 50.0, epsilon = 1e-9);
        assert_relative_eq!(c[1], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn center_shrinks_bigger_polygons_by_default() {
        let centered = center_polygon(&square(400.0), &[200.0, 100.0], &CenterOptions::default()).unwrap();
        let shape = polygon_shape(&centered, false);
        assert_relative_eq!(shape[0], 100.0, epsilon = 1e-9);
        assert_relative_eq!(shape[1], 100.0, epsilon = 1e-9);
        assert_relative_eq!(min_max_coords(&centered).min[0], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn center_enlarges_only_when_asked() {
        let small = square(10.0);
        let kept = center_polygon(&small, &[100.0, 50.0], &CenterOptions::default()).unwrap();
        assert_relative_eq!(polygon_shape(&kept, false)[0], 10.0, epsilon = 1e-9);

        let opts = CenterOptions {
            resize_on_lower: true,
            ..Default::default()
        };
        let grown = center_polygon(&small, &[100.0, 50.0], &opts).unwrap();
        assert_relative_eq!(polygon_shape(&grown, false)[1], 50.0, epsilon = 1e-9);
    }

    #[test]
    fn resize_single_axis() {
        let poly = Polygon::from_rows(&[[1.0, 2.0], [5.0, 4.0], [3.0, 7.0]]).unwrap();
        let resized = resize_polygon(&poly, &[None, Some(10.0)]).unwrap();
        for (a, b) in poly.to_rows().iter().zip(resized.to_rows()) {
            assert_eq!(a[0], b[0]);
        }
        let b = min_max_coords(&resized);
        assert_relative_eq!(b.min[1], 2.0);
        assert_relative_eq!(b.max[1], 12.0, epsilon = 1e-12);
    }

    #[test]
    fn resize_rejects_degenerate_axis() {
        let flat = Polygon::from_rows(&[[0.0, 3.0], [5.0, 3.0]]).unwrap();
        assert!(matches!(
            resize_polygon(&flat, &[None, Some(2.0)]),
            Err(RulerError::InvalidParameter(_))
        ));
        assert!(matches!(
            resize_polygon(&flat, &[Some(2.0)]),
            Err(RulerError::InvalidParameter(_))
        ));
    }
}
