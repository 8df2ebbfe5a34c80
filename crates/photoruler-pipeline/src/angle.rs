use log::debug;
use photoruler_core::{circumscribed_rectangle, min_max_coords, resize_polygon, Polygon, Real, Result, RulerError};
use serde::{Deserialize, Serialize};

/// Viewing angle(s) used to restore the aspect ratio of a rectified region.
///
/// Same convention as the ruler: `0` is fronto-parallel, `90` edge-on.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AngleSpec {
    /// Keep the apparent proportions.
    #[default]
    Unspecified,
    /// Camera tilted about the horizontal axis; stretches the vertical axis.
    Scalar { degrees: Real },
    /// Independent angles for the x and y axes; `None` skips an axis.
    PerAxis {
        #[serde(default)]
        x: Option<Real>,
        #[serde(default)]
        y: Option<Real>,
    },
}

impl AngleSpec {
    /// Per-axis angles in `[x, y]` order.
    pub fn per_axis(&self) -> [Option<Real>; 2] {
        match *self {
            AngleSpec::Unspecified => [None, None],
            AngleSpec::Scalar { degrees } => [None, Some(degrees)],
            AngleSpec::PerAxis { x, y } => [x, y],
        }
    }
}

/// Axis-aligned target rectangle for `origin`, anchored at the origin.
///
/// Every axis with an angle has its extent divided by `cos(angle)` before
/// the circumscribed rectangle is taken.
pub fn compute_output_polygon(origin: &Polygon, angle: &AngleSpec) -> Result<Polygon> {
    let dim = origin.dim();
    let zero = vec![0.0; dim];
    let angles = angle.per_axis();
    if angles.iter().all(Option::is_none) {
        return circumscribed_rectangle(origin, Some(zero.as_slice()));
    }
    if dim != 2 {
        return Err(RulerError::InvalidPolygon(format!(
            "per-axis angles need 2-D points, got {dim}-D"
        )));
    }

    let extents = min_max_coords(origin).extents();
    let mut new_size = [None, None];
    for (axis, degrees) in angles.iter().enumerate() {
        let Some(degrees) = *degrees else { continue };
        let cos = degrees.to_radians().cos();
        if !(degrees.is_finite() && cos > Real::EPSILON) {
            return Err(RulerError::InvalidParameter(format!(
                "axis {axis} angle must lie strictly between -90 and 90 degrees, got {degrees}"
            )));
        }
        new_size[axis] = Some(extents[axis] / cos);
    }
    debug!("output extents {:?} -> {:?}", extents.as_slice(), new_size);

    let resized = resize_polygon(origin, &new_size)?;
    circumscribed_rectangle(&resized, Some(zero.as_slice()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use photoruler_core::polygon_shape;

    fn quad() -> Polygon {
        Polygon::from_rows(&[[110.0, 40.0], [310.0, 60.0], [300.0, 160.0], [100.0, 140.0]]).unwrap()
    }

    #[test]
    fn unspecified_is_shifted_bounding_box() {
        let out = compute_output_polygon(&quad(), &AngleSpec::Unspecified).unwrap();
        assert_eq!(
            out.to_rows(),
            vec![vec![0.0, 0.0], vec![210.0, 0.0], vec![210.0, 120.0], vec![0.0, 120.0]]
        );
    }

    #[test]
    fn scalar_stretches_vertical_axis() {
        let out = compute_output_polygon(&quad(), &AngleSpec::Scalar { degrees: 60.0 }).unwrap();
        let shape = polygon_shape(&out, false);
        assert_relative_eq!(shape[0], 210.0, epsilon = 1e-9);
        assert_relative_eq!(shape[1], 240.0, epsilon = 1e-9);
        assert_relative_eq!(min_max_coords(&out).min[1], 0.0);
    }

    #[test]
    fn per_axis_skips_missing_axes() {
        let per_axis = AngleSpec::PerAxis { x: Some(60.0), y: None };
        let shape = polygon_shape(&compute_output_polygon(&quad(), &per_axis).unwrap(), false);
        assert_relative_eq!(shape[0], 420.0, epsilon = 1e-9);
        assert_relative_eq!(shape[1], 120.0, epsilon = 1e-9);

        let none = AngleSpec::PerAxis { x: None, y: None };
        let plain = compute_output_polygon(&quad(), &none).unwrap();
        assert_eq!(plain, compute_output_polygon(&quad(), &AngleSpec::Unspecified).unwrap());
    }

    #[test]
    fn edge_on_angle_is_rejected() {
        let err = compute_output_polygon(&quad(), &AngleSpec::Scalar { degrees: 90.0 });
        assert!(matches!(err, Err(RulerError::InvalidParameter(_))));
    }

    #[test]
    fn serde_shape() {
        let parsed: AngleSpec = serde_json::from_str(r#"{"type": "per_axis", "y": 30}"#).unwrap();
        assert_eq!(parsed, AngleSpec::PerAxis { x: None, y: Some(30.0) });
        let scalar: AngleSpec = serde_json::from_str(r#"{"type": "scalar", "degrees": 12.5}"#).unwrap();
        assert_eq!(scalar.per_axis(), [None, Some(12.5)]);
    }
}
