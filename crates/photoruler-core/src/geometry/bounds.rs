use nalgebra::DVector;

use super::Polygon;
use crate::{Real, Result, RulerError};

/// Upper bound on the dimensionality expanded into corner polygons.
const MAX_CORNER_DIM: usize = 16;

/// Axis-aligned bounding box of a polygon.
#[derive(Clone, Debug, PartialEq)]
pub struct Bounds {
    pub min: DVector<Real>,
    pub max: DVector<Real>,
}

impl Bounds {
    /// Per-axis extent (`max - min`).
    pub fn extents(&self) -> DVector<Real> {
        &self.max - &self.min
    }

    pub fn center(&self) -> DVector<Real> {
        (&self.min + &self.max) * 0.5
    }

    /// Flat `[min_0, .., min_n, max_0, .., max_n]` layout.
    pub fn to_flat(&self) -> Vec<Real> {
        self.min.iter().chain(self.max.iter()).copied().collect()
    }

    pub fn from_flat(flat: &[Real]) -> Result<Self> {
        if flat.is_empty() || flat.len() % 2 != 0 {
            return Err(RulerError::param(format!(
                "bounding box needs an even, non-zero number of values, got {}",
                flat.len()
            )));
        }
        let n = flat.len() / 2;
        Ok(Self {
            min: DVector::from_column_slice(&flat[..n]),
            max: DVector::from_column_slice(&flat[n..]),
        })
    }

    /// Expand into the 2^N corners.
    ///
    /// Corners follow reflected Gray-code order so consecutive corners share
    /// an edge; in 2-D this is `(min,min) (max,min) (max,max) (min,max)`.
    pub fn corners(&self) -> Result<Polygon> {
        let n = self.min.len();
        if n > MAX_CORNER_DIM {
            return Err(RulerError::param(format!(
                "cannot expand a {}-D box into corners (limit {})",
                n, MAX_CORNER_DIM
            )));
        }
        let corners = (0..1usize << n)
            .map(|i| {
                let gray = i ^ (i >> 1);
                DVector::from_fn(n, |axis, _| {
                    if (gray >> axis) & 1 == 1 {
                        self.max[axis]
                    } else {
                        self.min[axis]
                    }
                })
            })
            .collect();
        Polygon::new(corners)
    }
}

/// Componentwise minimum and maximum across all points.
pub fn min_max_coords(polygon: &Polygon) -> Bounds {
    let first = &polygon.points()[0];
    let (min, max) = polygon
        .points()
        .iter()
        .skip(1)
        .fold((first.clone(), first.clone()), |(min, max), p| {
            (min.inf(p), max.sup(p))
        });
    Bounds { min, max }
}

/// Axis-aligned bounding box of `polygon` as a corner polygon.
///
/// With `shift_to`, the box is translated so its minimum corner lands there.
pub fn circumscribed_rectangle(polygon: &Polygon, shift_to: Option<&[Real]>) -> Result<Polygon> {
    let mut bounds = min_max_coords(polygon);
    if let Some(target) = shift_to {
        polygon.check_axes("shift target", target.len())?;
        let offset = DVector::from_column_slice(target) - &bounds.min;
        bounds.min += &offset;
        bounds.max += &offset;
    }
    bounds.corners()
}

/// Expand a flat min/max box (2N values) into its corner polygon.
pub fn bbox_to_polygon(bbox: &[Real]) -> Result<Polygon> {
    Bounds::from_flat(bbox)?.corners()
}

/// Per-axis extents of `polygon`, optionally truncated toward zero.
pub fn polygon_shape(polygon: &Polygon, as_int: bool) -> Vec<Real> {
    let extents = min_max_coords(polygon).extents();
    extents
        .iter()
        .map(|&e| if as_int { e.trunc() } else { e })
        .collect()
}
