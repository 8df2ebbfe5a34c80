//! N-dimensional polygon utilities.
//!
//! A [`Polygon`] is an ordered list of points sharing one dimensionality.
//! Every operation here is pure: inputs are borrowed and a new polygon is
//! returned, with point count and order preserved (only coordinates move).
//!
//! Shapes (`output_shape`, extents) are always given per axis in the same
//! order as point coordinates, so for images they read `[width, height]`.

mod bounds;
mod fit;
mod order;

pub use bounds::*;
pub use fit::*;
pub use order::*;

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::{Pt2, Real, Result, RulerError};

/// Ordered sequence of at least two points of equal dimensionality.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<Real>>", into = "Vec<Vec<Real>>")]
pub struct Polygon {
    points: Vec<DVector<Real>>,
}

impl Polygon {
    /// Build a polygon, checking point count and dimensionality.
    pub fn new(points: Vec<DVector<Real>>) -> Result<Self> {
        if points.len() < 2 {
            return Err(RulerError::param(format!(
                "polygon needs at least 2 points, got {}",
                points.len()
            )));
        }
        let dim = points[0].len();
        if dim == 0 {
            return Err(RulerError::param("points must have at least one coordinate"));
        }
        if let Some(bad) = points.iter().position(|p| p.len() != dim) {
            return Err(RulerError::param(format!(
                "point {} has {} coordinates, expected {}",
                bad,
                points[bad].len(),
                dim
            )));
        }
        if points.iter().any(|p| p.iter().any(|v| !v.is_finite())) {
            return Err(RulerError::param("polygon coordinates must be finite"));
        }
        Ok(Self { points })
    }

    pub fn from_rows<R: AsRef<[Real]>>(rows: &[R]) -> Result<Self> {
        Self::new(
            rows.iter()
                .map(|r| DVector::from_column_slice(r.as_ref()))
                .collect(),
        )
    }

    pub fn from_pt2(points: &[Pt2]) -> Result<Self> {
        Self::new(
            points
                .iter()
                .map(|p| DVector::from_column_slice(&[p.x, p.y]))
                .collect(),
        )
    }

    /// Points as `Pt2`; fails unless the polygon is 2-D.
    pub fn to_pt2(&self) -> Result<Vec<Pt2>> {
        if self.dim() != 2 {
            return Err(RulerError::polygon(format!(
                "expected 2-D points, got {}-D",
                self.dim()
            )));
        }
        Ok(self.points.iter().map(|p| Pt2::new(p[0], p[1])).collect())
    }

    pub fn points(&self) -> &[DVector<Real>] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false: a polygon holds at least two points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.points[0].len()
    }

    pub fn to_rows(&self) -> Vec<Vec<Real>> {
        self.points.iter().map(|p| p.iter().copied().collect()).collect()
    }

    /// Translate every point by `offset`.
    pub fn translate(&self, offset: &DVector<Real>) -> Self {
        Self {
            points: self.points.iter().map(|p| p + offset).collect(),
        }
    }

    fn map_points(&self, f: impl Fn(&DVector<Real>) -> DVector<Real>) -> Self {
        Self {
            points: self.points.iter().map(f).collect(),
        }
    }

    pub(crate) fn check_axes(&self, what: &str, len: usize) -> Result<()> {
        if len != self.dim() {
            return Err(RulerError::param(format!(
                "{} has {} components, polygon is {}-D",
                what,
                len,
                self.dim()
            )));
        }
        Ok(())
    }
}

impl TryFrom<Vec<Vec<Real>>> for Polygon {
    type Error = RulerError;

    fn try_from(rows: Vec<Vec<Real>>) -> Result<Self> {
        Self::from_rows(&rows)
    }
}

impl From<Polygon> for Vec<Vec<Real>> {
    fn from(polygon: Polygon) -> Self {
        polygon.to_rows()
    }
}
