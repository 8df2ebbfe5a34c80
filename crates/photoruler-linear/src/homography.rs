//! Plane-to-plane projective transforms.
//!
//! The homography `H` maps **source points** to **destination points**:
//! `x' ~ H x`, scaled so that `H[2,2] == 1`.

use nalgebra::{SMatrix, SVector};
use photoruler_core::{from_homogeneous, to_homogeneous, Mat3, Pt2, RulerError};
use thiserror::Error;

/// Relative area below which three points count as collinear.
const COLLINEAR_EPS: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum HomographyError {
    #[error("degenerate point configuration: {0}")]
    Degenerate(&'static str),
    #[error("point maps to infinity")]
    PointAtInfinity,
}

impl From<HomographyError> for RulerError {
    fn from(err: HomographyError) -> Self {
        RulerError::Homography(err.to_string())
    }
}

/// Exact transform taking the four `src` corners onto the four `dst` corners.
///
/// Solves the 8 unknowns of `H` (with `H[2,2] = 1`) from the two linear
/// equations each correspondence gives. Fails if any three source or
/// destination points are collinear.
pub fn perspective_transform(src: &[Pt2; 4], dst: &[Pt2; 4]) -> Result<Mat3, HomographyError> {
    if has_collinear_triple(src) {
        return Err(HomographyError::Degenerate("three source points are collinear"));
    }
    if has_collinear_triple(dst) {
        return Err(HomographyError::Degenerate(
            "three destination points are collinear",
        ));
    }

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for (i, (ps, pd)) in src.iter().zip(dst.iter()).enumerate() {
        let (x, y, u, v) = (ps.x, ps.y, pd.x, pd.y);
        let r0 = 2 * i;
        let r1 = 2 * i + 1;

        a[(r0, 0)] = x;
        a[(r0, 1)] = y;
        a[(r0, 2)] = 1.0;
        a[(r0, 6)] = -u * x;
        a[(r0, 7)] = -u * y;
        b[r0] = u;

        a[(r1, 3)] = x;
        a[(r1, 4)] = y;
        a[(r1, 5)] = 1.0;
        a[(r1, 6)] = -v * x;
        a[(r1, 7)] = -v * y;
        b[r1] = v;
    }

    let h = a
        .lu()
        .solve(&b)
        .ok_or(HomographyError::Degenerate("singular correspondence system"))?;

    Ok(Mat3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0))
}

/// Map `p` through `h` with perspective division.
pub fn apply_homography(h: &Mat3, p: &Pt2) -> Result<Pt2, HomographyError> {
    from_homogeneous(&(h * to_homogeneous(p))).ok_or(HomographyError::PointAtInfinity)
}

/// Twice the signed area of triangle `(a, b, c)`.
fn cross2(a: &Pt2, b: &Pt2, c: &Pt2) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

fn has_collinear_triple(pts: &[Pt2; 4]) -> bool {
    let diag = pts
        .iter()
        .flat_map(|a| pts.iter().map(move |b| (a - b).norm()))
        .fold(0.0_f64, f64::max);
    if diag <= f64::EPSILON {
        return true;
    }
    let tol = COLLINEAR_EPS * diag * diag;
    const TRIPLES: [[usize; 3]; 4] = [[0, 1, 2], [0, 1, 3], [0, 2, 3], [1, 2, 3]];
    TRIPLES
        .iter()
        .any(|t| cross2(&pts[t[0]], &pts[t[1]], &pts[t[2]]).abs() <= tol)
}
