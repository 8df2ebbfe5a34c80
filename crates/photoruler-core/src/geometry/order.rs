use super::Polygon;
use crate::{Result, RulerError};

/// Sort 2-D points by their angle around the centroid.
///
/// Angles come from `atan2(y - cy, x - cx)` and are sorted ascending with a
/// stable sort, so ties keep their input order. In image coordinates (y
/// pointing down) ascending angle runs clockwise on screen.
pub fn order_clockwise(polygon: &Polygon) -> Result<Polygon> {
    if polygon.dim() != 2 {
        return Err(RulerError::param(format!(
            "clockwise ordering needs 2-D points, got {}-D",
            polygon.dim()
        )));
    }
    let n = polygon.len() as f64;
    let (sx, sy) = polygon
        .points()
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p[0], sy + p[1]));
    let (cx, cy) = (sx / n, sy / n);

    let mut keyed: Vec<_> = polygon
        .points()
        .iter()
        .map(|p| ((p[1] - cy).atan2(p[0] - cx), p.clone()))
        .collect();
    keyed.sort_by(|a, b| a.0.total_cmp(&b.0));

    Polygon::new(keyed.into_iter().map(|(_, p)| p).collect())
}
