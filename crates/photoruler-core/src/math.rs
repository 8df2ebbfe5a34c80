use nalgebra::{Matrix3, Point2, Vector3};

pub type Real = f64;

pub type Vec3 = Vector3<Real>;
pub type Pt2 = Point2<Real>;
pub type Mat3 = Matrix3<Real>;

/// Millimetres per unit, used by the pixel conversions.
pub const MM_PER_CM: Real = 10.0;
pub const MM_PER_M: Real = 1000.0;

pub fn to_homogeneous(p: &Pt2) -> Vec3 {
    Vec3::new(p.x, p.y, 1.0)
}

/// Dehomogenize; `None` when the point lies at infinity.
pub fn from_homogeneous(v: &Vec3) -> Option<Pt2> {
    if v.z.abs() <= Real::EPSILON {
        return None;
    }
    Some(Pt2::new(v.x / v.z, v.y / v.z))
}
