use photoruler_core::{Mat3, Real};

/// In-plane rotation by `degrees` about the center of a `[width, height]`
/// canvas, as a homogeneous transform on pixel coordinates.
///
/// Positive angles rotate counter-clockwise as seen on screen (y axis down).
pub fn rotation_about_center(shape: [u32; 2], degrees: Real) -> Mat3 {
    let cx = shape[0] as Real / 2.0;
    let cy = shape[1] as Real / 2.0;
    let (s, c) = degrees.to_radians().sin_cos();

    // T(c) * R * T(-c)
    Mat3::new(
        c,
        s,
        cx - c * cx - s * cy,
        -s,
        c,
        cy + s * cx - c * cy,
        0.0,
        0.0,
        1.0,
    )
}
