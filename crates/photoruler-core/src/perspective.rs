//! Foreshortening compensation for obliquely viewed lengths.
//!
//! Angle convention: `0°` means the measured object lies in a plane parallel
//! to the sensor (fronto-parallel, no foreshortening). The apparent length
//! shrinks with `cos(angle)` as the angle grows towards `90°` (edge-on).
//!
//! Near the edge-on extreme the object's own extent across the field of view
//! biases the effective viewing angle. Within [`FOV_WINDOW_DEGREES`] of `90°`
//! the angle is reduced by a share of the vertical aperture proportional to
//! how unevenly the object straddles the sensor midline.

use log::debug;

use crate::{Camera, Real, Result, RulerError};

/// Angle at which the object plane is seen edge-on.
pub const EDGE_ON_DEGREES: Real = 90.0;
/// Half-width of the window around [`EDGE_ON_DEGREES`] where the
/// field-of-view adjustment applies.
pub const FOV_WINDOW_DEGREES: Real = 5.0;

/// Physical sensor length (cm) of a span `[y1_px, y2_px]` corrected for
/// viewing `angle_degrees`.
///
/// `apparent / cos(angle - fov_adjustment)`. The result is not range checked:
/// angles at or beyond edge-on yield non-finite or negative lengths, which
/// the [`Ruler`](crate::Ruler) rejects.
pub fn correct_perspective(camera: &Camera, angle_degrees: Real, y1_px: Real, y2_px: Real) -> Result<Real> {
    check_span(camera, y1_px, y2_px)?;
    if !angle_degrees.is_finite() {
        return Err(RulerError::param(format!(
            "viewing angle must be finite, got {}",
            angle_degrees
        )));
    }

    let apparent_cm = camera.px_to_cm(y2_px - y1_px);
    let fov = if (EDGE_ON_DEGREES - angle_degrees).abs() < FOV_WINDOW_DEGREES {
        let fov = fov_adjustment(camera, y1_px, y2_px)?;
        debug!(
            "angle {:.2} deg near edge-on: field-of-view adjustment {:.5} rad",
            angle_degrees, fov
        );
        fov
    } else {
        0.0
    };

    Ok(apparent_cm / (angle_degrees.to_radians() - fov).cos())
}

/// Angle bias (radians) caused by the span's position across the sensor.
///
/// The sensor's vertical extent is split at its midline; the pixels the span
/// covers above and below it are compared, and their absolute difference as
/// a fraction of the sensor height scales the vertical aperture.
pub fn fov_adjustment(camera: &Camera, y1_px: Real, y2_px: Real) -> Result<Real> {
    check_span(camera, y1_px, y2_px)?;
    let (shape, aperture) = match (camera.sensor_shape_px(), camera.aperture_radians()) {
        (Some(shape), Some(aperture)) => (shape, aperture),
        _ => {
            return Err(RulerError::MissingCalibration(
                "sensor shape must be known to correct perspective".into(),
            ))
        }
    };

    let height = shape[1] as Real;
    let half = height / 2.0;
    let upper = y2_px.min(half) - y1_px.min(half);
    let lower = y2_px.max(half) - y1_px.max(half);
    let share = (upper - lower).abs() / height;
    Ok(aperture[1] * share)
}

fn check_span(camera: &Camera, y1_px: Real, y2_px: Real) -> Result<()> {
    if y1_px.is_nan() || y2_px.is_nan() || y1_px > y2_px {
        return Err(RulerError::param(format!(
            "span start {} must not exceed span end {}",
            y1_px, y2_px
        )));
    }
    if camera.sensor_shape_px().is_none() {
        return Err(RulerError::MissingCalibration(
            "sensor shape must be known to correct perspective".into(),
        ));
    }
    Ok(())
}
