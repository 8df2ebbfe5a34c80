//! Distance and length estimation from similar triangles.
//!
//! Thin-lens relation: `1/object_distance + 1/image_distance = 1/f`. For
//! objects far compared to `f`, the image forms at `f` and
//! `real_size / sensor_size = distance / f`, which is the magnification used
//! by both directions of the [`Ruler`].

use log::debug;
use serde::{Deserialize, Serialize};

use crate::{correct_perspective, Camera, Real, Result, RulerError};

/// Converts between pixel lengths, real lengths and distances for one camera.
///
/// A ruler only reads its camera, so one instance can be shared between
/// threads without synchronisation.
#[derive(Clone, Debug)]
pub struct Ruler {
    camera: Camera,
}

/// The physical quantity known alongside a pixel length.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "cm", rename_all = "snake_case")]
pub enum Known {
    /// Real length of the object in cm; solve for distance.
    RealLength(Real),
    /// Distance from the lens to the object in cm; solve for length.
    Distance(Real),
}

/// A full measurement request.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Length spanned by the object in the image, in pixels.
    pub length_px: Real,
    pub known: Known,
    /// Viewing angle in degrees (0 = fronto-parallel). `None` skips
    /// perspective correction.
    #[serde(default)]
    pub angle_degrees: Option<Real>,
    /// Pixel coordinate of the object's top edge; only used near edge-on.
    #[serde(default)]
    pub y1_px: Real,
}

/// Both physical quantities after solving a [`Measurement`].
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct MeasurementResult {
    pub real_length_cm: Real,
    pub distance_cm: Real,
    /// Perspective-corrected length on the sensor.
    pub sensor_length_cm: Real,
    pub magnification: Real,
}

impl Ruler {
    pub fn new(camera: Camera) -> Self {
        Self { camera }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Physical length on the sensor for `object_length_px` pixels starting
    /// at `y1_px`, corrected for `angle_degrees` when given.
    pub fn sensor_length_cm(
        &self,
        object_length_px: Real,
        angle_degrees: Option<Real>,
        y1_px: Real,
    ) -> Result<Real> {
        let length = match angle_degrees {
            None => self.camera.px_to_cm(object_length_px),
            Some(angle) => {
                correct_perspective(&self.camera, angle, y1_px, y1_px + object_length_px)?
            }
        };
        if !(length.is_finite() && length > 0.0) {
            return Err(RulerError::InvalidMeasurement(format!(
                "corrected sensor length must be positive, got {} cm ({} px at {:?} deg)",
                length, object_length_px, angle_degrees
            )));
        }
        Ok(length)
    }

    /// Distance from the lens to an object of known real length (cm).
    pub fn distance_to_object(
        &self,
        object_length_px: Real,
        real_length_cm: Real,
        angle_degrees: Option<Real>,
        y1_px: Real,
    ) -> Result<Real> {
        check_positive("real length", real_length_cm)?;
        let sensor_cm = self.sensor_length_cm(object_length_px, angle_degrees, y1_px)?;
        Ok(self.distance_from_sensor(sensor_cm, real_length_cm))
    }

    /// Real length (cm) of an object seen at a known distance (cm).
    pub fn object_length_in_cm(
        &self,
        distance_cm: Real,
        object_length_px: Real,
        angle_degrees: Option<Real>,
        y1_px: Real,
    ) -> Result<Real> {
        check_positive("distance", distance_cm)?;
        let sensor_cm = self.sensor_length_cm(object_length_px, angle_degrees, y1_px)?;
        Ok(self.length_from_sensor(sensor_cm, distance_cm))
    }

    /// Solve whichever quantity `request` leaves unknown.
    ///
    /// The known quantity is validated before the pixel span, so a bad
    /// request reports the same error as the single-quantity methods.
    pub fn measure(&self, request: &Measurement) -> Result<MeasurementResult> {
        match request.known {
            Known::RealLength(real) => check_positive("real length", real)?,
            Known::Distance(distance) => check_positive("distance", distance)?,
        }
        let sensor_length_cm =
            self.sensor_length_cm(request.length_px, request.angle_degrees, request.y1_px)?;
        let (real_length_cm, distance_cm) = match request.known {
            Known::RealLength(real) => (real, self.distance_from_sensor(sensor_length_cm, real)),
            Known::Distance(distance) => (self.length_from_sensor(sensor_length_cm, distance), distance),
        };
        Ok(MeasurementResult {
            real_length_cm,
            distance_cm,
            sensor_length_cm,
            magnification: distance_cm / self.camera.focal_length_cm(),
        })
    }

    fn distance_from_sensor(&self, sensor_cm: Real, real_length_cm: Real) -> Real {
        let magnification = real_length_cm / sensor_cm;
        let distance = self.camera.focal_length_cm() * magnification;
        debug!(
            "distance: {:.5} cm on sensor, magnification {:.3}, distance {:.3} cm",
            sensor_cm, magnification, distance
        );
        distance
    }

    fn length_from_sensor(&self, sensor_cm: Real, distance_cm: Real) -> Real {
        let magnification = distance_cm / self.camera.focal_length_cm();
        let length = sensor_cm * magnification;
        debug!(
            "length: {:.5} cm on sensor, magnification {:.3}, length {:.3} cm",
            sensor_cm, magnification, length
        );
        length
    }
}

fn check_positive(what: &str, value: Real) -> Result<()> {
    if !(value.is_finite() && value > 0.0) {
        return Err(RulerError::param(format!(
            "{} must be positive, got {} cm",
            what, value
        )));
    }
    Ok(())
}
