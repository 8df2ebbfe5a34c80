//! Calibrated pinhole / thin-lens camera.
//!
//! A [`Camera`] is built once from [`CameraParams`] and never mutated
//! afterwards. Every derived quantity (unit conversions, lens power and,
//! when the sensor resolution is known, the per-axis aperture) is computed in
//! [`CameraParams::build`], so a camera can be shared freely between threads.
//!
//! Axis order follows point coordinates: index 0 is the horizontal axis
//! (width, `x`), index 1 is the vertical axis (height, `y`).

use serde::{Deserialize, Serialize};

use crate::{Real, Result, RulerError, MM_PER_CM, MM_PER_M};

/// Empirical factor from diopters to the lens-power figure in millimetres.
const LENS_POWER_MM_PER_DIOPTER: Real = 0.2645;

/// Length unit for pixel conversions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
}

impl Unit {
    const ALL: [Unit; 3] = [Unit::Millimeter, Unit::Centimeter, Unit::Meter];

    fn index(self) -> usize {
        match self {
            Unit::Millimeter => 0,
            Unit::Centimeter => 1,
            Unit::Meter => 2,
        }
    }

    /// Scale factor applied to a length in millimetres.
    pub fn scale_from_mm(self) -> Real {
        match self {
            Unit::Millimeter => 1.0,
            Unit::Centimeter => 1.0 / MM_PER_CM,
            Unit::Meter => 1.0 / MM_PER_M,
        }
    }
}

/// Serializable calibration constants for building a [`Camera`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CameraParams {
    /// Physical side of one pixel in millimetres.
    pub pixel_size_mm: Real,
    /// Lens focal length in millimetres.
    pub focal_length_mm: Real,
    /// Sensor resolution in pixels as `[width, height]`.
    #[serde(default)]
    pub sensor_shape_px: Option<Vec<u32>>,
    /// Base orientation of the camera in degrees.
    #[serde(default)]
    pub angle_degrees: Real,
}

impl CameraParams {
    pub fn new(pixel_size_mm: Real, focal_length_mm: Real) -> Self {
        Self {
            pixel_size_mm,
            focal_length_mm,
            sensor_shape_px: None,
            angle_degrees: 0.0,
        }
    }

    pub fn with_sensor_shape(mut self, width: u32, height: u32) -> Self {
        self.sensor_shape_px = Some(vec![width, height]);
        self
    }

    pub fn with_angle_degrees(mut self, angle_degrees: Real) -> Self {
        self.angle_degrees = angle_degrees;
        self
    }

    /// Validate the constants and compute every derived quantity.
    pub fn build(&self) -> Result<Camera> {
        if !(self.pixel_size_mm.is_finite() && self.pixel_size_mm > 0.0) {
            return Err(RulerError::param(format!(
                "pixel size must be positive, got {} mm",
                self.pixel_size_mm
            )));
        }
        if !(self.focal_length_mm.is_finite() && self.focal_length_mm > 0.0) {
            return Err(RulerError::param(format!(
                "focal length must be positive, got {} mm",
                self.focal_length_mm
            )));
        }

        if !self.angle_degrees.is_finite() {
            return Err(RulerError::param(format!(
                "angle must be finite, got {} degrees",
                self.angle_degrees
            )));
        }

        let sensor = match &self.sensor_shape_px {
            None => None,
            Some(shape) => {
                if shape.len() != 2 {
                    return Err(RulerError::param(format!(
                        "sensor shape must have exactly 2 components, got {}",
                        shape.len()
                    )));
                }
                if shape.iter().any(|&s| s == 0) {
                    return Err(RulerError::param(format!(
                        "sensor shape components must be positive, got {:?}",
                        shape
                    )));
                }
                Some(SensorGeometry::new(
                    [shape[0], shape[1]],
                    self.pixel_size_mm,
                    self.focal_length_mm,
                ))
            }
        };

        let lens_power_diopters = MM_PER_M / self.focal_length_mm;
        Ok(Camera {
            pixel_size: Unit::ALL.map(|u| self.pixel_size_mm * u.scale_from_mm()),
            focal_length: Unit::ALL.map(|u| self.focal_length_mm * u.scale_from_mm()),
            angle_degrees: self.angle_degrees,
            angle_radians: self.angle_degrees.to_radians(),
            lens_power_diopters,
            lens_power_mm: lens_power_diopters * LENS_POWER_MM_PER_DIOPTER,
            sensor,
        })
    }
}

/// Physical sensor extent and field of view, known only with a resolution.
#[derive(Clone, Copy, Debug, PartialEq)]
struct SensorGeometry {
    shape_px: [u32; 2],
    size_mm: [Real; 2],
    aperture_radians: [Real; 2],
    half_aperture_cos: [Real; 2],
}

impl SensorGeometry {
    fn new(shape_px: [u32; 2], pixel_size_mm: Real, focal_length_mm: Real) -> Self {
        let size_mm = shape_px.map(|s| s as Real * pixel_size_mm);
        let aperture_radians = size_mm.map(|d| 2.0 * (d / (2.0 * focal_length_mm)).atan());
        let half_aperture_cos = aperture_radians.map(|a| (a / 2.0).cos());
        Self {
            shape_px,
            size_mm,
            aperture_radians,
            half_aperture_cos,
        }
    }
}

/// Immutable calibrated camera.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    /// Indexed by [`Unit::index`].
    pixel_size: [Real; 3],
    focal_length: [Real; 3],
    angle_degrees: Real,
    angle_radians: Real,
    lens_power_diopters: Real,
    lens_power_mm: Real,
    sensor: Option<SensorGeometry>,
}

impl Camera {
    pub fn pixel_size(&self, unit: Unit) -> Real {
        self.pixel_size[unit.index()]
    }

    pub fn pixel_size_mm(&self) -> Real {
        self.pixel_size(Unit::Millimeter)
    }

    pub fn pixel_size_cm(&self) -> Real {
        self.pixel_size(Unit::Centimeter)
    }

    pub fn pixel_size_m(&self) -> Real {
        self.pixel_size(Unit::Meter)
    }

    pub fn focal_length(&self, unit: Unit) -> Real {
        self.focal_length[unit.index()]
    }

    pub fn focal_length_mm(&self) -> Real {
        self.focal_length(Unit::Millimeter)
    }

    pub fn focal_length_cm(&self) -> Real {
        self.focal_length(Unit::Centimeter)
    }

    pub fn focal_length_m(&self) -> Real {
        self.focal_length(Unit::Meter)
    }

    /// Base orientation of the camera in degrees.
    pub fn angle_degrees(&self) -> Real {
        self.angle_degrees
    }

    pub fn angle_radians(&self) -> Real {
        self.angle_radians
    }

    /// Lens power in diopters (`1000 / focal_length_mm`).
    pub fn lens_power_diopters(&self) -> Real {
        self.lens_power_diopters
    }

    /// Lens power scaled by the `0.2645` diopter-to-millimetre factor.
    pub fn lens_power_mm(&self) -> Real {
        self.lens_power_mm
    }

    /// Sensor resolution `[width, height]`, if calibrated.
    pub fn sensor_shape_px(&self) -> Option<[u32; 2]> {
        self.sensor.map(|s| s.shape_px)
    }

    /// Physical sensor size per axis in millimetres.
    pub fn sensor_size_mm(&self) -> Option<[Real; 2]> {
        self.sensor.map(|s| s.size_mm)
    }

    /// Field-of-view angle per axis: `2 * atan(size / (2 * f))`.
    pub fn aperture_radians(&self) -> Option<[Real; 2]> {
        self.sensor.map(|s| s.aperture_radians)
    }

    /// Cosine of half the aperture angle per axis.
    pub fn half_aperture_cos(&self) -> Option<[Real; 2]> {
        self.sensor.map(|s| s.half_aperture_cos)
    }

    /// Convert a pixel length to a physical length on the sensor.
    pub fn px_to(&self, px: Real, unit: Unit) -> Real {
        px * self.pixel_size(unit)
    }

    pub fn px_to_mm(&self, px: Real) -> Real {
        self.px_to(px, Unit::Millimeter)
    }

    pub fn px_to_cm(&self, px: Real) -> Real {
        self.px_to(px, Unit::Centimeter)
    }

    pub fn px_to_m(&self, px: Real) -> Real {
        self.px_to(px, Unit::Meter)
    }
}
