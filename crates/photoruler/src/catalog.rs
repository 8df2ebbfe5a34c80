use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use photoruler_core::{Camera, CameraParams, Ruler};
use serde::{Deserialize, Serialize};

/// Named camera calibrations.
///
/// Serialized as a plain JSON object mapping names to [`CameraParams`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CameraCatalog {
    cameras: BTreeMap<String, CameraParams>,
}

impl CameraCatalog {
    pub const REDMI_NOTE_11_PRO_MAIN: &'static str = "Redmi Note 11 Pro - Main";
    pub const REDMI_NOTE_11_PRO_SELFIE: &'static str = "Redmi Note 11 Pro - Selfie";
    pub const CANON_EOS_R6: &'static str = "Canon EOS R6";

    pub fn new() -> Self {
        Self::default()
    }

    /// The cameras the reference photographs were taken with.
    pub fn with_reference_presets() -> Self {
        let mut catalog = Self::new();
        // Samsung ISOCELL HM2, nona-binned 108 MP -> 12 MP
        catalog.insert(
            Self::REDMI_NOTE_11_PRO_MAIN,
            CameraParams::new(0.7 * 9f64.sqrt() / 1000.0, 24.0).with_sensor_shape(4000, 3000),
        );
        // OmniVision OV16A1Q, quad-binned
        catalog.insert(
            Self::REDMI_NOTE_11_PRO_SELFIE,
            CameraParams::new(1.0 * 4f64.sqrt() / 1000.0, 24.0),
        );
        catalog.insert(
            Self::CANON_EOS_R6,
            CameraParams::new(8.18 / 1000.0, 50.0).with_sensor_shape(5472, 3648),
        );
        catalog
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("parsing camera catalog")
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading camera catalog {}", path.display()))?;
        Self::from_json(&data).with_context(|| format!("in {}", path.display()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Add or replace a camera, returning the previous entry.
    pub fn insert(&mut self, name: impl Into<String>, params: CameraParams) -> Option<CameraParams> {
        self.cameras.insert(name.into(), params)
    }

    /// Entries of `other` replace same-named entries here.
    pub fn extend(&mut self, other: CameraCatalog) {
        self.cameras.extend(other.cameras);
    }

    pub fn params(&self, name: &str) -> Option<&CameraParams> {
        self.cameras.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.cameras.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    /// Build the calibrated camera registered as `name`.
    pub fn camera(&self, name: &str) -> Result<Camera> {
        let params = self.params(name).with_context(|| {
            let known: Vec<_> = self.names().collect();
            format!("unknown camera {name:?}; known cameras: {}", known.join(", "))
        })?;
        params
            .build()
            .with_context(|| format!("invalid calibration for camera {name:?}"))
    }

    pub fn ruler(&self, name: &str) -> Result<Ruler> {
        Ok(Ruler::new(self.camera(name)?))
    }
}
