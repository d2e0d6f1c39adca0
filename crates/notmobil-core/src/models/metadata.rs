//! Ambient metadata captured alongside a note.
//!
//! The sync engine treats these as opaque payloads: they are stored and sent
//! exactly as captured.

use serde::{Deserialize, Serialize};

/// Geographic position recorded when the note was saved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationData {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

/// Three-axis motion sample (accelerometer or gyroscope)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionReading {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    /// Sample time (Unix ms)
    pub timestamp: i64,
}

/// Environmental sample; any individual sensor may be absent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AmbientReading {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f32>,
    /// Sample time (Unix ms)
    pub timestamp: i64,
}

/// Sensor snapshot attached to a note
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SensorData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accelerometer: Option<MotionReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gyroscope: Option<MotionReading>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ambient: Option<AmbientReading>,
}

impl SensorData {
    /// True when no sensor produced a reading
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.accelerometer.is_none() && self.gyroscope.is_none() && self.ambient.is_none()
    }
}
