//! Data models for NotMobil

mod metadata;
mod note;
mod settings;

pub use metadata::{AmbientReading, LocationData, MotionReading, SensorData};
pub use note::{new_note_id, Note};
pub use settings::{Settings, ThemeMode};
