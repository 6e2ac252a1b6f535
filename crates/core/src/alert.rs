//! Alert types raised by threshold evaluation and crop image analysis.

use serde::Serialize;

use crate::types::{DbId, Timestamp};

/// Discriminant for the four alert kinds the platform can raise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertKind {
    /// Soil humidity below the configured minimum.
    LowHumidity,
    /// Soil pH outside the configured [min, max] band.
    PhOutOfRange,
    /// A pest class detected in an uploaded crop image.
    PestDetected,
    /// A disease class detected in an uploaded crop image.
    DiseaseDetected,
}

impl AlertKind {
    /// Stable lowercase name for log fields and delivery summaries.
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertKind::LowHumidity => "low_humidity",
            AlertKind::PhOutOfRange => "ph_out_of_range",
            AlertKind::PestDetected => "pest_detected",
            AlertKind::DiseaseDetected => "disease_detected",
        }
    }
}

/// A single alert with the context needed to format its messages.
///
/// Alerts are ephemeral: constructed by the evaluator or the image analysis
/// path, formatted, dispatched, and discarded. Nothing persists them.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Alert {
    LowHumidity {
        installed_sensor_id: DbId,
        humidity: f64,
        minimum: f64,
        recorded_at: Timestamp,
    },
    PhOutOfRange {
        installed_sensor_id: DbId,
        ph: f64,
        minimum: f64,
        maximum: f64,
        recorded_at: Timestamp,
    },
    PestDetected {
        label: String,
        confidence: f64,
        field_location: Option<String>,
    },
    DiseaseDetected {
        label: String,
        confidence: f64,
        field_location: Option<String>,
    },
}

impl Alert {
    /// The kind discriminant for this alert.
    pub fn kind(&self) -> AlertKind {
        match self {
            Alert::LowHumidity { .. } => AlertKind::LowHumidity,
            Alert::PhOutOfRange { .. } => AlertKind::PhOutOfRange,
            Alert::PestDetected { .. } => AlertKind::PestDetected,
            Alert::DiseaseDetected { .. } => AlertKind::DiseaseDetected,
        }
    }
}
