//! Sensor reading models (append-only time-series).

use farmtech_core::thresholds::ReadingSnapshot;
use farmtech_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A single sensor reading row.
///
/// Measurement columns are nullable because a sensor reports only the
/// quantities it measures.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SensorReading {
    pub id: DbId,
    pub installed_sensor_id: DbId,
    pub recorded_at: Timestamp,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub created_at: Timestamp,
}

impl SensorReading {
    /// Convert to the pure evaluator input type.
    pub fn to_snapshot(&self) -> ReadingSnapshot {
        ReadingSnapshot {
            installed_sensor_id: self.installed_sensor_id,
            humidity: self.humidity,
            ph: self.ph,
            phosphorus: self.phosphorus,
            potassium: self.potassium,
            recorded_at: self.recorded_at,
        }
    }
}

/// DTO for inserting a new reading row.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSensorReading {
    pub installed_sensor_id: DbId,
    pub recorded_at: Timestamp,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
}

/// Join view: a reading with its installation context, for the browse table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadingDetail {
    pub id: DbId,
    pub installed_sensor_id: DbId,
    pub recorded_at: Timestamp,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub field_location: Option<String>,
    pub crop_name: String,
    pub producer_name: String,
}

/// Aggregate view over a recent window, for the dashboard header metrics.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ReadingStats {
    /// Rows in the window.
    pub total: i64,
    /// Mean humidity over rows that have one.
    pub avg_humidity: Option<f64>,
    /// Mean pH over rows that have one.
    pub avg_ph: Option<f64>,
    /// Rows whose humidity sits below the configured minimum.
    pub below_humidity_min: i64,
}
