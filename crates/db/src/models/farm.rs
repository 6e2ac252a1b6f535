//! Farm structure entity models: producers, crops, sensors, installations.

use farmtech_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

// ---------------------------------------------------------------------------
// Producers
// ---------------------------------------------------------------------------

/// A producer (farm owner) registered on the platform.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Producer {
    pub id: DbId,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Crops
// ---------------------------------------------------------------------------

/// A crop planted by a producer for a given season.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CropRecord {
    pub id: DbId,
    pub producer_id: DbId,
    pub name: String,
    pub season: Option<String>,
    pub planted_area_m2: Option<f64>,
    pub created_at: Timestamp,
}

// ---------------------------------------------------------------------------
// Sensors
// ---------------------------------------------------------------------------

/// A physical sensor unit.
///
/// `sensor_type` is one of `humidity`, `ph`, `npk` (enforced by a CHECK
/// constraint).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Sensor {
    pub id: DbId,
    pub model: String,
    pub sensor_type: String,
    pub created_at: Timestamp,
}

/// A sensor installed on a specific crop.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstalledSensor {
    pub id: DbId,
    pub sensor_id: DbId,
    pub crop_id: DbId,
    pub field_location: Option<String>,
    pub installed_at: Timestamp,
}

/// Join view: an installation with its sensor, crop, and producer names.
///
/// Returned by the installed-sensor browse endpoint.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InstalledSensorDetail {
    pub id: DbId,
    pub sensor_model: String,
    pub sensor_type: String,
    pub crop_name: String,
    pub producer_name: String,
    pub field_location: Option<String>,
    pub installed_at: Timestamp,
}
