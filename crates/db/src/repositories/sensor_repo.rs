//! Repositories for the `sensors` and `installed_sensors` tables.

use sqlx::PgPool;

use crate::models::farm::{InstalledSensor, InstalledSensorDetail, Sensor};

/// Column list for `sensors` SELECT queries.
const SENSOR_COLUMNS: &str = "id, model, sensor_type, created_at";

/// Column list for `installed_sensors` SELECT queries.
const INSTALLED_COLUMNS: &str = "id, sensor_id, crop_id, field_location, installed_at";

/// Provides query operations for sensors and their installations.
pub struct SensorRepo;

impl SensorRepo {
    /// List all sensor units, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Sensor>, sqlx::Error> {
        let query = format!("SELECT {SENSOR_COLUMNS} FROM sensors ORDER BY id");
        sqlx::query_as::<_, Sensor>(&query).fetch_all(pool).await
    }

    /// List all installations, oldest first.
    pub async fn list_installed(pool: &PgPool) -> Result<Vec<InstalledSensor>, sqlx::Error> {
        let query = format!("SELECT {INSTALLED_COLUMNS} FROM installed_sensors ORDER BY id");
        sqlx::query_as::<_, InstalledSensor>(&query)
            .fetch_all(pool)
            .await
    }

    /// List installations joined to their sensor, crop, and producer names.
    pub async fn list_installed_detailed(
        pool: &PgPool,
    ) -> Result<Vec<InstalledSensorDetail>, sqlx::Error> {
        let query = "\
            SELECT si.id, s.model AS sensor_model, s.sensor_type, \
                   c.name AS crop_name, p.name AS producer_name, \
                   si.field_location, si.installed_at \
            FROM installed_sensors si \
            JOIN sensors s ON s.id = si.sensor_id \
            JOIN crops c ON c.id = si.crop_id \
            JOIN producers p ON p.id = c.producer_id \
            ORDER BY si.id";
        sqlx::query_as::<_, InstalledSensorDetail>(query)
            .fetch_all(pool)
            .await
    }

    /// Total number of sensor units.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sensors")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Total number of installations.
    pub async fn count_installed(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM installed_sensors")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
