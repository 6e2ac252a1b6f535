//! Repository for the `sensor_readings` table (append-only time-series).

use farmtech_core::types::Timestamp;
use sqlx::PgPool;

use crate::models::reading::{CreateSensorReading, ReadingDetail, ReadingStats, SensorReading};

/// Column list for `sensor_readings` SELECT queries (includes `id` and `created_at`).
const COLUMNS: &str = "\
    id, installed_sensor_id, recorded_at, \
    humidity, ph, phosphorus, potassium, created_at";

/// Column list for `sensor_readings` INSERT statements (excludes auto-generated columns).
const INSERT_COLUMNS: &str = "\
    installed_sensor_id, recorded_at, humidity, ph, phosphorus, potassium";

/// Provides query operations for sensor readings.
pub struct ReadingRepo;

impl ReadingRepo {
    /// Insert a single reading row.
    pub async fn insert(
        pool: &PgPool,
        reading: &CreateSensorReading,
    ) -> Result<SensorReading, sqlx::Error> {
        let query = format!(
            "INSERT INTO sensor_readings ({INSERT_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(reading.installed_sensor_id)
            .bind(reading.recorded_at)
            .bind(reading.humidity)
            .bind(reading.ph)
            .bind(reading.phosphorus)
            .bind(reading.potassium)
            .fetch_one(pool)
            .await
    }

    /// Get all readings recorded at or after `since`, newest first.
    ///
    /// This is the monitoring-round query: every row in the window is
    /// evaluated, so no limit applies.
    pub async fn list_since(
        pool: &PgPool,
        since: Timestamp,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE recorded_at >= $1 \
             ORDER BY recorded_at DESC"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(since)
            .fetch_all(pool)
            .await
    }

    /// Get the most recent readings that carry a humidity value, newest
    /// first, for the dashboard chart series.
    pub async fn list_for_charts(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<SensorReading>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sensor_readings \
             WHERE humidity IS NOT NULL \
             ORDER BY recorded_at DESC \
             LIMIT $1"
        );
        sqlx::query_as::<_, SensorReading>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Get recent readings joined to their installation context, newest
    /// first, for the browse table.
    pub async fn list_recent_detailed(
        pool: &PgPool,
        since: Timestamp,
        limit: i64,
    ) -> Result<Vec<ReadingDetail>, sqlx::Error> {
        let query = "\
            SELECT r.id, r.installed_sensor_id, r.recorded_at, \
                   r.humidity, r.ph, r.phosphorus, r.potassium, \
                   si.field_location, c.name AS crop_name, p.name AS producer_name \
            FROM sensor_readings r \
            JOIN installed_sensors si ON si.id = r.installed_sensor_id \
            JOIN crops c ON c.id = si.crop_id \
            JOIN producers p ON p.id = c.producer_id \
            WHERE r.recorded_at >= $1 \
            ORDER BY r.recorded_at DESC \
            LIMIT $2";
        sqlx::query_as::<_, ReadingDetail>(query)
            .bind(since)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Aggregate statistics over readings recorded at or after `since`.
    ///
    /// `humidity_min` feeds the below-minimum count used by the dashboard's
    /// "needs irrigation" metric.
    pub async fn stats_since(
        pool: &PgPool,
        since: Timestamp,
        humidity_min: f64,
    ) -> Result<ReadingStats, sqlx::Error> {
        let query = "\
            SELECT COUNT(*) AS total, \
                   AVG(humidity) AS avg_humidity, \
                   AVG(ph) AS avg_ph, \
                   COUNT(*) FILTER (WHERE humidity < $2) AS below_humidity_min \
            FROM sensor_readings \
            WHERE recorded_at >= $1";
        sqlx::query_as::<_, ReadingStats>(query)
            .bind(since)
            .bind(humidity_min)
            .fetch_one(pool)
            .await
    }

    /// Total number of reading rows.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sensor_readings")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
