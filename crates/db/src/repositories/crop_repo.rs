//! Repository for the `crops` table.

use sqlx::PgPool;

use crate::models::farm::CropRecord;

/// Column list for `crops` SELECT queries.
const COLUMNS: &str = "id, producer_id, name, season, planted_area_m2, created_at";

/// Provides query operations for crops.
pub struct CropRepo;

impl CropRepo {
    /// List all crops, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<CropRecord>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM crops ORDER BY id");
        sqlx::query_as::<_, CropRecord>(&query)
            .fetch_all(pool)
            .await
    }

    /// Total number of crops.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM crops")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
