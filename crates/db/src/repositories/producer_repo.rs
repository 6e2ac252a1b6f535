//! Repository for the `producers` table.

use farmtech_core::types::DbId;
use sqlx::PgPool;

use crate::models::farm::Producer;

/// Column list for `producers` SELECT queries.
const COLUMNS: &str = "id, name, email, phone, created_at";

/// Provides query operations for producers.
pub struct ProducerRepo;

impl ProducerRepo {
    /// List all producers, oldest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Producer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM producers ORDER BY id");
        sqlx::query_as::<_, Producer>(&query).fetch_all(pool).await
    }

    /// Get a single producer by id.
    pub async fn get(pool: &PgPool, id: DbId) -> Result<Option<Producer>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM producers WHERE id = $1");
        sqlx::query_as::<_, Producer>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Total number of producers.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM producers")
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }
}
