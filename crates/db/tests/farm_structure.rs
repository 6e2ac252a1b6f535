//! Integration tests for the farm structure repositories.
//!
//! Exercises the seeded reference data and the join views against a real
//! database.

use sqlx::PgPool;

use farmtech_db::repositories::{CropRepo, ProducerRepo, SensorRepo};

#[sqlx::test(migrations = "./migrations")]
async fn seeded_structure_is_browsable(pool: PgPool) {
    let producers = ProducerRepo::list(&pool).await.unwrap();
    assert_eq!(producers.len(), 2);
    assert_eq!(producers[0].name, "Fazenda Santa Clara");

    let crops = CropRepo::list(&pool).await.unwrap();
    assert_eq!(crops.len(), 2);
    assert_eq!(crops[0].producer_id, producers[0].id);

    let sensors = SensorRepo::list(&pool).await.unwrap();
    assert_eq!(sensors.len(), 3);

    let installed = SensorRepo::list_installed(&pool).await.unwrap();
    assert_eq!(installed.len(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn installed_detail_join_resolves_names(pool: PgPool) {
    let detailed = SensorRepo::list_installed_detailed(&pool).await.unwrap();
    assert_eq!(detailed.len(), 3);

    let first = &detailed[0];
    assert_eq!(first.sensor_model, "DHT22");
    assert_eq!(first.sensor_type, "humidity");
    assert_eq!(first.crop_name, "coffee");
    assert_eq!(first.producer_name, "Fazenda Santa Clara");
    assert_eq!(first.field_location.as_deref(), Some("north terrace"));
}

#[sqlx::test(migrations = "./migrations")]
async fn entity_counts_match_seed(pool: PgPool) {
    assert_eq!(ProducerRepo::count(&pool).await.unwrap(), 2);
    assert_eq!(CropRepo::count(&pool).await.unwrap(), 2);
    assert_eq!(SensorRepo::count(&pool).await.unwrap(), 3);
    assert_eq!(SensorRepo::count_installed(&pool).await.unwrap(), 3);
}

#[sqlx::test(migrations = "./migrations")]
async fn duplicate_producer_email_is_rejected(pool: PgPool) {
    let result = sqlx::query("INSERT INTO producers (name, email) VALUES ($1, $2)")
        .bind("Fazenda Clone")
        .bind("contato@santaclara.example")
        .execute(&pool)
        .await;

    let err = result.unwrap_err();
    match err {
        sqlx::Error::Database(db_err) => {
            assert_eq!(db_err.code().as_deref(), Some("23505"));
            assert_eq!(db_err.constraint(), Some("uq_producers_email"));
        }
        other => panic!("expected database error, got: {other}"),
    }
}
