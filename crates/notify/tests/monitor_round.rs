//! Integration tests for the full monitoring round: readings in the
//! database through evaluation to channel calls.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::PgPool;

use farmtech_core::thresholds::ThresholdConfig;
use farmtech_db::models::reading::CreateSensorReading;
use farmtech_db::repositories::ReadingRepo;
use farmtech_notify::{AlertContacts, AlertDispatcher, AlertMonitor, AlertPublisher, NotifyError};

/// Records publish calls instead of talking to SNS.
#[derive(Default)]
struct RecordingPublisher {
    emails: Mutex<Vec<String>>,
    sms: Mutex<Vec<String>>,
}

#[async_trait]
impl AlertPublisher for RecordingPublisher {
    async fn publish_email(&self, subject: &str, _message: &str) -> Result<(), NotifyError> {
        self.emails.lock().unwrap().push(subject.to_string());
        Ok(())
    }

    async fn publish_sms(&self, _phone: &str, message: &str) -> Result<(), NotifyError> {
        self.sms.lock().unwrap().push(message.to_string());
        Ok(())
    }
}

async fn insert_reading(
    pool: &PgPool,
    minutes_ago: i64,
    humidity: Option<f64>,
    ph: Option<f64>,
) {
    ReadingRepo::insert(
        pool,
        &CreateSensorReading {
            installed_sensor_id: 1,
            recorded_at: Utc::now() - Duration::minutes(minutes_ago),
            humidity,
            ph,
            phosphorus: None,
            potassium: None,
        },
    )
    .await
    .unwrap();
}

fn monitor_with(pool: PgPool, publisher: Arc<RecordingPublisher>) -> AlertMonitor {
    let contacts = AlertContacts {
        email: Some("agro@example.com".to_string()),
        phone: Some("+5511999990001".to_string()),
    };
    AlertMonitor::new(
        pool,
        ThresholdConfig::default(),
        AlertDispatcher::new(publisher, contacts),
    )
}

#[sqlx::test(migrations = "../db/migrations")]
async fn round_alerts_on_out_of_bound_readings(pool: PgPool) {
    insert_reading(&pool, 10, Some(12.0), Some(6.8)).await; // low humidity
    insert_reading(&pool, 8, Some(55.0), Some(8.4)).await; // high pH
    insert_reading(&pool, 5, Some(55.0), Some(7.0)).await; // in range

    let publisher = Arc::new(RecordingPublisher::default());
    let monitor = monitor_with(pool, publisher.clone());

    let summary = monitor.run_round().await.unwrap();

    assert_eq!(summary.readings, 3);
    assert_eq!(summary.alerts, 2);
    assert_eq!(summary.dispatch.emails_sent, 2);
    assert_eq!(summary.dispatch.sms_sent, 2);
    assert_eq!(summary.dispatch.failures, 0);

    let subjects = publisher.emails.lock().unwrap();
    assert!(subjects.iter().any(|s| s == "ALERT: Low soil humidity"));
    assert!(subjects.iter().any(|s| s == "ALERT: Soil pH out of range"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn round_ignores_readings_outside_the_window(pool: PgPool) {
    insert_reading(&pool, 90, Some(5.0), None).await; // out of bound, too old

    let publisher = Arc::new(RecordingPublisher::default());
    let monitor = monitor_with(pool, publisher.clone());

    let summary = monitor.run_round().await.unwrap();

    assert_eq!(summary.readings, 0);
    assert_eq!(summary.alerts, 0);
    assert!(publisher.emails.lock().unwrap().is_empty());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn consecutive_rounds_resend_standing_alerts(pool: PgPool) {
    insert_reading(&pool, 10, Some(12.0), None).await;

    let publisher = Arc::new(RecordingPublisher::default());
    let monitor = monitor_with(pool, publisher.clone());

    monitor.run_round().await.unwrap();
    monitor.run_round().await.unwrap();

    // No suppression: the standing violation alerts on both rounds.
    assert_eq!(publisher.emails.lock().unwrap().len(), 2);
    assert_eq!(publisher.sms.lock().unwrap().len(), 2);
}
