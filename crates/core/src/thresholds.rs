//! Threshold evaluation for sensor readings.
//!
//! Pure logic with no database access. The caller is responsible for
//! fetching recent readings and passing them in along with the configured
//! bounds.
//!
//! Evaluation is deliberately stateless: there is no hysteresis and no
//! suppression of repeated alerts, so every run that still sees an
//! out-of-bound reading raises the alert again.

use serde::Serialize;

use crate::alert::Alert;
use crate::error::CoreError;
use crate::types::{DbId, Timestamp};

/// Default minimum acceptable soil humidity, in percent.
pub const DEFAULT_HUMIDITY_MIN: f64 = 30.0;

/// Default lower bound of the acceptable soil pH band.
pub const DEFAULT_PH_MIN: f64 = 6.0;

/// Default upper bound of the acceptable soil pH band.
pub const DEFAULT_PH_MAX: f64 = 7.5;

/// The scalar bounds the evaluator compares readings against.
///
/// Loaded from the environment at startup and immutable for the lifetime of
/// the process.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdConfig {
    /// Humidity below this value raises [`Alert::LowHumidity`].
    pub humidity_min: f64,
    /// pH below this value raises [`Alert::PhOutOfRange`].
    pub ph_min: f64,
    /// pH above this value raises [`Alert::PhOutOfRange`].
    pub ph_max: f64,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            humidity_min: DEFAULT_HUMIDITY_MIN,
            ph_min: DEFAULT_PH_MIN,
            ph_max: DEFAULT_PH_MAX,
        }
    }
}

impl ThresholdConfig {
    /// Reject configurations that can never hold (inverted pH band,
    /// non-finite or negative bounds).
    pub fn validate(&self) -> Result<(), CoreError> {
        if !self.humidity_min.is_finite() || !self.ph_min.is_finite() || !self.ph_max.is_finite() {
            return Err(CoreError::validation("threshold bounds must be finite"));
        }
        if self.humidity_min < 0.0 {
            return Err(CoreError::validation("humidity_min must not be negative"));
        }
        if self.ph_min > self.ph_max {
            return Err(CoreError::validation(format!(
                "ph_min ({}) must not exceed ph_max ({})",
                self.ph_min, self.ph_max
            )));
        }
        Ok(())
    }
}

/// A single sensor reading snapshot used by the evaluator.
///
/// Measurement fields are optional because a sensor reports only the
/// quantities it actually measures.
#[derive(Debug, Clone)]
pub struct ReadingSnapshot {
    pub installed_sensor_id: DbId,
    pub humidity: Option<f64>,
    pub ph: Option<f64>,
    pub phosphorus: Option<f64>,
    pub potassium: Option<f64>,
    pub recorded_at: Timestamp,
}

/// Evaluate a batch of reading snapshots and return every violation found.
pub fn evaluate(readings: &[ReadingSnapshot], config: &ThresholdConfig) -> Vec<Alert> {
    let mut alerts = Vec::new();
    for reading in readings {
        check_reading(reading, config, &mut alerts);
    }
    alerts
}

/// Compare one reading against the bounds and push any alerts it raises.
///
/// Missing measurements never trigger. A single reading can raise both a
/// humidity and a pH alert.
fn check_reading(reading: &ReadingSnapshot, config: &ThresholdConfig, alerts: &mut Vec<Alert>) {
    if let Some(humidity) = reading.humidity {
        if humidity < config.humidity_min {
            alerts.push(Alert::LowHumidity {
                installed_sensor_id: reading.installed_sensor_id,
                humidity,
                minimum: config.humidity_min,
                recorded_at: reading.recorded_at,
            });
        }
    }

    if let Some(ph) = reading.ph {
        if ph < config.ph_min || ph > config.ph_max {
            alerts.push(Alert::PhOutOfRange {
                installed_sensor_id: reading.installed_sensor_id,
                ph,
                minimum: config.ph_min,
                maximum: config.ph_max,
                recorded_at: reading.recorded_at,
            });
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
