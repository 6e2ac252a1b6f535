//! Fixed message templates per alert kind.
//!
//! Each alert renders to three strings: an email subject, an email body, and
//! a short SMS. The SMS is capped at 160 characters; the email body gets a
//! timestamp/system footer appended at delivery time.

use farmtech_core::alert::Alert;

/// Hard upper bound for SMS bodies.
pub const SMS_MAX_LEN: usize = 160;

/// Location text used when a detection alert has no field location.
const UNKNOWN_LOCATION: &str = "uploaded image";

/// The rendered messages for one alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertMessage {
    pub subject: String,
    pub body: String,
    pub sms: String,
}

/// Render the fixed template for an alert.
pub fn compose(alert: &Alert) -> AlertMessage {
    match alert {
        Alert::LowHumidity {
            installed_sensor_id,
            humidity,
            minimum,
            ..
        } => AlertMessage {
            subject: "ALERT: Low soil humidity".to_string(),
            body: format!(
                "LOW HUMIDITY ALERT\n\
                 \n\
                 Sensor {installed_sensor_id} reported critical humidity: {humidity:.1}%\n\
                 \n\
                 Recommended action:\n\
                 - Check the irrigation system\n\
                 - Start irrigation immediately\n\
                 - Inspect for leaks or blocked lines\n\
                 \n\
                 Sensor id: {installed_sensor_id}\n\
                 Humidity: {humidity:.1}%\n\
                 Minimum: {minimum:.1}%"
            ),
            sms: truncate_sms(format!(
                "ALERT: low humidity ({humidity:.1}%) at sensor {installed_sensor_id}. Start irrigation!"
            )),
        },

        Alert::PhOutOfRange {
            installed_sensor_id,
            ph,
            minimum,
            maximum,
            ..
        } => AlertMessage {
            subject: "ALERT: Soil pH out of range".to_string(),
            body: format!(
                "PH OUT OF RANGE ALERT\n\
                 \n\
                 Sensor {installed_sensor_id} reported critical pH: {ph:.2}\n\
                 \n\
                 Recommended action:\n\
                 - Assess the need for soil correction\n\
                 - Apply limestone or sulfur as required\n\
                 - Request a detailed agronomic analysis\n\
                 \n\
                 Sensor id: {installed_sensor_id}\n\
                 pH: {ph:.2}\n\
                 Acceptable band: {minimum:.1} - {maximum:.1}"
            ),
            sms: truncate_sms(format!(
                "ALERT: critical pH ({ph:.2}) at sensor {installed_sensor_id}. Check soil correction!"
            )),
        },

        Alert::PestDetected {
            label,
            confidence,
            field_location,
        } => {
            let location = field_location.as_deref().unwrap_or(UNKNOWN_LOCATION);
            AlertMessage {
                subject: "ALERT: Pest detected".to_string(),
                body: format!(
                    "PEST DETECTED\n\
                     \n\
                     Computer vision detected: {label} ({:.0}% confidence)\n\
                     \n\
                     Location: {location}\n\
                     \n\
                     Recommended action:\n\
                     - Inspect the area immediately\n\
                     - Apply the appropriate phytosanitary treatment\n\
                     - Isolate the area if needed\n\
                     \n\
                     Type: {label}\n\
                     Location: {location}",
                    confidence * 100.0
                ),
                sms: truncate_sms(format!(
                    "ALERT: pest detected ({label}) at {location}. Inspect the area!"
                )),
            }
        }

        Alert::DiseaseDetected {
            label,
            confidence,
            field_location,
        } => {
            let location = field_location.as_deref().unwrap_or(UNKNOWN_LOCATION);
            AlertMessage {
                subject: "ALERT: Disease detected".to_string(),
                body: format!(
                    "DISEASE DETECTED\n\
                     \n\
                     Computer vision detected: {label} ({:.0}% confidence)\n\
                     \n\
                     Location: {location}\n\
                     \n\
                     Recommended action:\n\
                     - Inspect the area immediately\n\
                     - Apply the appropriate phytosanitary treatment\n\
                     - Isolate the affected area\n\
                     - Consult a plant pathologist\n\
                     \n\
                     Type: {label}\n\
                     Location: {location}",
                    confidence * 100.0
                ),
                sms: truncate_sms(format!(
                    "ALERT: disease detected ({label}) at {location}. Inspect the area!"
                )),
            }
        }
    }
}

/// Cap a message at [`SMS_MAX_LEN`] characters, respecting char boundaries.
fn truncate_sms(message: String) -> String {
    if message.chars().count() <= SMS_MAX_LEN {
        return message;
    }
    message.chars().take(SMS_MAX_LEN).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
