//! Environment-driven configuration for the notification layer.

use std::sync::LazyLock;

use regex::Regex;

use farmtech_core::thresholds::ThresholdConfig;

/// Expected shape of an SMS destination: E.164, `+` then 8 to 15 digits.
const PHONE_PATTERN: &str = r"^\+[1-9][0-9]{7,14}$";

/// Compiled E.164 matcher. Compiled once, reused forever.
static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PHONE_PATTERN).expect("valid regex"));

/// Destination contacts for alert delivery.
///
/// Both are optional: an unset channel is simply skipped by the dispatcher.
#[derive(Debug, Clone, Default)]
pub struct AlertContacts {
    /// Gate for the email path. The address itself is delivered to by the
    /// SNS topic subscription, not addressed directly.
    pub email: Option<String>,
    /// Destination phone number for the SMS path, E.164 format.
    pub phone: Option<String>,
}

impl AlertContacts {
    /// Load contacts from environment variables.
    ///
    /// | Variable      | Required | Default |
    /// |---------------|----------|---------|
    /// | `ALERT_EMAIL` | no       | -       |
    /// | `ALERT_PHONE` | no       | -       |
    ///
    /// A phone number that does not look like E.164 is dropped with a
    /// warning, since SNS would reject every publish to it anyway.
    pub fn from_env() -> Self {
        let email = std::env::var("ALERT_EMAIL").ok().filter(|s| !s.is_empty());
        let phone = std::env::var("ALERT_PHONE").ok().filter(|s| !s.is_empty());

        let phone = phone.and_then(|p| {
            if PHONE_RE.is_match(&p) {
                Some(p)
            } else {
                tracing::warn!(phone = %p, "ALERT_PHONE is not E.164 (+<digits>), SMS disabled");
                None
            }
        });

        Self { email, phone }
    }

    /// True when no channel is configured at all.
    pub fn is_empty(&self) -> bool {
        self.email.is_none() && self.phone.is_none()
    }
}

/// Full notification configuration: bounds plus contacts.
#[derive(Debug, Clone)]
pub struct NotifyConfig {
    pub thresholds: ThresholdConfig,
    pub contacts: AlertContacts,
}

impl NotifyConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable       | Required | Default |
    /// |----------------|----------|---------|
    /// | `HUMIDITY_MIN` | no       | `30.0`  |
    /// | `PH_MIN`       | no       | `6.0`   |
    /// | `PH_MAX`       | no       | `7.5`   |
    /// | `ALERT_EMAIL`  | no       | -       |
    /// | `ALERT_PHONE`  | no       | -       |
    ///
    /// Unparseable numeric values fall back to the defaults, as does a
    /// combination the evaluator rejects (for example `PH_MIN > PH_MAX`).
    pub fn from_env() -> Self {
        let defaults = ThresholdConfig::default();
        let thresholds = ThresholdConfig {
            humidity_min: env_f64("HUMIDITY_MIN", defaults.humidity_min),
            ph_min: env_f64("PH_MIN", defaults.ph_min),
            ph_max: env_f64("PH_MAX", defaults.ph_max),
        };
        let thresholds = match thresholds.validate() {
            Ok(()) => thresholds,
            Err(err) => {
                tracing::warn!(error = %err, "threshold configuration rejected, using defaults");
                defaults
            }
        };

        Self {
            thresholds,
            contacts: AlertContacts::from_env(),
        }
    }
}

/// Read an f64 environment variable, falling back to `default`.
fn env_f64(name: &str, default: f64) -> f64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_contacts_report_empty() {
        assert!(AlertContacts::default().is_empty());
        let with_email = AlertContacts {
            email: Some("agro@example.com".to_string()),
            phone: None,
        };
        assert!(!with_email.is_empty());
    }

    #[test]
    fn phone_pattern_accepts_e164() {
        assert!(PHONE_RE.is_match("+5511999990001"));
        assert!(PHONE_RE.is_match("+14155550123"));
        assert!(!PHONE_RE.is_match("11999990001"));
        assert!(!PHONE_RE.is_match("+0123"));
        assert!(!PHONE_RE.is_match("+55 11 99999-0001"));
    }
}
