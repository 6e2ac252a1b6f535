//! Alert dispatch fan-out.
//!
//! One dispatcher per process, holding the configured contacts and a
//! publisher. For each alert: the email path runs iff an alert email is
//! configured, the SMS path iff a phone is configured. A failed channel
//! call is logged and counted as a dropped notification; there is no retry
//! and no dead-letter handling.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;

use farmtech_core::alert::Alert;
use farmtech_core::channels::{CHANNEL_EMAIL, CHANNEL_SMS};

use crate::config::AlertContacts;
use crate::messages;
use crate::publisher::AlertPublisher;

/// Signature line appended to every alert email body.
const EMAIL_FOOTER_SYSTEM: &str = "FarmTech Solutions";

/// Delivery counters for one dispatch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DispatchSummary {
    /// Alerts handed to the dispatcher.
    pub alerts: usize,
    /// Successful email publishes.
    pub emails_sent: usize,
    /// Successful SMS publishes.
    pub sms_sent: usize,
    /// Channel calls that failed and were dropped.
    pub failures: usize,
}

impl DispatchSummary {
    fn merge(&mut self, other: DispatchSummary) {
        self.alerts += other.alerts;
        self.emails_sent += other.emails_sent;
        self.sms_sent += other.sms_sent;
        self.failures += other.failures;
    }
}

/// Formats alerts and fans them out over the configured channels.
#[derive(Clone)]
pub struct AlertDispatcher {
    publisher: Arc<dyn AlertPublisher>,
    contacts: AlertContacts,
}

impl AlertDispatcher {
    /// Create a dispatcher for the given publisher and contacts.
    pub fn new(publisher: Arc<dyn AlertPublisher>, contacts: AlertContacts) -> Self {
        Self {
            publisher,
            contacts,
        }
    }

    /// The contacts this dispatcher was configured with.
    pub fn contacts(&self) -> &AlertContacts {
        &self.contacts
    }

    /// Dispatch a batch of alerts, returning the merged delivery counters.
    pub async fn dispatch_all(&self, alerts: &[Alert]) -> DispatchSummary {
        let mut summary = DispatchSummary::default();
        for alert in alerts {
            summary.merge(self.dispatch(alert).await);
        }
        summary
    }

    /// Dispatch a single alert over every configured channel.
    pub async fn dispatch(&self, alert: &Alert) -> DispatchSummary {
        let message = messages::compose(alert);
        let kind = alert.kind().as_str();

        let mut summary = DispatchSummary {
            alerts: 1,
            ..DispatchSummary::default()
        };

        if let Some(email) = &self.contacts.email {
            let body = format!(
                "{}\n\nTimestamp: {}\nSystem: {}",
                message.body,
                Utc::now().format("%Y-%m-%d %H:%M:%S UTC"),
                EMAIL_FOOTER_SYSTEM
            );
            match self.publisher.publish_email(&message.subject, &body).await {
                Ok(()) => {
                    tracing::info!(kind, to = %email, channel = CHANNEL_EMAIL, "Alert delivered");
                    summary.emails_sent += 1;
                }
                Err(e) => {
                    tracing::error!(
                        kind,
                        channel = CHANNEL_EMAIL,
                        error = %e,
                        "Alert delivery failed, notification dropped"
                    );
                    summary.failures += 1;
                }
            }
        }

        if let Some(phone) = &self.contacts.phone {
            match self.publisher.publish_sms(phone, &message.sms).await {
                Ok(()) => {
                    tracing::info!(kind, channel = CHANNEL_SMS, "Alert delivered");
                    summary.sms_sent += 1;
                }
                Err(e) => {
                    tracing::error!(
                        kind,
                        channel = CHANNEL_SMS,
                        error = %e,
                        "Alert delivery failed, notification dropped"
                    );
                    summary.failures += 1;
                }
            }
        }

        summary
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
