//! Alert publishing over AWS SNS.
//!
//! [`SnsPublisher`] backs both delivery paths: email alerts publish to the
//! configured topic (subscribers receive them), SMS alerts publish straight
//! to a phone number. The [`AlertPublisher`] trait keeps the dispatcher
//! testable without AWS access.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_sns::error::DisplayErrorContext;

/// Region used when the environment does not name one.
const DEFAULT_SNS_REGION: &str = "sa-east-1";

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for the notification layer.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// The email path was invoked without `SNS_TOPIC_ARN` set.
    #[error("SNS topic ARN is not configured")]
    TopicNotConfigured,

    /// The SNS publish call itself failed.
    #[error("SNS publish failed: {0}")]
    Publish(String),

    /// A database error while gathering readings for a monitoring round.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

// ---------------------------------------------------------------------------
// AlertPublisher
// ---------------------------------------------------------------------------

/// Outbound channel operations the dispatcher needs.
#[async_trait]
pub trait AlertPublisher: Send + Sync {
    /// Publish a subject + message pair for email fan-out.
    async fn publish_email(&self, subject: &str, message: &str) -> Result<(), NotifyError>;

    /// Publish a short message to a phone number.
    async fn publish_sms(&self, phone: &str, message: &str) -> Result<(), NotifyError>;
}

// ---------------------------------------------------------------------------
// SnsPublisher
// ---------------------------------------------------------------------------

/// Production publisher backed by the AWS SNS client.
pub struct SnsPublisher {
    client: aws_sdk_sns::Client,
    topic_arn: Option<String>,
}

impl SnsPublisher {
    /// Wrap an existing client.
    pub fn new(client: aws_sdk_sns::Client, topic_arn: Option<String>) -> Self {
        Self { client, topic_arn }
    }

    /// Build a publisher from the environment.
    ///
    /// | Variable        | Required        | Default     |
    /// |-----------------|-----------------|-------------|
    /// | `AWS_REGION`    | no              | `sa-east-1` |
    /// | `SNS_TOPIC_ARN` | for email only  | -           |
    ///
    /// Credentials come from the standard AWS provider chain (environment,
    /// profile, instance role).
    pub async fn from_env() -> Self {
        let region_provider =
            RegionProviderChain::default_provider().or_else(Region::new(DEFAULT_SNS_REGION));
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        let topic_arn = std::env::var("SNS_TOPIC_ARN").ok().filter(|s| !s.is_empty());
        if topic_arn.is_none() {
            tracing::warn!("SNS_TOPIC_ARN not set, email alerts will be dropped");
        }

        Self::new(aws_sdk_sns::Client::new(&shared_config), topic_arn)
    }
}

#[async_trait]
impl AlertPublisher for SnsPublisher {
    async fn publish_email(&self, subject: &str, message: &str) -> Result<(), NotifyError> {
        let topic_arn = self
            .topic_arn
            .as_deref()
            .ok_or(NotifyError::TopicNotConfigured)?;

        let response = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(subject)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Publish(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            message_id = response.message_id().unwrap_or("unknown"),
            subject,
            "Alert published to SNS topic"
        );
        Ok(())
    }

    async fn publish_sms(&self, phone: &str, message: &str) -> Result<(), NotifyError> {
        let response = self
            .client
            .publish()
            .phone_number(phone)
            .message(message)
            .send()
            .await
            .map_err(|e| NotifyError::Publish(DisplayErrorContext(&e).to_string()))?;

        tracing::info!(
            message_id = response.message_id().unwrap_or("unknown"),
            "Alert SMS published"
        );
        Ok(())
    }
}
