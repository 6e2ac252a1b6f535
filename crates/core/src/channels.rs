//! Well-known notification channel name constants.
//!
//! These match the channel labels used by the alert dispatcher when logging
//! and reporting delivery outcomes.

/// Email notification delivered via the managed pub/sub topic.
pub const CHANNEL_EMAIL: &str = "email";

/// SMS notification published directly to the configured phone number.
pub const CHANNEL_SMS: &str = "sms";
