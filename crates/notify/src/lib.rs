//! Alert notification layer for the FarmTech platform.
//!
//! Turns [`Alert`](farmtech_core::alert::Alert)s into formatted messages and
//! fans them out over the configured channels: email via the managed SNS
//! topic, SMS via direct phone-number publish. Also owns the monitoring
//! round that scans recent readings, evaluates them, and dispatches whatever
//! the evaluator raises.
//!
//! Delivery is best effort: a failed channel call is logged and counted,
//! never retried.

pub mod config;
pub mod dispatch;
pub mod messages;
pub mod monitor;
pub mod publisher;

pub use config::{AlertContacts, NotifyConfig};
pub use dispatch::{AlertDispatcher, DispatchSummary};
pub use monitor::{AlertMonitor, RoundSummary};
pub use publisher::{AlertPublisher, NotifyError, SnsPublisher};
