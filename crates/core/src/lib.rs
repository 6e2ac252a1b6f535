//! Core domain types and pure logic for the FarmTech platform.
//!
//! This crate holds everything the other workspace members share that does
//! not touch a database, a network, or the filesystem: sensor reading
//! snapshots, threshold evaluation, alert construction, and the planting
//! calculators. Keeping it pure makes the decision logic trivially testable.

pub mod agronomy;
pub mod alert;
pub mod channels;
pub mod error;
pub mod thresholds;
pub mod types;

pub use error::CoreError;
