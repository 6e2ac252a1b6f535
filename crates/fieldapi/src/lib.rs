//! Typed client for the external field controller API.

pub mod client;
pub mod config;

pub use client::{FieldApiClient, FieldApiError, FieldStatus, IrrigationStatus, PROBE_TIMEOUT};
pub use config::FieldApiConfig;
