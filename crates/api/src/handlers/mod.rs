//! Request handlers, grouped by resource area.

pub mod agronomy;
pub mod alerts;
pub mod dashboard;
pub mod farm;
pub mod field;
pub mod irrigation;
pub mod readings;
pub mod vision;
