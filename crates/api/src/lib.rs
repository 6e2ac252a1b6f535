//! HTTP API for the FarmTech sensor platform.
//!
//! Serves everything the dashboard needs: the relational farm structure,
//! sensor readings and their aggregates, planting plan calculations, vision
//! model analysis with alert dispatch, irrigation prediction, a proxy onto
//! the field controller API, and manual alert monitoring rounds.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod sessions;
pub mod state;
