//! Surf forecast normalization and regional aggregation
//!
//! Turns raw per-timestamp marine and weather records from a forecast source
//! into canonical forecast points, and averages the latest conditions of
//! several beaches into regional wind and wave summaries.

pub mod cache;
pub mod cli;
pub mod config;
pub mod data;
pub mod forecast;
pub mod report;
pub mod source;

/// Name used for the cache and config directories
pub const APP_NAME: &str = "surfcast";
