//! Forecast sources
//!
//! A [`ForecastSource`] is the one collaborator the pipeline talks to. It
//! hands out beach metadata, raw records and the beach directory, and maps
//! its failures into the closed [`SourceError`] taxonomy.

pub mod dataset;
pub mod http;

pub use dataset::{Dataset, DatasetSource};
pub use http::HttpSource;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::data::{BeachDescriptor, Metadata, RawRecord};

/// Errors a forecast source can report
#[derive(Debug, Error)]
pub enum SourceError {
    /// The request could not be completed
    #[error("forecast source unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// The source rejected our credentials
    #[error("forecast source refused access (HTTP {status})")]
    Unauthorized { status: u16 },

    /// The configured source address is not a usable base URL
    #[error("invalid forecast source URL: {0}")]
    InvalidUrl(String),

    /// The source answered with something we could not use
    #[error("invalid response from forecast source: {0}")]
    InvalidResponse(String),

    /// Reading a local dataset failed
    #[error("failed to read dataset: {0}")]
    Io(#[from] std::io::Error),

    /// A local dataset is not valid JSON
    #[error("failed to parse dataset: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Where raw forecast records come from
///
/// "No data" is never an error: a beach without metadata returns
/// `Ok(None)` and a window without records returns an empty list. Errors
/// are reserved for transport and access failures.
#[async_trait]
pub trait ForecastSource: Send + Sync {
    /// Fetches the metadata document of a beach
    async fn fetch_metadata(
        &self,
        beach_id: i64,
        region: &str,
    ) -> Result<Option<Metadata>, SourceError>;

    /// Fetches records newer than `since`, oldest first, at most `limit`
    async fn fetch_records(
        &self,
        beach_id: i64,
        region: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawRecord>, SourceError>;

    /// Lists known beaches, optionally restricted to one region
    async fn list_beaches(&self, region: Option<&str>)
        -> Result<Vec<BeachDescriptor>, SourceError>;
}
