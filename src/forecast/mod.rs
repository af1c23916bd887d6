//! Forecast normalization and regional aggregation
//!
//! Raw records from a [`ForecastSource`](crate::source::ForecastSource)
//! become [`ForecastPoint`](crate::data::ForecastPoint)s through the
//! normalizer, pass the validator, and are either returned per beach or
//! reduced to summary cards by the aggregator.

pub mod aggregator;
pub mod classifier;
pub mod direction;
pub mod normalizer;
pub mod pipeline;
pub mod validator;
pub mod wave_period;

pub use aggregator::aggregate;
pub use direction::circular_mean;
pub use normalizer::normalize;
pub use pipeline::{ForecastPipeline, Stage};
pub use validator::filter_valid;

use thiserror::Error;

use crate::source::SourceError;

/// Errors surfaced by single-beach forecast requests
#[derive(Debug, Error)]
pub enum ForecastError {
    /// The forecast source failed; passed through unchanged
    #[error(transparent)]
    SourceUnavailable(#[from] SourceError),

    /// The beach has no metadata document
    #[error("no forecast metadata for beach {beach_id} in region '{region}'")]
    NoMetadataFound { beach_id: i64, region: String },
}

impl ForecastError {
    /// Whether retrying the same request later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ForecastError::SourceUnavailable(SourceError::Transport(_))
        )
    }
}
