//! Fetch, normalize, validate and aggregate forecasts from a source

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::{aggregator, normalizer, validator, ForecastError};
use crate::data::{BeachDescriptor, ForecastPoint, RawRecord, RegionalSummaryCard};
use crate::source::ForecastSource;

/// Default number of days of history requested per beach
pub const DEFAULT_DAYS_BACK: u32 = 3;

/// Default cap on records requested per beach
pub const DEFAULT_RECORD_LIMIT: usize = 1000;

/// Stages of a regional aggregation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    FetchingAll,
    Normalizing,
    Validating,
    Aggregating,
    Done,
    /// The source itself failed while fetching
    Failed,
}

impl Stage {
    /// Whether `next` directly follows this stage
    pub fn can_advance_to(self, next: Stage) -> bool {
        use Stage::*;
        matches!(
            (self, next),
            (Idle, FetchingAll)
                | (FetchingAll, Normalizing)
                | (FetchingAll, Failed)
                | (Normalizing, Validating)
                | (Validating, Aggregating)
                | (Aggregating, Done)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done | Stage::Failed)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::FetchingAll => "fetching",
            Stage::Normalizing => "normalizing",
            Stage::Validating => "validating",
            Stage::Aggregating => "aggregating",
            Stage::Done => "done",
            Stage::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Walks one request through its stages, logging every transition
#[derive(Debug)]
struct StageTracker {
    stage: Stage,
}

impl StageTracker {
    fn new() -> Self {
        Self { stage: Stage::Idle }
    }

    fn advance(&mut self, next: Stage) {
        debug_assert!(
            self.stage.can_advance_to(next),
            "illegal stage transition {} -> {}",
            self.stage,
            next
        );
        debug!(from = %self.stage, to = %next, "stage transition");
        self.stage = next;
    }
}

/// Forecast pipeline over one [`ForecastSource`]
#[derive(Debug, Clone)]
pub struct ForecastPipeline<S> {
    source: S,
    days_back: u32,
    record_limit: usize,
}

impl<S: ForecastSource> ForecastPipeline<S> {
    /// Creates a pipeline with the default history window and record cap
    pub fn new(source: S) -> Self {
        Self {
            source,
            days_back: DEFAULT_DAYS_BACK,
            record_limit: DEFAULT_RECORD_LIMIT,
        }
    }

    /// Sets the history window used by regional summaries
    pub fn with_days_back(mut self, days_back: u32) -> Self {
        self.days_back = days_back;
        self
    }

    /// Sets the per-beach record cap
    pub fn with_record_limit(mut self, record_limit: usize) -> Self {
        self.record_limit = record_limit;
        self
    }

    /// Returns the normalized, validated forecast of one beach, oldest first
    ///
    /// The window covers `days_back` days before the beach's last update.
    /// Source errors are passed through, and a beach without metadata is
    /// reported as [`ForecastError::NoMetadataFound`].
    #[instrument(skip(self))]
    pub async fn get_forecast(
        &self,
        beach_id: i64,
        region: &str,
        days_back: u32,
    ) -> Result<Vec<ForecastPoint>, ForecastError> {
        let raw = self.fetch_raw(beach_id, region, days_back).await?;
        let fetched = raw.len();
        let points = prepare(raw);
        info!(fetched, kept = points.len(), "forecast ready");
        Ok(points)
    }

    /// Aggregates the latest conditions of the given beaches
    ///
    /// Beaches are fetched concurrently. A beach whose fetch fails is left
    /// out; when every beach fails the cards fall back to zero magnitude
    /// with no direction. Never fails.
    #[instrument(skip(self, beaches), fields(beaches = beaches.len()))]
    pub async fn get_regional_summary(&self, beaches: &[(i64, String)]) -> [RegionalSummaryCard; 2] {
        let mut tracker = StageTracker::new();
        tracker.advance(Stage::FetchingAll);
        self.fan_out(&mut tracker, beaches).await
    }

    /// Aggregates every beach the source lists for `region`
    ///
    /// Fails only when the beach directory itself cannot be fetched.
    #[instrument(skip(self))]
    pub async fn get_region_summary(
        &self,
        region: Option<&str>,
    ) -> Result<[RegionalSummaryCard; 2], ForecastError> {
        let mut tracker = StageTracker::new();
        tracker.advance(Stage::FetchingAll);

        let beaches = match self.source.list_beaches(region).await {
            Ok(beaches) => beaches,
            Err(e) => {
                tracker.advance(Stage::Failed);
                debug_assert!(tracker.stage.is_terminal());
                return Err(e.into());
            }
        };

        let targets: Vec<(i64, String)> = beaches.into_iter().map(|b| (b.id, b.region)).collect();
        Ok(self.fan_out(&mut tracker, &targets).await)
    }

    /// Lists the beaches known to the source
    pub async fn list_beaches(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<BeachDescriptor>, ForecastError> {
        Ok(self.source.list_beaches(region).await?)
    }

    async fn fetch_raw(
        &self,
        beach_id: i64,
        region: &str,
        days_back: u32,
    ) -> Result<Vec<RawRecord>, ForecastError> {
        let metadata = self
            .source
            .fetch_metadata(beach_id, region)
            .await?
            .ok_or_else(|| ForecastError::NoMetadataFound {
                beach_id,
                region: region.to_string(),
            })?;

        let since = window_start(metadata.last_updated, days_back);
        let records = self
            .source
            .fetch_records(beach_id, region, since, self.record_limit)
            .await?;
        debug!(beach_id, region, %since, records = records.len(), "fetched records");
        Ok(records)
    }

    /// Runs a regional request from the fetching stage to the end
    async fn fan_out(
        &self,
        tracker: &mut StageTracker,
        beaches: &[(i64, String)],
    ) -> [RegionalSummaryCard; 2] {
        let fetches = beaches.iter().map(|(beach_id, region)| async move {
            let result = self.fetch_raw(*beach_id, region, self.days_back).await;
            (*beach_id, region.as_str(), result)
        });

        let raw_sets: Vec<Vec<RawRecord>> = join_all(fetches)
            .await
            .into_iter()
            .filter_map(|(beach_id, region, result)| match result {
                Ok(records) => Some(records),
                Err(e) => {
                    warn!(beach_id, region, error = %e, "excluding beach from regional summary");
                    None
                }
            })
            .collect();

        tracker.advance(Stage::Normalizing);
        let normalized: Vec<Vec<ForecastPoint>> =
            raw_sets.into_iter().map(normalizer::normalize_all).collect();

        tracker.advance(Stage::Validating);
        let latest: Vec<ForecastPoint> = normalized
            .into_iter()
            .filter_map(|points| aggregator::latest(&validator::filter_valid(points)))
            .collect();

        tracker.advance(Stage::Aggregating);
        let cards = aggregator::aggregate(&latest);

        tracker.advance(Stage::Done);
        debug_assert!(tracker.stage.is_terminal());
        info!(
            requested = beaches.len(),
            contributing = latest.len(),
            "regional summary ready"
        );
        cards
    }
}

/// Start of a `days_back` window ending at `last_updated`
///
/// Saturates at the earliest representable instant.
fn window_start(last_updated: DateTime<Utc>, days_back: u32) -> DateTime<Utc> {
    last_updated
        .checked_sub_signed(Duration::days(i64::from(days_back)))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Normalizes, validates and orders the records of one beach
pub fn prepare(records: Vec<RawRecord>) -> Vec<ForecastPoint> {
    let mut points = validator::filter_valid(normalizer::normalize_all(records));
    points.sort_by_key(|p| p.time);
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn test_happy_path_transitions() {
        let path = [
            Stage::Idle,
            Stage::FetchingAll,
            Stage::Normalizing,
            Stage::Validating,
            Stage::Aggregating,
            Stage::Done,
        ];
        for pair in path.windows(2) {
            assert!(pair[0].can_advance_to(pair[1]), "{} -> {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn test_failure_only_from_fetching() {
        assert!(Stage::FetchingAll.can_advance_to(Stage::Failed));
        for stage in [
            Stage::Idle,
            Stage::Normalizing,
            Stage::Validating,
            Stage::Aggregating,
            Stage::Done,
        ] {
            assert!(!stage.can_advance_to(Stage::Failed), "{} -> failed", stage);
        }
    }

    #[test]
    fn test_no_skipping_stages() {
        assert!(!Stage::Idle.can_advance_to(Stage::Normalizing));
        assert!(!Stage::FetchingAll.can_advance_to(Stage::Aggregating));
        assert!(!Stage::Done.can_advance_to(Stage::Idle));
    }

    #[test]
    fn test_terminal_stages() {
        assert!(Stage::Done.is_terminal());
        assert!(Stage::Failed.is_terminal());
        assert!(!Stage::Aggregating.is_terminal());
    }

    #[test]
    fn test_tracker_follows_happy_path() {
        let mut tracker = StageTracker::new();
        tracker.advance(Stage::FetchingAll);
        tracker.advance(Stage::Normalizing);
        tracker.advance(Stage::Validating);
        tracker.advance(Stage::Aggregating);
        tracker.advance(Stage::Done);
        assert_eq!(tracker.stage, Stage::Done);
    }

    #[test]
    fn test_window_start() {
        let updated = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        assert_eq!(
            window_start(updated, 2),
            Utc.with_ymd_and_hms(2024, 7, 13, 6, 0, 0).unwrap()
        );
        assert_eq!(window_start(updated, 0), updated);
    }

    #[test]
    fn test_window_start_saturates() {
        let updated = Utc.with_ymd_and_hms(2024, 7, 15, 6, 0, 0).unwrap();
        assert_eq!(window_start(updated, u32::MAX), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_prepare_sorts_and_drops_gaps() {
        let t0 = Utc.with_ymd_and_hms(2024, 7, 15, 0, 0, 0).unwrap();
        let late = RawRecord {
            wind_speed: Some(4.0),
            ..RawRecord::new(2001, "jeju", t0 + Duration::hours(6))
        };
        let gap = RawRecord::new(2001, "jeju", t0 + Duration::hours(3));
        let early = RawRecord {
            wind_speed: Some(2.0),
            ..RawRecord::new(2001, "jeju", t0)
        };

        let points = prepare(vec![late, gap, early]);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].time, t0);
        assert_eq!(points[1].time, t0 + Duration::hours(6));
    }
}
