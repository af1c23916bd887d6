//! HTTP client for a REST view of the forecast document store
//!
//! Layout under the base URL:
//!
//! - `GET /beaches[?region=R]` lists the beach directory
//! - `GET /regions/{region}/beaches/{id}/metadata` returns the metadata document
//! - `GET /regions/{region}/beaches/{id}/records?since=..&limit=..` returns raw records
//!
//! A 404 means "no data", not failure. The beach directory is cached on
//! disk and served stale when the API cannot be reached.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::{ForecastSource, SourceError};
use crate::cache::CacheManager;
use crate::data::{BeachDescriptor, Metadata, RawRecord};

/// Default request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default time-to-live for cached beach directories in hours
pub const DEFAULT_BEACH_CACHE_TTL_HOURS: u64 = 24;

/// Forecast source speaking JSON over HTTP
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: Client,
    base_url: Url,
    cache_manager: Option<CacheManager>,
    beach_cache_ttl_hours: u64,
}

impl HttpSource {
    /// Creates a client for `base_url` with the default timeout and no cache
    pub fn new(base_url: &str) -> Result<Self, SourceError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Creates a client for `base_url` with a request timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let base_url =
            Url::parse(base_url).map_err(|e| SourceError::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(SourceError::InvalidUrl(base_url.to_string()));
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url,
            cache_manager: None,
            beach_cache_ttl_hours: DEFAULT_BEACH_CACHE_TTL_HOURS,
        })
    }

    /// Caches the beach directory through `cache_manager` for `ttl_hours`
    pub fn with_cache(mut self, cache_manager: CacheManager, ttl_hours: u64) -> Self {
        self.cache_manager = Some(cache_manager);
        self.beach_cache_ttl_hours = ttl_hours;
        self
    }

    /// Appends path segments to the base URL
    fn endpoint(&self, segments: &[&str]) -> Result<Url, SourceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| SourceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn metadata_url(&self, beach_id: i64, region: &str) -> Result<Url, SourceError> {
        let id = beach_id.to_string();
        self.endpoint(&["regions", region, "beaches", &id, "metadata"])
    }

    fn records_url(
        &self,
        beach_id: i64,
        region: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Url, SourceError> {
        let id = beach_id.to_string();
        let mut url = self.endpoint(&["regions", region, "beaches", &id, "records"])?;
        url.query_pairs_mut()
            .append_pair("since", &since.to_rfc3339_opts(SecondsFormat::Secs, true))
            .append_pair("limit", &limit.to_string());
        Ok(url)
    }

    fn beaches_url(&self, region: Option<&str>) -> Result<Url, SourceError> {
        let mut url = self.endpoint(&["beaches"])?;
        if let Some(region) = region {
            url.query_pairs_mut().append_pair("region", region);
        }
        Ok(url)
    }

    fn beach_cache_key(region: Option<&str>) -> String {
        format!("beaches_{}", region.unwrap_or("all"))
    }

    /// Performs a GET and decodes the JSON body
    ///
    /// Returns `Ok(None)` for 404.
    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, SourceError> {
        debug!(%url, "requesting");
        let response = self.client.get(url).send().await?;

        match response.status() {
            StatusCode::NOT_FOUND => return Ok(None),
            status @ (StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN) => {
                return Err(SourceError::Unauthorized {
                    status: status.as_u16(),
                })
            }
            _ => {}
        }

        let text = response.error_for_status()?.text().await?;
        decode(&text).map(Some)
    }

    async fn fetch_beaches_from_api(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<BeachDescriptor>, SourceError> {
        let url = self.beaches_url(region)?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }
}

#[async_trait]
impl ForecastSource for HttpSource {
    async fn fetch_metadata(
        &self,
        beach_id: i64,
        region: &str,
    ) -> Result<Option<Metadata>, SourceError> {
        let url = self.metadata_url(beach_id, region)?;
        self.get_json(url).await
    }

    async fn fetch_records(
        &self,
        beach_id: i64,
        region: &str,
        since: DateTime<Utc>,
        limit: usize,
    ) -> Result<Vec<RawRecord>, SourceError> {
        let url = self.records_url(beach_id, region, since, limit)?;
        Ok(self.get_json(url).await?.unwrap_or_default())
    }

    async fn list_beaches(
        &self,
        region: Option<&str>,
    ) -> Result<Vec<BeachDescriptor>, SourceError> {
        let cache_key = Self::beach_cache_key(region);

        if let Some(ref cache_manager) = self.cache_manager {
            if let Some(cached) = cache_manager.read::<Vec<BeachDescriptor>>(&cache_key) {
                if !cached.is_expired {
                    return Ok(cached.data);
                }
            }
        }

        match self.fetch_beaches_from_api(region).await {
            Ok(beaches) => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Err(e) =
                        cache_manager.write(&cache_key, &beaches, self.beach_cache_ttl_hours)
                    {
                        warn!(error = %e, "failed to cache beach directory");
                    }
                }
                Ok(beaches)
            }
            Err(api_error) => {
                if let Some(ref cache_manager) = self.cache_manager {
                    if let Some(cached) = cache_manager.read::<Vec<BeachDescriptor>>(&cache_key) {
                        warn!(
                            error = %api_error,
                            cached_at = %cached.cached_at,
                            "serving stale beach directory"
                        );
                        return Ok(cached.data);
                    }
                }
                Err(api_error)
            }
        }
    }
}

fn decode<T: DeserializeOwned>(body: &str) -> Result<T, SourceError> {
    serde_json::from_str(body).map_err(|e| SourceError::InvalidResponse(e.to_string()))
}
