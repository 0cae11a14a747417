use chrono::Duration;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::api::transport::{HttpTransport, Transport};
use crate::api::types::{present, Building, CollectionGoal, Preacher, Resource, Service};
use crate::cache::{CacheStore, FetchStatus, FetchStatusLog, MemoryCache, Payload};
use crate::clock::{Clock, SystemClock};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::types::{BuildingId, PreacherId, ServiceId};

/// Client for the KerkPoint API
///
/// Every resource goes through the cache first. Successful fetches are cached
/// for the configured TTL; failures are never cached, only recorded in the
/// fetch status log.
#[derive(Clone)]
pub struct KerkPointClient {
    api_url: String,
    api_token: String,
    cache_ttl: Duration,
    endpoints: HashMap<Resource, String>,
    transport: Arc<dyn Transport>,
    cache: Arc<dyn CacheStore>,
    status: Arc<FetchStatusLog>,
    clock: Arc<dyn Clock>,
}

impl KerkPointClient {
    /// Create a client from config with the HTTP transport and an in-memory cache
    pub fn new(config: &Config) -> Self {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        Self::with_parts(
            config,
            Arc::new(HttpTransport::new()),
            Arc::new(MemoryCache::with_clock(Arc::clone(&clock))),
            clock,
        )
    }

    /// Create a client from explicit collaborators
    pub fn with_parts(
        config: &Config,
        transport: Arc<dyn Transport>,
        cache: Arc<dyn CacheStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let endpoints = Resource::ALL.iter()
            .map(|&r| (r, config.endpoint_url(r)))
            .collect();
        Self {
            api_url: config.api_url.trim().to_string(),
            api_token: config.api_token.trim().to_string(),
            cache_ttl: config.cache_ttl,
            endpoints,
            transport,
            cache,
            status: Arc::new(FetchStatusLog::new(Arc::clone(&clock))),
            clock,
        }
    }

    /// Check if credentials are configured
    fn is_configured(&self) -> bool {
        !self.api_url.is_empty() && !self.api_token.is_empty()
    }

    /// How long successful fetches stay cached
    pub const fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    /// The clock this client stamps its cache and status with
    pub fn clock(&self) -> Arc<dyn Clock> {
        Arc::clone(&self.clock)
    }

    /// Fetch a resource's raw records, from cache when fresh
    pub async fn fetch(&self, resource: Resource) -> Result<Payload> {
        if !self.is_configured() {
            return Err(Error::config(
                "API URL or bearer token is not set",
                "Fill in the base API URL and token in the KerkPoint settings",
            ));
        }

        let key = resource.cache_key();
        if let Some(cached) = self.cache.get(&key) {
            tracing::debug!("Serving {resource} from cache ({} records)", cached.len());
            return Ok(cached);
        }

        let url = self.endpoints.get(&resource).cloned().unwrap_or_default();
        tracing::info!("Fetching {resource} from {url}");

        let response = match self.transport.get(&url, &self.api_token).await {
            Ok(response) => response,
            Err(e) => return Err(self.record_failure(resource, e)),
        };

        if response.status != 200 {
            return Err(self.record_failure(resource, Error::upstream(response.status, &response.reason)));
        }

        let records = match decode_payload(&response.body) {
            Ok(records) => records,
            Err(e) => return Err(self.record_failure(resource, e)),
        };

        self.cache.set(&key, records.clone(), self.cache_ttl);
        self.status.record_success();
        tracing::info!("Cached {} {resource} records for {}s", records.len(), self.cache_ttl.num_seconds());

        Ok(records)
    }

    fn record_failure(&self, resource: Resource, error: Error) -> Error {
        tracing::warn!("Fetching {resource} failed: {error}");
        self.status.record_failure(error.recorded_message());
        error
    }

    /// Fetch a resource and decode each record, skipping malformed entries
    async fn fetch_records<T: DeserializeOwned>(&self, resource: Resource) -> Result<Vec<T>> {
        let raw = self.fetch(resource).await?;
        Ok(raw.into_iter().enumerate().filter_map(|(idx, value)| {
            serde_json::from_value(value)
                .map_err(|e| tracing::warn!("Skipping malformed {resource} record #{idx}: {e}"))
                .ok()
        }).collect())
    }

    /// `GET /api/services`
    pub async fn services(&self) -> Result<Vec<Service>> {
        self.fetch_records(Resource::Services).await
    }

    /// `GET /api/collectiongoals`
    pub async fn collection_goals(&self) -> Result<Vec<CollectionGoal>> {
        self.fetch_records(Resource::CollectionGoals).await
    }

    /// `GET /api/preachers`
    pub async fn preachers(&self) -> Result<Vec<Preacher>> {
        self.fetch_records(Resource::Preachers).await
    }

    /// `GET /api/buildings`
    pub async fn buildings(&self) -> Result<Vec<Building>> {
        self.fetch_records(Resource::Buildings).await
    }

    /// Map preacher id to name.
    ///
    /// Any fetch failure yields an empty map so one broken resource never
    /// blocks rendering of another. Records without id or name are skipped.
    pub async fn preacher_lookup_by_id(&self) -> HashMap<PreacherId, String> {
        self.preachers_or_empty().await
            .iter()
            .filter_map(|p| Some((p.id?, present(p.name.as_ref())?.to_string())))
            .collect()
    }

    /// Map service id to the name of its preacher.
    ///
    /// Same failure policy as [`Self::preacher_lookup_by_id`]. When several
    /// preachers claim one service, the last one wins.
    pub async fn preacher_lookup_by_service_id(&self) -> HashMap<ServiceId, String> {
        self.preachers_or_empty().await
            .iter()
            .filter_map(|p| Some((p.service_id?, present(p.name.as_ref())?.to_string())))
            .collect()
    }

    async fn preachers_or_empty(&self) -> Vec<Preacher> {
        self.preachers().await.unwrap_or_else(|e| {
            tracing::debug!("Preacher lookup degraded to empty: {e}");
            Vec::new()
        })
    }

    /// Find a building by id; `None` on fetch failure or no match
    pub async fn building_by_id(&self, id: BuildingId) -> Option<Building> {
        self.buildings().await.ok()?
            .into_iter()
            .find(|b| b.id == Some(id))
    }

    /// The retained outcome of the last upstream attempt
    pub fn fetch_status(&self) -> FetchStatus {
        self.status.current()
    }

    /// [`Self::fetch_status`] as a message for administrators
    pub fn fetch_status_summary(&self, locale: Locale) -> String {
        self.fetch_status().summary(locale)
    }

    /// Drop every cached resource and the fetch status.
    ///
    /// The "last cleared" audit timestamp is the caller's to record.
    pub fn clear_cache(&self) -> bool {
        for resource in Resource::ALL {
            self.cache.delete(&resource.cache_key());
        }
        self.status.clear();
        tracing::info!("Cleared cached KerkPoint resources");
        true
    }
}

/// Decode a 200 body; it must be a non-empty JSON array
fn decode_payload(body: &str) -> Result<Payload> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Array(records)) if !records.is_empty() => Ok(records),
        Ok(_) => Err(Error::parse("Failed to parse API data or empty response", None)),
        Err(e) => Err(Error::parse(format!("Failed to parse API data: {e}"), None)),
    }
}
