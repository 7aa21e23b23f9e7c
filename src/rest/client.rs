//! Generic REST query client with response caching.
//!
//! [`RestQueryClient`] knows a base URL and a [`Transport`]; everything about
//! a particular API lives in its [`Endpoint`] types. A call goes through these
//! steps:
//!
//! ```text
//! params ──serialize──▶ Value ──▶ path (EndpointDef) + query pairs + CacheKey
//!                                   │
//!            cache enabled & fresh? ├── yes ──▶ decode cached body
//!                                   └── no  ──▶ transport GET ──▶ decode
//!                                                   └─ cache enabled? store body
//! ```
//!
//! Only bodies that decode into the endpoint's response type are stored;
//! transport failures and undecodable bodies propagate to the caller and
//! leave the cache untouched. Nothing is retried.

use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

use super::cache::{CacheKey, CacheStats, ResponseCache};
use super::endpoint::Endpoint;
use super::params::query_pairs;
use super::transport::{Transport, TransportError};

/// TTL applied when a request does not set its own.
pub const DEFAULT_TTL: Duration = Duration::from_secs(5 * 60);

const METHOD_GET: &str = "GET";

#[derive(Error, Debug)]
pub enum QueryError {
    #[error("Failed to encode request parameters: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("Failed to decode response: {0}")]
    Decode(#[source] serde_json::Error),
    #[error(transparent)]
    Transport(#[from] TransportError),
}

/// Per-request caching options.
#[derive(Debug, Clone)]
pub struct RequestConfig {
    /// Look up and store this request in the cache. Default: `true`.
    pub cache: bool,
    /// TTL for a stored response. `None` uses the client default.
    pub ttl: Option<Duration>,
    /// Cache key override; replaces the parameter-derived key.
    pub cache_key: Option<String>,
}

impl Default for RequestConfig {
    fn default() -> Self {
        Self {
            cache: true,
            ttl: None,
            cache_key: None,
        }
    }
}

impl RequestConfig {
    /// Bypass the cache for both lookup and store.
    pub fn no_cache() -> Self {
        Self {
            cache: false,
            ..Self::default()
        }
    }

    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = Some(key.into());
        self
    }
}

/// Caching GET client over a set of typed endpoints.
pub struct RestQueryClient<T> {
    base_url: String,
    transport: T,
    cache: ResponseCache,
    default_ttl: Duration,
}

impl<T: Transport> RestQueryClient<T> {
    pub fn new(base_url: impl Into<String>, transport: T) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
            cache: ResponseCache::new(),
            default_ttl: DEFAULT_TTL,
        }
    }

    pub fn with_default_ttl(mut self, ttl: Duration) -> Self {
        self.default_ttl = ttl;
        self
    }

    /// Fetch `E` with the given parameters, serving from cache when allowed.
    pub async fn get<E: Endpoint>(
        &self,
        params: &E::Params,
        config: RequestConfig,
    ) -> Result<E::Response, QueryError> {
        let params_value = serde_json::to_value(params).map_err(QueryError::Encode)?;
        let url = format!("{}{}", self.base_url, E::definition().resolve(params));

        let key = match &config.cache_key {
            Some(custom) => CacheKey::from_override(METHOD_GET, E::NAME, custom),
            None => CacheKey::from_params(METHOD_GET, E::NAME, &params_value),
        };

        if config.cache
            && let Some(body) = self.cache.get(&key)
        {
            tracing::debug!(%key, "cache hit");
            return serde_json::from_value(body).map_err(QueryError::Decode);
        }

        let query = query_pairs(&params_value);
        tracing::debug!(endpoint = E::NAME, %url, cache = config.cache, "fetching");
        let body = self.transport.get(&url, &query).await?;
        let response = E::Response::deserialize(&body).map_err(QueryError::Decode)?;

        if config.cache {
            let ttl = config.ttl.unwrap_or(self.default_ttl);
            tracing::debug!(%key, ?ttl, "cache store");
            self.cache.insert(key, body, ttl);
        }

        Ok(response)
    }

    /// Config-only form for endpoints without parameters.
    pub async fn get_static<E>(&self, config: RequestConfig) -> Result<E::Response, QueryError>
    where
        E: Endpoint<Params = ()>,
    {
        self.get::<E>(&(), config).await
    }

    /// Drop every cached response of the endpoint named `endpoint`.
    pub fn invalidate(&self, endpoint: &str) {
        let removed = self.cache.invalidate(endpoint);
        tracing::debug!(endpoint, removed, "invalidated");
    }

    /// Typed form of [`invalidate`](Self::invalidate).
    pub fn invalidate_endpoint<E: Endpoint>(&self) {
        self.invalidate(E::NAME);
    }

    /// Drop every cached response.
    pub fn invalidate_all(&self) {
        let removed = self.cache.clear();
        tracing::debug!(removed, "invalidated all");
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }
}
