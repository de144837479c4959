//! HTTP client for the upstream catalog.
//!
//! [`UpstreamClient`] is the only component that performs network I/O.
//! [`CachedClient`] composes it with the [`TtlCache`] and is the single
//! fetch-JSON-by-URL operation every other pipeline stage goes through.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, trace};

use holonet_core::{HolonetError, Result};

use crate::cache::TtlCache;

/// Fixed per-request timeout for upstream calls.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 10;

/// HTTP client for upstream requests with connection pooling.
///
/// No retries: a single failed call fails the whole pipeline invocation.
#[derive(Debug, Clone)]
pub struct UpstreamClient {
    client: Client,
}

impl UpstreamClient {
    /// Create a client with the default upstream timeout.
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(UPSTREAM_TIMEOUT_SECS))
    }

    /// Create a client with a custom request timeout.
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(10)
            .pool_idle_timeout(Duration::from_secs(90))
            .build()
            .map_err(|e| HolonetError::Unreachable {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client })
    }

    /// Fetch `url` and decode the body as JSON.
    ///
    /// Transport failures map to [`HolonetError::Unreachable`], an upstream
    /// 404 to [`HolonetError::NotFound`], and any other status >= 400 to
    /// [`HolonetError::UpstreamStatus`].
    pub async fn fetch(&self, url: &str) -> Result<Value> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| map_transport_error(&e))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(HolonetError::NotFound {
                resource: url.to_string(),
                id: None,
            });
        }
        if status.is_client_error() || status.is_server_error() {
            debug!(url = %url, status = status.as_u16(), "Upstream returned error status");
            return Err(HolonetError::UpstreamStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| HolonetError::Unreachable {
                message: format!("invalid JSON body: {e}"),
            })
    }
}

/// Map reqwest transport errors to the pipeline taxonomy.
fn map_transport_error(error: &reqwest::Error) -> HolonetError {
    let message = if error.is_timeout() {
        "request timed out".to_string()
    } else if error.is_connect() {
        "connection failed".to_string()
    } else {
        error.to_string()
    };
    HolonetError::Unreachable { message }
}

/// Cache-fronted upstream fetcher.
///
/// Cheap to clone; clones share the cache and the connection pool.
#[derive(Debug, Clone)]
pub struct CachedClient {
    client: UpstreamClient,
    cache: Arc<TtlCache>,
}

impl CachedClient {
    /// Compose a client and a cache into one fetch operation.
    pub fn new(client: UpstreamClient, cache: TtlCache) -> Self {
        Self {
            client,
            cache: Arc::new(cache),
        }
    }

    /// Fetch `url`, consulting the cache first.
    ///
    /// On a miss the live response is stored before it is returned. Failed
    /// fetches are never cached, so a transient upstream failure self-heals
    /// on the next request.
    pub async fn get_json(&self, url: &str) -> Result<Value> {
        if let Some(value) = self.cache.get(url).await {
            trace!(url = %url, "Cache hit");
            return Ok(value);
        }

        let value = self.client.fetch(url).await?;
        self.cache.insert(url, value.clone()).await;
        Ok(value)
    }

    /// The shared cache instance (reset hook for tests and diagnostics).
    pub fn cache(&self) -> &TtlCache {
        &self.cache
    }
}
