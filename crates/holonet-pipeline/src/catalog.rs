//! Catalog facade over the query pipeline.
//!
//! One [`Catalog`] instance serves all six resources and owns the shared
//! cache and upstream client for the lifetime of the process. The gateway
//! maps inbound query parameters into [`QuerySpec`]s, calls [`Catalog::list`]
//! or [`Catalog::detail`], and forwards the envelope verbatim.

use futures::future::try_join_all;
use serde_json::Value;
use std::collections::BTreeSet;
use std::time::{Duration, Instant};
use tracing::info;

use holonet_core::{HolonetError, Result};

use crate::cache::{TtlCache, DEFAULT_CACHE_TTL_SECS};
use crate::client::{CachedClient, UpstreamClient, UPSTREAM_TIMEOUT_SECS};
use crate::collector;
use crate::envelope::{elapsed_secs, DetailEnvelope, ListEnvelope};
use crate::expand::Expander;
use crate::query::{self, QuerySpec};
use crate::resource::Resource;

/// Upstream connection settings for a [`Catalog`].
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Upstream API root, e.g. `https://swapi.dev/api`.
    pub base_url: String,
    /// Lifetime of cached upstream responses.
    pub cache_ttl: Duration,
    /// Per-request network timeout.
    pub request_timeout: Duration,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: "https://swapi.dev/api".to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            request_timeout: Duration::from_secs(UPSTREAM_TIMEOUT_SECS),
        }
    }
}

/// The per-resource query pipeline, shared across all six resources.
#[derive(Debug, Clone)]
pub struct Catalog {
    fetcher: CachedClient,
    base_url: String,
}

impl Catalog {
    /// Build a catalog with its own client and cache.
    pub fn new(config: CatalogConfig) -> Result<Self> {
        let client = UpstreamClient::with_timeout(config.request_timeout)?;
        let cache = TtlCache::new(config.cache_ttl);

        Ok(Self {
            fetcher: CachedClient::new(client, cache),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Run the full collection pipeline: collect, filter, sort, paginate,
    /// expand, envelope.
    pub async fn list(&self, resource: Resource, spec: &QuerySpec) -> Result<ListEnvelope> {
        let started = Instant::now();
        let config = resource.config();

        let records = collector::collect(
            &self.fetcher,
            &self.base_url,
            config,
            spec.q.as_deref(),
            spec.target_count(),
        )
        .await?;
        let collected = records.len();

        let (filtered, page) = query::apply(records, config, spec)?;
        let results = self.expand_all(resource, page, &spec.expand).await?;

        info!(
            resource = %resource,
            collected,
            count = filtered.len(),
            page = spec.page,
            limit = spec.limit,
            "Collection query served"
        );

        Ok(ListEnvelope {
            resource: config.name,
            count: filtered.len(),
            page: spec.page,
            limit: spec.limit,
            q: spec.q.clone(),
            sort: spec.sort.clone(),
            order: spec.order,
            expand: spec.expand.iter().cloned().collect(),
            results,
            elapsed: elapsed_secs(started.elapsed()),
        })
    }

    /// Fetch one record by id and apply any requested expansions.
    pub async fn detail(
        &self,
        resource: Resource,
        id: u64,
        expand: &BTreeSet<String>,
    ) -> Result<DetailEnvelope> {
        let config = resource.config();
        let url = format!("{}/{}/{}/", self.base_url, config.path, id);

        let record = self.fetcher.get_json(&url).await.map_err(|e| match e {
            // Surface the upstream 404 under the resource's own name.
            HolonetError::NotFound { .. } => HolonetError::NotFound {
                resource: config.name.to_string(),
                id: Some(id.to_string()),
            },
            other => other,
        })?;

        let result = if expand.is_empty() {
            record
        } else {
            Expander::new(&self.fetcher)
                .expand_record(config, &record, expand)
                .await?
        };

        info!(resource = %resource, id, "Detail query served");

        Ok(DetailEnvelope {
            resource: config.name,
            id,
            expand: expand.iter().cloned().collect(),
            result,
        })
    }

    async fn expand_all(
        &self,
        resource: Resource,
        page: Vec<Value>,
        expand: &BTreeSet<String>,
    ) -> Result<Vec<Value>> {
        if expand.is_empty() {
            return Ok(page);
        }

        let config = resource.config();
        let expander = Expander::new(&self.fetcher);
        try_join_all(
            page.iter()
                .map(|record| expander.expand_record(config, record, expand)),
        )
        .await
    }

    /// The shared response cache (reset hook for tests and diagnostics).
    pub fn cache(&self) -> &TtlCache {
        self.fetcher.cache()
    }
}
