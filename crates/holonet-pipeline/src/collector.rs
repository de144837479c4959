//! Bounded upstream-pagination collector.
//!
//! Walks the upstream's server-driven pagination (`next` links) until it
//! has gathered enough raw records to cover the requested page, the page
//! cap is reached, or the pagination ends. Pages are fetched sequentially;
//! each `next` link depends on the previous response.

use serde_json::Value;
use tracing::debug;
use url::Url;

use holonet_core::{HolonetError, Result};

use crate::client::CachedClient;
use crate::resource::ResourceConfig;

/// Safety cap on upstream pages fetched per collection pass. Upstream
/// pagination is unbounded; the cap keeps large `page` values from turning
/// into unbounded fan-out.
pub const MAX_UPSTREAM_PAGES: usize = 10;

/// Gather raw records for one query.
///
/// When `q` is non-empty the first pass hits the upstream search endpoint.
/// Upstream search semantics do not always cover the field the local
/// filter matches on, so a search pass that accumulates nothing falls back
/// to one unfiltered pass over the plain collection endpoint.
pub async fn collect(
    fetcher: &CachedClient,
    base_url: &str,
    config: &'static ResourceConfig,
    q: Option<&str>,
    target_count: usize,
) -> Result<Vec<Value>> {
    let q = q.filter(|s| !s.is_empty());
    let first_url = collection_url(base_url, config.path, q)?;
    let mut collected = gather(fetcher, first_url, target_count).await?;

    if collected.is_empty() && q.is_some() {
        debug!(resource = config.name, "Search pass empty, re-collecting unfiltered");
        let fallback_url = collection_url(base_url, config.path, None)?;
        collected = gather(fetcher, fallback_url, target_count).await?;
    }

    Ok(collected)
}

/// Follow `next` links from `start_url`, accumulating `results` arrays.
async fn gather(fetcher: &CachedClient, start_url: String, target_count: usize) -> Result<Vec<Value>> {
    let mut collected: Vec<Value> = Vec::new();
    let mut next_url = Some(start_url);
    let mut pages = 0;

    while let Some(url) = next_url {
        if collected.len() >= target_count || pages >= MAX_UPSTREAM_PAGES {
            break;
        }

        let data = fetcher.get_json(&url).await?;
        match data.get("results").and_then(Value::as_array) {
            Some(results) => collected.extend(results.iter().cloned()),
            None => break,
        }

        next_url = data
            .get("next")
            .and_then(Value::as_str)
            .map(str::to_string);
        pages += 1;
    }

    Ok(collected)
}

/// Build the initial collection URL, appending the upstream search
/// parameter when a query is present.
fn collection_url(base_url: &str, path: &str, q: Option<&str>) -> Result<String> {
    let mut url = Url::parse(&format!("{}/{}/", base_url.trim_end_matches('/'), path)).map_err(
        |e| HolonetError::InvalidParameter {
            name: "base_url".to_string(),
            message: e.to_string(),
        },
    )?;

    if let Some(q) = q {
        url.query_pairs_mut().append_pair("search", q);
    }

    Ok(url.to_string())
}
