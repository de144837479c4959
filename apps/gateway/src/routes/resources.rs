//! Resource collection, detail, and unified search endpoints.
//!
//! All six resources share the same pair of dynamic routes; the path
//! segment selects the per-resource configuration and everything else is
//! handled by the pipeline.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use holonet_core::HolonetError;
use holonet_pipeline::{
    query::split_csv, DetailEnvelope, ListEnvelope, QuerySpec, Resource, SortOrder, DEFAULT_LIMIT,
};

use crate::error::GatewayError;
use crate::state::AppState;

/// Query parameters of a collection request.
#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub expand: Option<String>,
}

fn default_page() -> usize {
    1
}

fn default_limit() -> usize {
    DEFAULT_LIMIT
}

impl ListParams {
    fn into_spec(self) -> Result<QuerySpec, HolonetError> {
        QuerySpec::new(
            self.q,
            self.sort,
            self.order,
            self.page,
            self.limit,
            self.expand.as_deref(),
        )
    }
}

/// Query parameters of a detail request.
#[derive(Debug, Deserialize)]
pub struct DetailParams {
    pub expand: Option<String>,
}

/// Query parameters of the unified search endpoint: a collection request
/// with the resource chosen by parameter instead of path.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub resource: Option<String>,
    pub q: Option<String>,
    #[serde(default = "default_page")]
    pub page: usize,
    #[serde(default = "default_limit")]
    pub limit: usize,
    pub sort: Option<String>,
    #[serde(default)]
    pub order: SortOrder,
    pub expand: Option<String>,
}

/// `GET /{resource}` - list a resource collection.
pub async fn list_handler(
    State(state): State<AppState>,
    Path(resource): Path<String>,
    Query(params): Query<ListParams>,
) -> Result<Json<ListEnvelope>, GatewayError> {
    let resource = parse_resource(&resource)?;
    let spec = params.into_spec()?;

    tracing::info!(
        resource = %resource,
        page = spec.page,
        limit = spec.limit,
        q = ?spec.q,
        sort = ?spec.sort,
        "Listing resource"
    );

    let envelope = state.catalog.list(resource, &spec).await?;
    Ok(Json(envelope))
}

/// `GET /{resource}/{id}` - fetch one record by id.
pub async fn detail_handler(
    State(state): State<AppState>,
    Path((resource, id)): Path<(String, u64)>,
    Query(params): Query<DetailParams>,
) -> Result<Json<DetailEnvelope>, GatewayError> {
    let resource = parse_resource(&resource)?;
    let expand = split_csv(params.expand.as_deref());

    tracing::info!(resource = %resource, id, expand = expand.len(), "Fetching resource detail");

    let envelope = state.catalog.detail(resource, id, &expand).await?;
    Ok(Json(envelope))
}

/// `GET /search?resource=...` - the unified query endpoint.
///
/// Same semantics as the per-resource collection route; a missing or
/// unknown `resource` parameter is a client error here, not a 404.
pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<ListEnvelope>, GatewayError> {
    let name = params.resource.as_deref().unwrap_or_default();
    let resource = Resource::parse(name).ok_or_else(|| {
        GatewayError::Pipeline(HolonetError::InvalidParameter {
            name: "resource".to_string(),
            message: format!(
                "must be one of {}",
                Resource::ALL.map(|r| r.name()).join(", ")
            ),
        })
    })?;

    let spec = QuerySpec::new(
        params.q,
        params.sort,
        params.order,
        params.page,
        params.limit,
        params.expand.as_deref(),
    )?;

    tracing::info!(resource = %resource, page = spec.page, q = ?spec.q, "Unified search");

    let envelope = state.catalog.list(resource, &spec).await?;
    Ok(Json(envelope))
}

/// Resolve a path segment to a resource; unknown segments are 404s.
fn parse_resource(name: &str) -> Result<Resource, GatewayError> {
    Resource::parse(name).ok_or_else(|| GatewayError::UnknownResource {
        name: name.to_string(),
    })
}
