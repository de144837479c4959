//! Gateway route definitions.

use axum::{routing::get, Router};

use crate::state::AppState;

pub mod health;
pub mod resources;

/// Build the full route table.
///
/// Static routes take priority over the dynamic resource captures, so
/// `/health` and `/search` are never shadowed.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route("/search", get(resources::search_handler))
        .route("/:resource", get(resources::list_handler))
        .route("/:resource/:id", get(resources::detail_handler))
        .with_state(state)
}
