//! # Holonet Gateway
//!
//! HTTP facade in front of the Holonet query pipeline. The facade maps
//! inbound query parameters into pipeline calls and forwards envelopes
//! verbatim; everything with actual design decisions lives in
//! `holonet-pipeline`.

use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::GatewayConfig;
pub use error::{ErrorResponse, GatewayError, GatewayResult};
pub use state::AppState;

/// Build the complete application: routes, state, and middleware stack.
pub fn build_app(config: &GatewayConfig) -> GatewayResult<axum::Router> {
    let state = AppState::new(config)?;

    Ok(routes::router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(middleware::RequestIdLayer::new())
            .layer(middleware::ApiKeyLayer::new(config.auth.api_key.clone()))
            .layer(CorsLayer::permissive()),
    ))
}
