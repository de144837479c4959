//! Shared application state.

use std::sync::Arc;
use std::time::Instant;

use holonet_pipeline::Catalog;

use crate::config::GatewayConfig;
use crate::error::GatewayResult;

/// State shared by every route handler.
///
/// The catalog (and with it the response cache and upstream connection
/// pool) lives for the lifetime of the process.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub start_time: Instant,
    pub version: String,
}

impl AppState {
    /// Build the state, constructing the catalog from configuration.
    pub fn new(config: &GatewayConfig) -> GatewayResult<Self> {
        let catalog = Catalog::new(config.catalog_config())?;

        Ok(Self {
            catalog: Arc::new(catalog),
            start_time: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }
}
