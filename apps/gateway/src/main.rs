//! Gateway process bootstrap.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use holonet_gateway::{build_app, GatewayConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = GatewayConfig::load().context("failed to load configuration")?;
    config.apply_env_overrides();

    init_tracing(&config.logging.level);

    let app = build_app(&config).context("failed to build application")?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    tracing::info!(
        addr = %addr,
        upstream = %config.upstream.base_url,
        gated = config.auth.api_key.is_some(),
        "Holonet gateway listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
