//! Gateway configuration loading and types.

use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use holonet_pipeline::{CatalogConfig, DEFAULT_CACHE_TTL_SECS, UPSTREAM_TIMEOUT_SECS};

use crate::error::{GatewayError, GatewayResult};

/// Root gateway configuration.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct GatewayConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub upstream: UpstreamConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

/// Upstream catalog configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UpstreamConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_cache_ttl")]
    pub cache_ttl_secs: u64,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
            cache_ttl_secs: default_cache_ttl(),
        }
    }
}

fn default_base_url() -> String {
    "https://swapi.dev/api".to_string()
}

fn default_timeout() -> u64 {
    UPSTREAM_TIMEOUT_SECS
}

fn default_cache_ttl() -> u64 {
    DEFAULT_CACHE_TTL_SECS
}

/// Shared-secret gate configuration.
///
/// No configured key means every endpoint is open (local-dev mode).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_key: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl GatewayConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> GatewayResult<Self> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            GatewayError::Config(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        Self::from_yaml(&content)
    }

    /// Parse configuration from a YAML string.
    pub fn from_yaml(content: &str) -> GatewayResult<Self> {
        serde_yaml::from_str(content)
            .map_err(|e| GatewayError::Config(format!("Failed to parse config: {e}")))
    }

    /// Load from the configured path, falling back to defaults when the
    /// file does not exist.
    pub fn load() -> GatewayResult<Self> {
        let path = Self::config_path();
        if Path::new(&path).exists() {
            Self::from_file(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Get the configuration file path from environment or default.
    pub fn config_path() -> String {
        std::env::var("HOLONET_CONFIG").unwrap_or_else(|_| "./config/gateway.yaml".to_string())
    }

    /// Apply environment variable overrides.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(host) = std::env::var("HOLONET_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("HOLONET_PORT") {
            if let Ok(port) = port.parse() {
                self.server.port = port;
            }
        }
        if let Ok(base_url) = std::env::var("HOLONET_UPSTREAM_URL") {
            self.upstream.base_url = base_url;
        }
        if let Ok(api_key) = std::env::var("API_KEY") {
            if !api_key.is_empty() {
                self.auth.api_key = Some(api_key);
            }
        }
    }

    /// The pipeline settings derived from this configuration.
    pub fn catalog_config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.upstream.base_url.clone(),
            cache_ttl: Duration::from_secs(self.upstream.cache_ttl_secs),
            request_timeout: Duration::from_secs(self.upstream.timeout_secs),
        }
    }
}
