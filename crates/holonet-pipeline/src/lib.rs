//! # Holonet Query Pipeline
//!
//! The per-resource query pipeline behind the Holonet aggregation gateway.
//!
//! All six catalog resources (people, films, planets, species, starships,
//! vehicles) share one generic pipeline, parameterized by static
//! per-resource configuration tables:
//!
//! - [`cache`] - TTL cache for upstream JSON responses
//! - [`client`] - the only component performing network I/O
//! - [`collector`] - bounded upstream-pagination collector
//! - [`query`] - local filter/sort/paginate engine
//! - [`expand`] - relation expansion and summary projection
//! - [`resource`] - per-resource configuration tables
//! - [`catalog`] - the facade tying the stages together
//!
//! ## Example
//!
//! ```ignore
//! use holonet_pipeline::{Catalog, CatalogConfig, QuerySpec, Resource, SortOrder};
//!
//! let catalog = Catalog::new(CatalogConfig::default())?;
//! let spec = QuerySpec::new(
//!     Some("luke".to_string()),
//!     Some("name".to_string()),
//!     SortOrder::Asc,
//!     1,
//!     10,
//!     Some("homeworld,films"),
//! )?;
//! let envelope = catalog.list(Resource::People, &spec).await?;
//! ```

pub mod cache;
pub mod catalog;
pub mod client;
pub mod collector;
pub mod envelope;
pub mod expand;
pub mod query;
pub mod resource;

// Re-exports
pub use cache::{TtlCache, DEFAULT_CACHE_TTL_SECS};
pub use catalog::{Catalog, CatalogConfig};
pub use client::{CachedClient, UpstreamClient, UPSTREAM_TIMEOUT_SECS};
pub use collector::MAX_UPSTREAM_PAGES;
pub use envelope::{DetailEnvelope, ListEnvelope};
pub use query::{QuerySpec, SortOrder, DEFAULT_LIMIT, MAX_LIMIT};
pub use resource::Resource;
