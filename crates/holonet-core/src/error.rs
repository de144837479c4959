//! Error Types
//!
//! This module provides the standardized error taxonomy shared by the
//! pipeline and the gateway facade.
//!
//! # Example
//!
//! ```
//! use holonet_core::{HolonetError, Result};
//!
//! fn lookup(id: &str) -> Result<String> {
//!     if id.is_empty() {
//!         return Err(HolonetError::NotFound {
//!             resource: "people".to_string(),
//!             id: None,
//!         });
//!     }
//!     Ok(format!("person {}", id))
//! }
//! ```

use serde::Serialize;
use thiserror::Error;

/// Standardized error type for Holonet.
///
/// Every failure the pipeline can produce maps to one of these variants.
/// The gateway converts them to HTTP responses:
///
/// - `Unreachable` / `UpstreamStatus` - generic upstream failure (HTTP 502)
/// - `NotFound` - upstream 404 surfaced to the client (HTTP 404)
/// - `InvalidSortField` / `InvalidParameter` - client error (HTTP 400)
#[derive(Debug, Clone, Error, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum HolonetError {
    /// The upstream could not be reached (transport error or timeout).
    #[error("Upstream request failed: {message}")]
    Unreachable {
        /// Underlying transport error description
        message: String,
    },

    /// The upstream answered with a non-404 error status.
    #[error("Upstream returned status {status}")]
    UpstreamStatus {
        /// HTTP status code reported by the upstream
        status: u16,
    },

    /// The upstream has no record for the requested resource.
    ///
    /// Maps the upstream's 404 through to the client unchanged.
    #[error("{resource} not found{}", id.as_ref().map(|i| format!(": {i}")).unwrap_or_default())]
    NotFound {
        /// The resource collection that was queried (e.g. "people")
        resource: String,
        /// Optional identifier of the missing record
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
    },

    /// A sort field outside the resource's allow-list was requested.
    #[error("Invalid sort field '{field}': allowed fields are {}", allowed.join(", "))]
    InvalidSortField {
        /// The rejected field name
        field: String,
        /// The fields the resource accepts
        allowed: Vec<&'static str>,
    },

    /// A query parameter failed validation.
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// The parameter that failed validation
        name: String,
        /// Description of the validation failure
        message: String,
    },
}

impl HolonetError {
    /// Whether this error is one of the upstream-failure kinds that the
    /// gateway collapses into a single generic response.
    pub fn is_upstream_failure(&self) -> bool {
        matches!(
            self,
            HolonetError::Unreachable { .. } | HolonetError::UpstreamStatus { .. }
        )
    }
}

/// Type alias for Results using `HolonetError`.
///
/// ```
/// use holonet_core::Result;
///
/// fn example() -> Result<String> {
///     Ok("success".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, HolonetError>;
