//! Holonet Core Library
//!
//! Shared error taxonomy for the Holonet gateway.
//!
//! # Modules
//!
//! - [`error`] - Standardized error types (`HolonetError`)
//!
//! # Example
//!
//! ```
//! use holonet_core::{HolonetError, Result};
//!
//! fn example() -> Result<()> {
//!     Err(HolonetError::UpstreamStatus { status: 502 })
//! }
//! ```

pub mod error;

// Re-export main types for convenient access
pub use error::{HolonetError, Result};
