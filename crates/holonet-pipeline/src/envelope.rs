//! Response envelopes.
//!
//! The uniform wrappers every collection and detail request returns.
//! Constructed once per request, never mutated after return.

use serde::Serialize;
use serde_json::Value;
use std::time::Duration;

use crate::query::SortOrder;

/// Envelope for a collection query.
///
/// `count` is the size of the filtered, pre-pagination sequence, not the
/// page size. `elapsed` is wall-clock seconds rounded to 3 decimals.
#[derive(Debug, Serialize)]
pub struct ListEnvelope {
    pub resource: &'static str,
    pub count: usize,
    pub page: usize,
    pub limit: usize,
    pub q: Option<String>,
    pub sort: Option<String>,
    pub order: SortOrder,
    pub expand: Vec<String>,
    pub results: Vec<Value>,
    pub elapsed: f64,
}

/// Envelope for a single-record lookup.
#[derive(Debug, Serialize)]
pub struct DetailEnvelope {
    pub resource: &'static str,
    pub id: u64,
    pub expand: Vec<String>,
    pub result: Value,
}

/// Elapsed wall-clock time in seconds, rounded to 3 decimals.
pub(crate) fn elapsed_secs(elapsed: Duration) -> f64 {
    (elapsed.as_secs_f64() * 1000.0).round() / 1000.0
}
