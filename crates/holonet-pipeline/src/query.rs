//! Local query engine: filter, sort, paginate.
//!
//! Operates entirely in memory on the records the collector gathered.
//! Filtering matches a single resource-specific string field, sorting is
//! numeric-aware with a stable order, and pagination is a plain slice.

use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use holonet_core::{HolonetError, Result};

use crate::resource::ResourceConfig;

/// Upper bound on the `limit` parameter.
pub const MAX_LIMIT: usize = 50;

/// Default page size when the client does not pass `limit`.
pub const DEFAULT_LIMIT: usize = 10;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Immutable description of one query, validated at construction.
#[derive(Debug, Clone)]
pub struct QuerySpec {
    /// Free-text filter, matched against the resource's filter field.
    pub q: Option<String>,
    /// Requested sort field; validated against the resource allow-list
    /// when the sort is applied.
    pub sort: Option<String>,
    /// Sort direction.
    pub order: SortOrder,
    /// 1-based page number.
    pub page: usize,
    /// Page size, `1..=MAX_LIMIT`.
    pub limit: usize,
    /// Requested relation expansions; unknown names are ignored later.
    pub expand: BTreeSet<String>,
}

impl QuerySpec {
    /// Build a spec from raw request parameters, validating bounds.
    pub fn new(
        q: Option<String>,
        sort: Option<String>,
        order: SortOrder,
        page: usize,
        limit: usize,
        expand: Option<&str>,
    ) -> Result<Self> {
        if page < 1 {
            return Err(HolonetError::InvalidParameter {
                name: "page".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(HolonetError::InvalidParameter {
                name: "limit".to_string(),
                message: format!("must be between 1 and {MAX_LIMIT}"),
            });
        }

        Ok(Self {
            q: q.filter(|s| !s.is_empty()),
            sort: sort.filter(|s| !s.is_empty()),
            order,
            page,
            limit,
            expand: split_csv(expand),
        })
    }

    /// A spec with default pagination and nothing else set.
    pub fn default_page() -> Self {
        Self {
            q: None,
            sort: None,
            order: SortOrder::Asc,
            page: 1,
            limit: DEFAULT_LIMIT,
            expand: BTreeSet::new(),
        }
    }

    /// How many raw records the collector must gather to cover this page.
    pub fn target_count(&self) -> usize {
        self.page * self.limit
    }
}

/// Split a comma-separated parameter into trimmed, non-empty names.
pub fn split_csv(value: Option<&str>) -> BTreeSet<String> {
    value
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Apply filter, sort, and pagination.
///
/// Returns the full filtered+sorted sequence (its length is the envelope
/// `count`) and the requested page slice.
pub fn apply(
    records: Vec<Value>,
    config: &'static ResourceConfig,
    spec: &QuerySpec,
) -> Result<(Vec<Value>, Vec<Value>)> {
    let filtered = filter_records(records, config.filter_field, spec.q.as_deref());
    let sorted = sort_records(filtered, config, spec)?;
    let page = paginate(&sorted, spec.page, spec.limit);
    Ok((sorted, page))
}

/// Case-insensitive substring filter on one string field.
///
/// When a filter is active, records whose field is missing or non-string
/// are excluded. No filter is the identity.
fn filter_records(records: Vec<Value>, field: &str, q: Option<&str>) -> Vec<Value> {
    let Some(q) = q.filter(|s| !s.is_empty()) else {
        return records;
    };
    let needle = q.to_lowercase();

    records
        .into_iter()
        .filter(|record| {
            record
                .get(field)
                .and_then(Value::as_str)
                .is_some_and(|s| s.to_lowercase().contains(&needle))
        })
        .collect()
}

/// Sort key partitions: all numeric values precede all text values,
/// missing values come last.
#[derive(Debug, Clone, PartialEq)]
enum SortKey {
    Number(f64),
    Text(String),
    Missing,
}

fn sort_key(record: &Value, field: &str) -> SortKey {
    match record.get(field) {
        None | Some(Value::Null) => SortKey::Missing,
        Some(value) => {
            if let Some(n) = value.as_f64() {
                return SortKey::Number(n);
            }
            let text = match value.as_str() {
                Some(s) => s.to_string(),
                None => value.to_string(),
            };
            // Numeric strings ("200000") sort with the numeric partition.
            match text.trim().parse::<f64>() {
                Ok(n) if n.is_finite() => SortKey::Number(n),
                _ => SortKey::Text(text.to_lowercase()),
            }
        }
    }
}

fn compare_keys(a: &SortKey, b: &SortKey) -> Ordering {
    match (a, b) {
        (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
        (SortKey::Number(_), _) => Ordering::Less,
        (_, SortKey::Number(_)) => Ordering::Greater,
        (SortKey::Text(x), SortKey::Text(y)) => x.cmp(y),
        (SortKey::Text(_), SortKey::Missing) => Ordering::Less,
        (SortKey::Missing, SortKey::Text(_)) => Ordering::Greater,
        (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
    }
}

/// Stable sort by the requested field; `desc` reverses the fully sorted
/// sequence rather than each partition.
fn sort_records(
    records: Vec<Value>,
    config: &'static ResourceConfig,
    spec: &QuerySpec,
) -> Result<Vec<Value>> {
    let Some(field) = spec.sort.as_deref() else {
        return Ok(records);
    };
    if !config.sort_fields.contains(&field) {
        return Err(HolonetError::InvalidSortField {
            field: field.to_string(),
            allowed: config.sort_fields.to_vec(),
        });
    }

    let mut keyed: Vec<(SortKey, Value)> = records
        .into_iter()
        .map(|record| (sort_key(&record, field), record))
        .collect();
    keyed.sort_by(|a, b| compare_keys(&a.0, &b.0));
    if spec.order == SortOrder::Desc {
        keyed.reverse();
    }

    Ok(keyed.into_iter().map(|(_, record)| record).collect())
}

/// Zero-based slice `[(page-1)*limit, +limit)`; out of range yields empty.
fn paginate(records: &[Value], page: usize, limit: usize) -> Vec<Value> {
    let start = (page - 1) * limit;
    records.iter().skip(start).take(limit).cloned().collect()
}
