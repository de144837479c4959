//! Relation expansion and summary projection.
//!
//! For each requested relation the expander dereferences the record's
//! related-entity URL(s) through the cache-fronted client and replaces the
//! raw URLs with small projected summaries. Distinct fetches within one
//! record carry no ordering dependency, so they are issued concurrently;
//! the first failure aborts the whole request.

use futures::future::try_join_all;
use serde_json::{json, Value};
use std::collections::BTreeSet;

use holonet_core::Result;

use crate::client::CachedClient;
use crate::resource::{RelationDescriptor, RelationKind, ResourceConfig, SummaryKind};

/// Resolves and projects the relations of one record.
pub struct Expander<'a> {
    fetcher: &'a CachedClient,
}

impl<'a> Expander<'a> {
    pub fn new(fetcher: &'a CachedClient) -> Self {
        Self { fetcher }
    }

    /// Produce a copy of `record` with every recognized relation in
    /// `expand` replaced by its projected summary.
    ///
    /// The input record is never mutated. Relation names the resource does
    /// not declare are silently ignored.
    pub async fn expand_record(
        &self,
        config: &'static ResourceConfig,
        record: &Value,
        expand: &BTreeSet<String>,
    ) -> Result<Value> {
        let Some(fields) = record.as_object() else {
            return Ok(record.clone());
        };

        let relations: Vec<&RelationDescriptor> = expand
            .iter()
            .filter_map(|name| config.relation(name))
            .collect();

        let resolved = try_join_all(
            relations
                .iter()
                .map(|relation| self.resolve_relation(relation, record)),
        )
        .await?;

        let mut out = fields.clone();
        for (relation, value) in relations.iter().zip(resolved) {
            out.insert(relation.name.to_string(), value);
        }
        Ok(Value::Object(out))
    }

    async fn resolve_relation(
        &self,
        relation: &RelationDescriptor,
        record: &Value,
    ) -> Result<Value> {
        match relation.kind {
            RelationKind::Single => {
                match record
                    .get(relation.field)
                    .and_then(Value::as_str)
                    .filter(|s| is_http_url(s))
                {
                    Some(url) => {
                        let child = self.fetcher.get_json(url).await?;
                        self.project(relation.target, &child).await
                    }
                    None => Ok(Value::Null),
                }
            }
            RelationKind::Many => {
                let urls = url_list(record.get(relation.field));
                if urls.is_empty() {
                    if let Some(default) = relation.empty_default {
                        return Ok(default());
                    }
                    return Ok(json!([]));
                }

                let children =
                    try_join_all(urls.iter().map(|url| self.fetcher.get_json(url))).await?;
                let summaries = try_join_all(
                    children
                        .iter()
                        .map(|child| self.project(relation.target, child)),
                )
                .await?;
                Ok(Value::Array(summaries))
            }
        }
    }

    /// Project a resolved entity down to its summary shape.
    ///
    /// The person summary takes the one allowed transitive hop: its
    /// `homeworld` URL is resolved and collapsed to the planet's name.
    async fn project(&self, target: SummaryKind, record: &Value) -> Result<Value> {
        let summary = match target {
            SummaryKind::Person => {
                let homeworld = match record
                    .get("homeworld")
                    .and_then(Value::as_str)
                    .filter(|s| is_http_url(s))
                {
                    Some(url) => {
                        let planet = self.fetcher.get_json(url).await?;
                        planet.get("name").cloned().unwrap_or(Value::Null)
                    }
                    None => Value::Null,
                };
                json!({
                    "name": record.get("name"),
                    "gender": record.get("gender"),
                    "homeworld": homeworld,
                })
            }
            SummaryKind::Film => json!({
                "title": record.get("title"),
                "episode": record.get("episode_id"),
                "release_date": record.get("release_date"),
            }),
            SummaryKind::Planet => json!({
                "name": record.get("name"),
                "climate": record.get("climate"),
                "population": record.get("population"),
            }),
            SummaryKind::Species => json!({
                "name": record.get("name"),
                "classification": record.get("classification"),
                "language": record.get("language"),
            }),
            SummaryKind::Starship => json!({
                "name": record.get("name"),
                "model": record.get("model"),
            }),
            SummaryKind::Vehicle => json!({
                "name": record.get("name"),
                "model": record.get("model"),
            }),
        };
        Ok(summary)
    }
}

fn is_http_url(s: &str) -> bool {
    s.starts_with("http")
}

/// The http URLs of a list-valued relation field; anything else is skipped.
fn url_list(value: Option<&Value>) -> Vec<String> {
    value
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .filter(|s| is_http_url(s))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
