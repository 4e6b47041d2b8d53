// Cache-aside port for aggregate query results.
//
// Purpose
// - Memoize expensive read queries under a key derived from the full query filter.
//
// Responsibilities
// - `cache_key` builds a key that does not depend on field or map ordering.
// - Implementations expire entries after the TTL given at `set` time.
//
// Boundaries
// - No write-path invalidation. Staleness is bounded only by the TTL.

pub mod in_memory;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};
use std::time::Duration;

#[async_trait]
pub trait AggregateCache: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>>;
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> anyhow::Result<()>;
}

/// `namespace:{canonical json}` with object keys sorted at every depth.
pub fn cache_key<T: Serialize>(namespace: &str, filter: &T) -> anyhow::Result<String> {
    let value = canonicalize(serde_json::to_value(filter)?);
    Ok(format!("{namespace}:{}", serde_json::to_string(&value)?))
}

fn canonicalize(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            let mut sorted = Map::new();
            for (key, value) in entries {
                sorted.insert(key, canonicalize(value));
            }
            Value::Object(sorted)
        }
        Value::Array(items) => Value::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// TTLs applied by the reporting service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    /// `None` disables caching of global stats (non-production environments).
    pub global_stats_ttl: Option<Duration>,
    pub entity_stats_ttl: Duration,
}

impl CachePolicy {
    pub const DEFAULT_GLOBAL_STATS_TTL: Duration = Duration::from_secs(60 * 60);
    pub const DEFAULT_ENTITY_STATS_TTL: Duration = Duration::from_secs(15 * 60);

    pub fn production() -> Self {
        Self {
            global_stats_ttl: Some(Self::DEFAULT_GLOBAL_STATS_TTL),
            entity_stats_ttl: Self::DEFAULT_ENTITY_STATS_TTL,
        }
    }

    pub fn development() -> Self {
        Self {
            global_stats_ttl: None,
            entity_stats_ttl: Self::DEFAULT_ENTITY_STATS_TTL,
        }
    }
}

#[cfg(test)]
mod aggregate_cache_key_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    fn it_should_produce_the_same_key_regardless_of_insertion_order() {
        let mut forward = Map::new();
        forward.insert("userId".into(), json!("u-1"));
        forward.insert("from".into(), json!("2024-01-01"));
        let mut backward = Map::new();
        backward.insert("from".into(), json!("2024-01-01"));
        backward.insert("userId".into(), json!("u-1"));

        assert_eq!(
            cache_key("stats", &Value::Object(forward)).unwrap(),
            cache_key("stats", &Value::Object(backward)).unwrap()
        );
    }

    #[rstest]
    fn it_should_sort_nested_objects_but_keep_array_order() {
        let key = cache_key(
            "stats",
            &json!({"z": {"b": 1, "a": 2}, "groupBy": ["user", "project"]}),
        )
        .unwrap();
        assert_eq!(
            key,
            r#"stats:{"groupBy":["user","project"],"z":{"a":2,"b":1}}"#
        );
    }

    #[rstest]
    fn it_should_separate_namespaces() {
        let filter = json!({"from": "2024-01-01"});
        assert_ne!(
            cache_key("project-stats", &filter).unwrap(),
            cache_key("worker-stats", &filter).unwrap()
        );
    }

    #[rstest]
    fn it_should_only_cache_global_stats_in_production() {
        assert_eq!(
            CachePolicy::production().global_stats_ttl,
            Some(Duration::from_secs(3600))
        );
        assert_eq!(CachePolicy::development().global_stats_ttl, None);
        assert_eq!(
            CachePolicy::development().entity_stats_ttl,
            Duration::from_secs(900)
        );
    }
}
