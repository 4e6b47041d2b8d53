// In memory implementation of the AggregateCache port.
//
// Purpose
// - Process-local cache for single-instance deployments and tests.
//
// Responsibilities
// - Keep values with their expiry instant.
// - Drop an expired key on read and sweep all expired keys on every write.

use crate::shared::infrastructure::aggregate_cache::AggregateCache;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CachedValue {
    value: Value,
    expires_at: Instant,
}

#[derive(Default)]
pub struct InMemoryAggregateCache {
    entries: RwLock<HashMap<String, CachedValue>>,
    is_offline: bool,
}

impl InMemoryAggregateCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl AggregateCache for InMemoryAggregateCache {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Value>> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Aggregate cache offline"));
        }

        let now = Instant::now();
        {
            let guard = self.entries.read().await;
            match guard.get(key) {
                Some(cached) if cached.expires_at > now => return Ok(Some(cached.value.clone())),
                Some(_) => {}
                None => return Ok(None),
            }
        }
        // Expired.
        let mut guard = self.entries.write().await;
        if guard.get(key).is_some_and(|cached| cached.expires_at <= now) {
            guard.remove(key);
        }
        Ok(None)
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Aggregate cache offline"));
        }

        let now = Instant::now();
        let mut guard = self.entries.write().await;
        guard.retain(|_, cached| cached.expires_at > now);
        guard.insert(
            key.to_string(),
            CachedValue {
                value,
                expires_at: now + ttl,
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod in_memory_aggregate_cache_tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[tokio::test]
    async fn it_should_return_a_stored_value_before_expiry() {
        let cache = InMemoryAggregateCache::new();
        cache
            .set("stats:{}", json!([{"totalMinutes": 60}]), Duration::from_secs(60))
            .await
            .unwrap();
        assert_eq!(
            cache.get("stats:{}").await.unwrap(),
            Some(json!([{"totalMinutes": 60}]))
        );
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_expire_values_after_the_ttl() {
        let cache = InMemoryAggregateCache::new();
        cache
            .set("k", json!(1), Duration::from_secs(900))
            .await
            .unwrap();

        tokio::time::advance(Duration::from_secs(899)).await;
        assert_eq!(cache.get("k").await.unwrap(), Some(json!(1)));

        tokio::time::advance(Duration::from_secs(2)).await;
        assert_eq!(cache.get("k").await.unwrap(), None);
        assert!(cache.is_empty().await);
    }

    #[rstest]
    #[tokio::test(start_paused = true)]
    async fn it_should_sweep_expired_keys_when_writing() {
        let cache = InMemoryAggregateCache::new();
        for n in 0..1000 {
            cache
                .set(&format!("stats:{n}"), json!(n), Duration::from_secs(1))
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 1000);

        tokio::time::advance(Duration::from_secs(3600)).await;
        assert_eq!(cache.get("stats:unknown").await.unwrap(), None);
        cache
            .set("stats:fresh", json!("fresh"), Duration::from_secs(1))
            .await
            .unwrap();

        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("stats:fresh").await.unwrap(), Some(json!("fresh")));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_miss_unknown_keys() {
        let cache = InMemoryAggregateCache::new();
        assert_eq!(cache.get("nope").await.unwrap(), None);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_fail_when_offline() {
        let mut cache = InMemoryAggregateCache::new();
        cache.toggle_offline();
        assert!(cache.get("k").await.is_err());
        assert!(
            cache
                .set("k", json!(1), Duration::from_secs(1))
                .await
                .unwrap_err()
                .to_string()
                .contains("Aggregate cache offline")
        );
    }
}
