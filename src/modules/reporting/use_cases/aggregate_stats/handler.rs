// Aggregation entry points with cache-aside memoization.
//
// Purpose
// - Serve global and per-entity stats to administrators.
//
// Responsibilities
// - Validate the filter, then look the canonical key up in the cache.
// - Global stats are cached only when the policy enables it.
// - Per-entity stats are always cached.
// - Cache failures degrade to a miss and never fail the query.

use crate::modules::reporting::adapters::outbound::reporting_queries::ReportingQueries;
use crate::modules::reporting::core::filters::{EntityStatsFilter, StatsFilter};
use crate::modules::reporting::core::rows::{ProjectStatsRow, StatsRow, WorkerStatsRow};
use crate::modules::reporting::core::stats_query::StatsQuery;
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shared::infrastructure::aggregate_cache::{AggregateCache, CachePolicy, cache_key};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::instrument;

pub const STATS_NAMESPACE: &str = "stats";
pub const PROJECT_STATS_NAMESPACE: &str = "project-stats";
pub const WORKER_STATS_NAMESPACE: &str = "worker-stats";

pub struct ReportingService {
    queries: Arc<dyn ReportingQueries>,
    cache: Arc<dyn AggregateCache>,
    policy: CachePolicy,
}

impl ReportingService {
    pub fn new(
        queries: Arc<dyn ReportingQueries>,
        cache: Arc<dyn AggregateCache>,
        policy: CachePolicy,
    ) -> Self {
        Self {
            queries,
            cache,
            policy,
        }
    }

    #[instrument(skip(self, filter), fields(user_id = %actor.user_id))]
    pub async fn get_stats(
        &self,
        actor: &Actor,
        filter: StatsFilter,
    ) -> Result<Vec<StatsRow>, ApplicationError> {
        actor.require_admin()?;
        let filter = filter.validated()?;
        let query = StatsQuery::from_filter(&filter);

        match self.policy.global_stats_ttl {
            Some(ttl) => {
                self.cached(STATS_NAMESPACE, &filter, ttl, || self.queries.stats(&query))
                    .await
            }
            None => Ok(self.queries.stats(&query).await?),
        }
    }

    #[instrument(skip(self, filter), fields(user_id = %actor.user_id, project_id = %filter.entity_id))]
    pub async fn get_project_stats(
        &self,
        actor: &Actor,
        filter: EntityStatsFilter,
    ) -> Result<Vec<ProjectStatsRow>, ApplicationError> {
        actor.require_admin()?;
        let filter = filter.validated()?;
        self.cached(
            PROJECT_STATS_NAMESPACE,
            &filter,
            self.policy.entity_stats_ttl,
            || self.queries.project_stats(&filter),
        )
        .await
    }

    #[instrument(skip(self, filter), fields(user_id = %actor.user_id, worker_id = %filter.entity_id))]
    pub async fn get_worker_stats(
        &self,
        actor: &Actor,
        filter: EntityStatsFilter,
    ) -> Result<Vec<WorkerStatsRow>, ApplicationError> {
        actor.require_admin()?;
        let filter = filter.validated()?;
        self.cached(
            WORKER_STATS_NAMESPACE,
            &filter,
            self.policy.entity_stats_ttl,
            || self.queries.worker_stats(&filter),
        )
        .await
    }

    async fn cached<F, Fut, Filter, Rows>(
        &self,
        namespace: &str,
        filter: &Filter,
        ttl: Duration,
        compute: F,
    ) -> Result<Rows, ApplicationError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<Rows>>,
        Filter: Serialize,
        Rows: Serialize + DeserializeOwned,
    {
        let key = match cache_key(namespace, filter) {
            Ok(key) => Some(key),
            Err(err) => {
                tracing::warn!(error = %err, namespace, "could not derive cache key");
                None
            }
        };

        if let Some(key) = &key {
            match self.cache.get(key).await {
                Ok(Some(value)) => match serde_json::from_value::<Rows>(value) {
                    Ok(rows) => {
                        tracing::debug!(key = %key, "aggregate cache hit");
                        return Ok(rows);
                    }
                    Err(err) => tracing::warn!(error = %err, key = %key, "unreadable cache entry"),
                },
                Ok(None) => tracing::debug!(key = %key, "aggregate cache miss"),
                Err(err) => tracing::warn!(error = %err, key = %key, "aggregate cache read failed"),
            }
        }

        let rows = compute().await?;

        if let Some(key) = key {
            match serde_json::to_value(&rows) {
                Ok(value) => {
                    if let Err(err) = self.cache.set(&key, value, ttl).await {
                        tracing::warn!(error = %err, key = %key, "aggregate cache write failed");
                    }
                }
                Err(err) => tracing::warn!(error = %err, key = %key, "could not serialize rows"),
            }
        }
        Ok(rows)
    }
}
