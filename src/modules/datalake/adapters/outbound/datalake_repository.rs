// Write port for the datalake projection.
//
// Purpose
// - Keep the flat, pre-bucketed copy of the log that global stats read from.
//
// Boundaries
// - Never authoritative. Everything stored here can be re-derived from the log.

use crate::modules::datalake::core::datalake_entry::DatalakeEntry;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait DatalakeRepository: Send + Sync {
    /// Insert or replace by id.
    async fn upsert(&self, entry: &DatalakeEntry) -> anyhow::Result<()>;
    /// Idempotent.
    async fn delete(&self, id: Uuid) -> anyhow::Result<()>;
    async fn clear(&self) -> anyhow::Result<()>;
    async fn find(&self, id: Uuid) -> anyhow::Result<Option<DatalakeEntry>>;
    /// Ordered by id.
    async fn list_all(&self) -> anyhow::Result<Vec<DatalakeEntry>>;
}
