// Full re-derivation of the datalake from the log.
//
// Purpose
// - Recover from drift or corruption of the projection.
//
// Responsibilities
// - Clear the projection, then page through the whole log in fixed batches.
// - Abort on the first failure; the caller reruns the whole rebuild.

use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::datalake::core::apply::project;
use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::core::model::Task;
use crate::modules::time_entries::adapters::outbound::time_entry_log::TimeEntryLog;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub const DEFAULT_BATCH_SIZE: u64 = 1000;

pub struct RebuildDatalakeHandler {
    log: Arc<dyn TimeEntryLog>,
    directory: Arc<dyn Directory>,
    datalake: Arc<dyn DatalakeRepository>,
    batch_size: u64,
}

impl RebuildDatalakeHandler {
    pub fn new(
        log: Arc<dyn TimeEntryLog>,
        directory: Arc<dyn Directory>,
        datalake: Arc<dyn DatalakeRepository>,
        batch_size: u64,
    ) -> Self {
        Self {
            log,
            directory,
            datalake,
            batch_size: batch_size.max(1),
        }
    }

    /// Returns the number of rows written.
    #[instrument(skip(self), fields(batch_size = self.batch_size))]
    pub async fn handle(&self) -> anyhow::Result<u64> {
        self.datalake.clear().await?;

        let mut tasks: HashMap<Uuid, Option<Task>> = HashMap::new();
        let mut offset = 0;
        loop {
            let batch = self.log.page(offset, self.batch_size).await?;
            if batch.is_empty() {
                break;
            }

            for entry in &batch {
                if !tasks.contains_key(&entry.task_id) {
                    let task = self.directory.find_task(entry.task_id).await?;
                    tasks.insert(entry.task_id, task);
                }
                let task = tasks.get(&entry.task_id).and_then(Option::as_ref);
                self.datalake.upsert(&project(entry, task)?).await?;
            }

            offset += batch.len() as u64;
            tracing::info!(processed = offset, "datalake rebuild batch done");
            if (batch.len() as u64) < self.batch_size {
                break;
            }
        }

        tracing::info!(total = offset, "datalake rebuild finished");
        Ok(offset)
    }
}
