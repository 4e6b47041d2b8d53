// Keeps the datalake in step with the time entry log.
//
// Purpose
// - Subscribe to log change events and apply the resulting mutations.
//
// Responsibilities
// - Treat the event as a trigger: re-read the entry and its task before upserting.
// - After an upsert, re-check the entry so a delete that raced the upsert does
//   not leave a stale row behind.

use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::datalake::core::apply::{Mutation, apply};
use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::time_entries::adapters::outbound::time_entry_log::TimeEntryLog;
use crate::modules::time_entries::core::events::TimeEntryChanged;
use crate::shared::infrastructure::event_bus::{ChangeHandler, Topic};
use std::sync::Arc;

pub struct DatalakeProjector {
    name: String,
    log: Arc<dyn TimeEntryLog>,
    directory: Arc<dyn Directory>,
    datalake: Arc<dyn DatalakeRepository>,
}

impl DatalakeProjector {
    pub fn new(
        name: impl Into<String>,
        log: Arc<dyn TimeEntryLog>,
        directory: Arc<dyn Directory>,
        datalake: Arc<dyn DatalakeRepository>,
    ) -> Self {
        Self {
            name: name.into(),
            log,
            directory,
            datalake,
        }
    }
}

#[async_trait::async_trait]
impl ChangeHandler<TimeEntryChanged> for DatalakeProjector {
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: &TimeEntryChanged) -> anyhow::Result<()> {
        let (current, task) = match event {
            TimeEntryChanged::Deleted(_) => (None, None),
            TimeEntryChanged::Created(_) | TimeEntryChanged::Updated(_) => {
                let current = self.log.find(event.entry_id()).await?;
                let task = match &current {
                    Some(entry) => self.directory.find_task(entry.task_id).await?,
                    None => None,
                };
                (current, task)
            }
        };

        let mutations = apply(event, current.as_ref(), task.as_ref())?;
        if mutations.is_empty() {
            tracing::debug!(
                topic = event.topic(),
                entry_id = %event.entry_id(),
                "entry vanished before projection"
            );
        }

        for mutation in mutations {
            match mutation {
                Mutation::Upsert(row) => {
                    let id = row.id;
                    self.datalake.upsert(&row).await?;
                    if self.log.find(id).await?.is_none() {
                        self.datalake.delete(id).await?;
                    }
                }
                Mutation::Delete(id) => self.datalake.delete(id).await?,
            }
        }
        Ok(())
    }
}
