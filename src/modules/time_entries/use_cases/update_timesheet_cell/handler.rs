// Weekly grid cell upsert.
//
// Purpose
// - Set the minutes of one (task, day) cell for the acting user.
//
// Responsibilities
// - Zero deletes the entry, if any.
// - A positive value checks the task before anything is written, then pins
//   it and updates in place or creates.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::time_entries::core::decide::ensure_open;
use crate::modules::time_entries::core::time_entry::{LogTimeEntry, TimeEntryPatch};
use crate::modules::time_entries::use_cases::log_time_entry::handler::TimeEntryHandler;
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::ensure_minutes;
use chrono::{NaiveDate, Utc};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimesheetCell {
    pub task_id: Uuid,
    pub work_date: NaiveDate,
    pub minutes: i32,
}

pub struct UpdateTimesheetCellHandler {
    entries: Arc<TimeEntryHandler>,
}

impl UpdateTimesheetCellHandler {
    pub fn new(entries: Arc<TimeEntryHandler>) -> Self {
        Self { entries }
    }

    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn handle(&self, actor: &Actor, cell: TimesheetCell) -> Result<(), ApplicationError> {
        ensure_minutes(cell.minutes, 0)?;

        let existing = self
            .entries
            .log()
            .find_by_cell(actor.user_id, cell.task_id, cell.work_date)
            .await?;

        if cell.minutes == 0 {
            let Some(entry) = existing else {
                return Ok(());
            };
            let task = self.entries.load_task(entry.task_id).await?;
            ensure_open(&task)?;
            return self.entries.store_delete(entry.id).await;
        }

        let task = self.entries.load_task(cell.task_id).await?;
        ensure_open(&task)?;
        self.entries.ensure_access_to(actor, &task).await?;

        let directory = self.entries.directory();
        if !directory.is_pinned(actor.user_id, cell.task_id).await? {
            directory.pin_task(actor.user_id, cell.task_id).await?;
        }

        match existing {
            Some(entry) => {
                let patch = TimeEntryPatch {
                    minutes: Some(cell.minutes),
                    notes: None,
                };
                self.entries
                    .store_update(entry.apply(patch, Utc::now().timestamp_millis()))
                    .await?;
            }
            None => {
                self.entries
                    .create(
                        actor,
                        LogTimeEntry {
                            task_id: cell.task_id,
                            work_date: cell.work_date,
                            minutes: cell.minutes,
                            notes: None,
                        },
                    )
                    .await?;
            }
        }
        Ok(())
    }
}
