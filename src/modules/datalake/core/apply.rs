// Pure translation of a change event into datalake mutations.
//
// Purpose
// - Decide what the projection must do, given the event and the current
//   canonical state re-read by the caller.
//
// Responsibilities
// - Created and updated events upsert the current entry, never the payload.
// - A vanished entry is a benign no-op.
// - Deleted events remove the row by id.

use crate::modules::datalake::core::datalake_entry::DatalakeEntry;
use crate::modules::directory::core::model::Task;
use crate::modules::time_entries::core::events::TimeEntryChanged;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mutation {
    Upsert(DatalakeEntry),
    Delete(Uuid),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProjectionError {
    #[error("task {task_id} of time entry {entry_id} not found")]
    MissingTask { entry_id: Uuid, task_id: Uuid },
}

pub fn apply(
    event: &TimeEntryChanged,
    current: Option<&TimeEntry>,
    task: Option<&Task>,
) -> Result<Vec<Mutation>, ProjectionError> {
    match event {
        TimeEntryChanged::Deleted(entry) => Ok(vec![Mutation::Delete(entry.id)]),
        TimeEntryChanged::Created(_) | TimeEntryChanged::Updated(_) => {
            let Some(current) = current else {
                return Ok(vec![]);
            };
            project(current, task).map(|row| vec![Mutation::Upsert(row)])
        }
    }
}

/// Shared with the rebuild, which pages entries directly from the log.
pub fn project(entry: &TimeEntry, task: Option<&Task>) -> Result<DatalakeEntry, ProjectionError> {
    let task = task.ok_or(ProjectionError::MissingTask {
        entry_id: entry.id,
        task_id: entry.task_id,
    })?;
    Ok(DatalakeEntry::project(entry, task.project_id))
}
