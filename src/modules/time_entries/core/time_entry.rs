use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One row of the log: minutes a user spent on a task on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub task_id: Uuid,
    pub work_date: NaiveDate,
    pub minutes: i32,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Input for `create`. The acting user is passed separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogTimeEntry {
    pub task_id: Uuid,
    pub work_date: NaiveDate,
    pub minutes: i32,
    pub notes: Option<String>,
}

/// Partial update; absent fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryPatch {
    pub minutes: Option<i32>,
    pub notes: Option<String>,
}

impl TimeEntry {
    pub fn new(user_id: Uuid, command: LogTimeEntry, now_ms: i64) -> Self {
        Self {
            id: Uuid::now_v7(),
            user_id,
            task_id: command.task_id,
            work_date: command.work_date,
            minutes: command.minutes,
            notes: command.notes,
            created_at: now_ms,
            updated_at: now_ms,
        }
    }

    pub fn apply(mut self, patch: TimeEntryPatch, now_ms: i64) -> Self {
        if let Some(minutes) = patch.minutes {
            self.minutes = minutes;
        }
        if let Some(notes) = patch.notes {
            self.notes = Some(notes);
        }
        self.updated_at = now_ms;
        self
    }
}
