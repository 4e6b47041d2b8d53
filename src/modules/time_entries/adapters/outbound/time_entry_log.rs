// Storage port for the time entry log, the source of truth.
//
// Purpose
// - Persist entries and enforce the (user, task, work date) uniqueness
//   constraint at the storage level.
//
// Responsibilities
// - `insert` reports `UniqueViolation` when the constraint rejects the row;
//   callers translate it to a conflict.
// - `page` walks all rows in a stable order for projection rebuilds.

use crate::modules::time_entries::core::time_entry::TimeEntry;
use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum LogError {
    #[error("time entry already exists for user {user_id}, task {task_id} on {work_date}")]
    UniqueViolation {
        user_id: Uuid,
        task_id: Uuid,
        work_date: NaiveDate,
    },

    #[error("backend error: {0}")]
    Backend(String),
}

impl From<LogError> for crate::shared::core::errors::ApplicationError {
    fn from(err: LogError) -> Self {
        match err {
            LogError::UniqueViolation { .. } => Self::Conflict(err.to_string()),
            LogError::Backend(_) => Self::Unexpected(err.to_string()),
        }
    }
}

#[async_trait]
pub trait TimeEntryLog: Send + Sync {
    async fn insert(&self, entry: &TimeEntry) -> Result<(), LogError>;
    /// Replaces the row with the same id. Returns false when no such row exists.
    async fn update(&self, entry: &TimeEntry) -> Result<bool, LogError>;
    async fn delete(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError>;
    async fn find(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError>;
    async fn find_by_cell(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<TimeEntry>, LogError>;
    /// Entries of one user within an inclusive window, newest work date first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<TimeEntry>, LogError>;
    /// Ordered by id.
    async fn page(&self, offset: u64, limit: u64) -> Result<Vec<TimeEntry>, LogError>;
}
