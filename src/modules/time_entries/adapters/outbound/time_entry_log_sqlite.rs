// SQLite implementation of the TimeEntryLog port.
//
// Responsibilities
// - Leave the (user, task, work date) invariant to the table's UNIQUE
//   constraint and translate its violation into `LogError::UniqueViolation`.

use crate::modules::time_entries::adapters::outbound::time_entry_log::{LogError, TimeEntryLog};
use crate::modules::time_entries::core::time_entry::TimeEntry;
use chrono::NaiveDate;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, task_id, work_date, minutes, notes, created_at, updated_at";

#[derive(Debug, FromRow)]
struct TimeEntryRecord {
    id: Uuid,
    user_id: Uuid,
    task_id: Uuid,
    work_date: NaiveDate,
    minutes: i32,
    notes: Option<String>,
    created_at: i64,
    updated_at: i64,
}

impl From<TimeEntryRecord> for TimeEntry {
    fn from(record: TimeEntryRecord) -> Self {
        TimeEntry {
            id: record.id,
            user_id: record.user_id,
            task_id: record.task_id,
            work_date: record.work_date,
            minutes: record.minutes,
            notes: record.notes,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

fn backend(err: sqlx::Error) -> LogError {
    LogError::Backend(err.to_string())
}

/// Maps the constraint failure to the domain error; anything else is a backend error.
fn write_error(err: sqlx::Error, entry: &TimeEntry) -> LogError {
    if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
        return LogError::UniqueViolation {
            user_id: entry.user_id,
            task_id: entry.task_id,
            work_date: entry.work_date,
        };
    }
    backend(err)
}

pub struct SqliteTimeEntryLog {
    pool: SqlitePool,
}

impl SqliteTimeEntryLog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TimeEntryLog for SqliteTimeEntryLog {
    async fn insert(&self, entry: &TimeEntry) -> Result<(), LogError> {
        sqlx::query(&format!(
            "INSERT INTO time_entries ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?)"
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.task_id)
        .bind(entry.work_date)
        .bind(entry.minutes)
        .bind(&entry.notes)
        .bind(entry.created_at)
        .bind(entry.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, entry))?;
        Ok(())
    }

    async fn update(&self, entry: &TimeEntry) -> Result<bool, LogError> {
        let result = sqlx::query(
            r#"
            UPDATE time_entries
            SET user_id = ?, task_id = ?, work_date = ?, minutes = ?, notes = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(entry.user_id)
        .bind(entry.task_id)
        .bind(entry.work_date)
        .bind(entry.minutes)
        .bind(&entry.notes)
        .bind(entry.updated_at)
        .bind(entry.id)
        .execute(&self.pool)
        .await
        .map_err(|err| write_error(err, entry))?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError> {
        let record = sqlx::query_as::<_, TimeEntryRecord>(&format!(
            "DELETE FROM time_entries WHERE id = ? RETURNING {COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(record.map(TimeEntry::from))
    }

    async fn find(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError> {
        let record = sqlx::query_as::<_, TimeEntryRecord>(&format!(
            "SELECT {COLUMNS} FROM time_entries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(record.map(TimeEntry::from))
    }

    async fn find_by_cell(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<TimeEntry>, LogError> {
        let record = sqlx::query_as::<_, TimeEntryRecord>(&format!(
            "SELECT {COLUMNS} FROM time_entries WHERE user_id = ? AND task_id = ? AND work_date = ?"
        ))
        .bind(user_id)
        .bind(task_id)
        .bind(work_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(backend)?;
        Ok(record.map(TimeEntry::from))
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<TimeEntry>, LogError> {
        let mut builder: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM time_entries WHERE user_id = "));
        builder.push_bind(user_id);
        if let Some(from) = from {
            builder.push(" AND work_date >= ").push_bind(from);
        }
        if let Some(to) = to {
            builder.push(" AND work_date <= ").push_bind(to);
        }
        builder.push(" ORDER BY work_date DESC, id ASC");

        let records = builder
            .build_query_as::<TimeEntryRecord>()
            .fetch_all(&self.pool)
            .await
            .map_err(backend)?;
        Ok(records.into_iter().map(TimeEntry::from).collect())
    }

    async fn page(&self, offset: u64, limit: u64) -> Result<Vec<TimeEntry>, LogError> {
        let records = sqlx::query_as::<_, TimeEntryRecord>(&format!(
            "SELECT {COLUMNS} FROM time_entries ORDER BY id LIMIT ? OFFSET ?"
        ))
        .bind(i64::try_from(limit).unwrap_or(i64::MAX))
        .bind(i64::try_from(offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(backend)?;
        Ok(records.into_iter().map(TimeEntry::from).collect())
    }
}
