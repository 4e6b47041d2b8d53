// SQLite implementation of the DatalakeRepository port.

use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::datalake::core::datalake_entry::DatalakeEntry;
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

const COLUMNS: &str = "id, user_id, project_id, task_id, date, week, month, year, minutes";

#[derive(Debug, FromRow)]
struct DatalakeRecord {
    id: Uuid,
    user_id: Uuid,
    project_id: Uuid,
    task_id: Uuid,
    date: String,
    week: String,
    month: String,
    year: String,
    minutes: i32,
}

impl From<DatalakeRecord> for DatalakeEntry {
    fn from(record: DatalakeRecord) -> Self {
        DatalakeEntry {
            id: record.id,
            user_id: record.user_id,
            project_id: record.project_id,
            task_id: record.task_id,
            date: record.date,
            week: record.week,
            month: record.month,
            year: record.year,
            minutes: record.minutes,
        }
    }
}

pub struct SqliteDatalake {
    pool: SqlitePool,
}

impl SqliteDatalake {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DatalakeRepository for SqliteDatalake {
    async fn upsert(&self, entry: &DatalakeEntry) -> anyhow::Result<()> {
        sqlx::query(&format!(
            r#"
            INSERT INTO datalake_entries ({COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                user_id = excluded.user_id,
                project_id = excluded.project_id,
                task_id = excluded.task_id,
                date = excluded.date,
                week = excluded.week,
                month = excluded.month,
                year = excluded.year,
                minutes = excluded.minutes
            "#
        ))
        .bind(entry.id)
        .bind(entry.user_id)
        .bind(entry.project_id)
        .bind(entry.task_id)
        .bind(&entry.date)
        .bind(&entry.week)
        .bind(&entry.month)
        .bind(&entry.year)
        .bind(entry.minutes)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM datalake_entries WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn clear(&self) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM datalake_entries")
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<DatalakeEntry>> {
        let record = sqlx::query_as::<_, DatalakeRecord>(&format!(
            "SELECT {COLUMNS} FROM datalake_entries WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(DatalakeEntry::from))
    }

    async fn list_all(&self) -> anyhow::Result<Vec<DatalakeEntry>> {
        let records = sqlx::query_as::<_, DatalakeRecord>(&format!(
            "SELECT {COLUMNS} FROM datalake_entries ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(records.into_iter().map(DatalakeEntry::from).collect())
    }
}
