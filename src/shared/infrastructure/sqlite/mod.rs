// SQLite connection pool and schema.
//
// Purpose
// - Open the pool every SQLite adapter shares and bring the schema up to date.
//
// Responsibilities
// - Migrations are idempotent `CREATE ... IF NOT EXISTS` statements run on connect.
// - `time_entries` carries the (user, task, work date) uniqueness constraint.
// - `datalake_entries` is indexed on every column global stats filter or group on.
// - Identifiers are stored as 16-byte blobs, dates as `YYYY-MM-DD` text.

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::str::FromStr;
use tracing::info;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id BLOB PRIMARY KEY,
        email TEXT UNIQUE NOT NULL,
        role TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS projects (
        id BLOB PRIMARY KEY,
        name TEXT NOT NULL,
        code TEXT,
        is_global BOOLEAN NOT NULL DEFAULT 0,
        is_archived BOOLEAN NOT NULL DEFAULT 0
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS tasks (
        id BLOB PRIMARY KEY,
        project_id BLOB NOT NULL,
        name TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'OPEN',
        FOREIGN KEY (project_id) REFERENCES projects(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS project_members (
        project_id BLOB NOT NULL,
        user_id BLOB NOT NULL,
        role TEXT NOT NULL DEFAULT 'MEMBER',
        PRIMARY KEY (project_id, user_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS user_pinned_tasks (
        user_id BLOB NOT NULL,
        task_id BLOB NOT NULL,
        PRIMARY KEY (user_id, task_id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS time_entries (
        id BLOB PRIMARY KEY,
        user_id BLOB NOT NULL,
        task_id BLOB NOT NULL,
        work_date TEXT NOT NULL,
        minutes INTEGER NOT NULL,
        notes TEXT,
        created_at INTEGER NOT NULL,
        updated_at INTEGER NOT NULL,
        UNIQUE (user_id, task_id, work_date)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_time_entries_work_date ON time_entries(work_date)",
    r#"
    CREATE TABLE IF NOT EXISTS datalake_entries (
        id BLOB PRIMARY KEY,
        user_id BLOB NOT NULL,
        project_id BLOB NOT NULL,
        task_id BLOB NOT NULL,
        date TEXT NOT NULL,
        week TEXT NOT NULL,
        month TEXT NOT NULL,
        year TEXT NOT NULL,
        minutes INTEGER NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_datalake_date ON datalake_entries(date)",
    "CREATE INDEX IF NOT EXISTS idx_datalake_week ON datalake_entries(week)",
    "CREATE INDEX IF NOT EXISTS idx_datalake_month ON datalake_entries(month)",
    "CREATE INDEX IF NOT EXISTS idx_datalake_project ON datalake_entries(project_id)",
    "CREATE INDEX IF NOT EXISTS idx_datalake_user ON datalake_entries(user_id)",
];

#[derive(Clone)]
pub struct SqliteStore {
    pub pool: SqlitePool,
}

impl SqliteStore {
    /// Connects and migrates. `sqlite::memory:` gets a single connection so
    /// every adapter sees the same database.
    pub async fn connect(url: &str) -> anyhow::Result<Self> {
        let in_memory = url.contains(":memory:");
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        info!(in_memory, "Connecting to SQLite");
        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { 5 })
            .idle_timeout(None::<std::time::Duration>)
            .max_lifetime(None::<std::time::Duration>)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    async fn run_migrations(&self) -> anyhow::Result<()> {
        info!("Running database migrations");
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }
}
