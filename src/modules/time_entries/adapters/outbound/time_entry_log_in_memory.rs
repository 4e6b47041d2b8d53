// In memory implementation of the TimeEntryLog port.
//
// Purpose
// - Support handler tests and local development without a database.
//
// Responsibilities
// - Store entries by id with a secondary index acting as the uniqueness constraint.
// - Check the constraint and insert under one write lock, so concurrent inserts
//   for the same cell resolve to exactly one winner.

use crate::modules::time_entries::adapters::outbound::time_entry_log::{LogError, TimeEntryLog};
use crate::modules::time_entries::core::time_entry::TimeEntry;
use chrono::NaiveDate;
use std::collections::{BTreeMap, HashMap};
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

type CellKey = (Uuid, Uuid, NaiveDate);

#[derive(Default)]
struct Rows {
    by_id: BTreeMap<Uuid, TimeEntry>,
    by_cell: HashMap<CellKey, Uuid>,
}

#[derive(Default)]
pub struct InMemoryTimeEntryLog {
    rows: RwLock<Rows>,
    is_offline: bool,
    delay_insert_ms: u64,
}

fn cell_of(entry: &TimeEntry) -> CellKey {
    (entry.user_id, entry.task_id, entry.work_date)
}

impl InMemoryTimeEntryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Widens the window between a caller's existence check and the insert.
    pub fn set_delay_insert_ms(&mut self, ms: u64) {
        self.delay_insert_ms = ms;
    }

    fn ensure_online(&self) -> Result<(), LogError> {
        if self.is_offline {
            return Err(LogError::Backend("Time entry log offline".into()));
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> Result<Vec<TimeEntry>, LogError> {
        self.ensure_online()?;
        Ok(self.rows.read().await.by_id.values().cloned().collect())
    }
}

#[async_trait::async_trait]
impl TimeEntryLog for InMemoryTimeEntryLog {
    async fn insert(&self, entry: &TimeEntry) -> Result<(), LogError> {
        self.ensure_online()?;
        if self.delay_insert_ms > 0 {
            tokio::time::sleep(Duration::from_millis(self.delay_insert_ms)).await;
        }

        let mut guard = self.rows.write().await;
        let key = cell_of(entry);
        if guard.by_cell.contains_key(&key) {
            return Err(LogError::UniqueViolation {
                user_id: entry.user_id,
                task_id: entry.task_id,
                work_date: entry.work_date,
            });
        }
        guard.by_cell.insert(key, entry.id);
        guard.by_id.insert(entry.id, entry.clone());
        Ok(())
    }

    async fn update(&self, entry: &TimeEntry) -> Result<bool, LogError> {
        self.ensure_online()?;
        let mut guard = self.rows.write().await;
        let Some(previous) = guard.by_id.get(&entry.id).cloned() else {
            return Ok(false);
        };
        let old_key = cell_of(&previous);
        let new_key = cell_of(entry);
        if old_key != new_key {
            if guard.by_cell.contains_key(&new_key) {
                return Err(LogError::UniqueViolation {
                    user_id: entry.user_id,
                    task_id: entry.task_id,
                    work_date: entry.work_date,
                });
            }
            guard.by_cell.remove(&old_key);
            guard.by_cell.insert(new_key, entry.id);
        }
        guard.by_id.insert(entry.id, entry.clone());
        Ok(true)
    }

    async fn delete(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError> {
        self.ensure_online()?;
        let mut guard = self.rows.write().await;
        let removed = guard.by_id.remove(&id);
        if let Some(entry) = &removed {
            guard.by_cell.remove(&cell_of(entry));
        }
        Ok(removed)
    }

    async fn find(&self, id: Uuid) -> Result<Option<TimeEntry>, LogError> {
        self.ensure_online()?;
        Ok(self.rows.read().await.by_id.get(&id).cloned())
    }

    async fn find_by_cell(
        &self,
        user_id: Uuid,
        task_id: Uuid,
        work_date: NaiveDate,
    ) -> Result<Option<TimeEntry>, LogError> {
        self.ensure_online()?;
        let guard = self.rows.read().await;
        Ok(guard
            .by_cell
            .get(&(user_id, task_id, work_date))
            .and_then(|id| guard.by_id.get(id))
            .cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<TimeEntry>, LogError> {
        self.ensure_online()?;
        let guard = self.rows.read().await;
        let mut items: Vec<TimeEntry> = guard
            .by_id
            .values()
            .filter(|e| e.user_id == user_id)
            .filter(|e| from.is_none_or(|from| e.work_date >= from))
            .filter(|e| to.is_none_or(|to| e.work_date <= to))
            .cloned()
            .collect();
        items.sort_by(|a, b| b.work_date.cmp(&a.work_date).then(a.id.cmp(&b.id)));
        Ok(items)
    }

    async fn page(&self, offset: u64, limit: u64) -> Result<Vec<TimeEntry>, LogError> {
        self.ensure_online()?;
        Ok(self
            .rows
            .read()
            .await
            .by_id
            .values()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}
