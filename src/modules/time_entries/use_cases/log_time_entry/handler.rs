// Guarded mutations of the time entry log.
//
// Purpose
// - Create, update and delete entries on behalf of an acting user.
//
// Responsibilities
// - Validate input before touching storage.
// - Load the task, project and membership, then apply the pure rules.
// - Publish a change event after each committed write.
// - Pin the task for the user whenever an entry is created.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::core::model::Task;
use crate::modules::time_entries::adapters::outbound::time_entry_log::TimeEntryLog;
use crate::modules::time_entries::core::decide::{
    ensure_absent, ensure_access, ensure_open, ensure_owner, require_entry, require_project,
    require_task,
};
use crate::modules::time_entries::core::events::TimeEntryChanged;
use crate::modules::time_entries::core::time_entry::{LogTimeEntry, TimeEntry, TimeEntryPatch};
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::{ensure_minutes, ensure_window};
use crate::shared::infrastructure::event_bus::ChangeNotifier;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

fn now_ms() -> i64 {
    Utc::now().timestamp_millis()
}

pub struct TimeEntryHandler {
    directory: Arc<dyn Directory>,
    log: Arc<dyn TimeEntryLog>,
    notifier: Arc<dyn ChangeNotifier<TimeEntryChanged>>,
}

impl TimeEntryHandler {
    pub fn new(
        directory: Arc<dyn Directory>,
        log: Arc<dyn TimeEntryLog>,
        notifier: Arc<dyn ChangeNotifier<TimeEntryChanged>>,
    ) -> Self {
        Self {
            directory,
            log,
            notifier,
        }
    }

    pub(crate) fn directory(&self) -> &Arc<dyn Directory> {
        &self.directory
    }

    pub(crate) fn log(&self) -> &Arc<dyn TimeEntryLog> {
        &self.log
    }

    #[instrument(skip(self, command), fields(user_id = %actor.user_id, task_id = %command.task_id))]
    pub async fn create(
        &self,
        actor: &Actor,
        command: LogTimeEntry,
    ) -> Result<TimeEntry, ApplicationError> {
        ensure_minutes(command.minutes, 1)?;

        let task = self.load_task(command.task_id).await?;
        ensure_open(&task)?;
        self.ensure_access_to(actor, &task).await?;

        let existing = self
            .log
            .find_by_cell(actor.user_id, command.task_id, command.work_date)
            .await?;
        ensure_absent(existing.as_ref())?;

        let entry = TimeEntry::new(actor.user_id, command, now_ms());
        self.log.insert(&entry).await?;
        self.notifier
            .publish(TimeEntryChanged::Created(entry.clone()))
            .await;

        if let Err(err) = self.directory.pin_task(actor.user_id, entry.task_id).await {
            tracing::warn!(error = %err, entry_id = %entry.id, "could not pin task after create");
        }
        Ok(entry)
    }

    #[instrument(skip(self, patch), fields(user_id = %actor.user_id))]
    pub async fn update(
        &self,
        actor: &Actor,
        entry_id: Uuid,
        patch: TimeEntryPatch,
    ) -> Result<TimeEntry, ApplicationError> {
        if let Some(minutes) = patch.minutes {
            ensure_minutes(minutes, 1)?;
        }

        let entry = require_entry(self.log.find(entry_id).await?)?;
        ensure_owner(&entry, actor.user_id)?;
        let task = self.load_task(entry.task_id).await?;
        ensure_open(&task)?;

        self.store_update(entry.apply(patch, now_ms())).await
    }

    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn delete(&self, actor: &Actor, entry_id: Uuid) -> Result<(), ApplicationError> {
        let entry = require_entry(self.log.find(entry_id).await?)?;
        ensure_owner(&entry, actor.user_id)?;
        let task = self.load_task(entry.task_id).await?;
        ensure_open(&task)?;

        self.store_delete(entry.id).await
    }

    /// The actor's own entries, newest work date first.
    pub async fn list_for_user(
        &self,
        actor: &Actor,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
        project_id: Option<Uuid>,
    ) -> Result<Vec<TimeEntry>, ApplicationError> {
        ensure_window(from, to)?;
        let entries = self.log.list_for_user(actor.user_id, from, to).await?;
        let Some(project_id) = project_id else {
            return Ok(entries);
        };

        let mut project_of_task: HashMap<Uuid, Option<Uuid>> = HashMap::new();
        let mut kept = Vec::with_capacity(entries.len());
        for entry in entries {
            if !project_of_task.contains_key(&entry.task_id) {
                let task = self.directory.find_task(entry.task_id).await?;
                project_of_task.insert(entry.task_id, task.map(|t| t.project_id));
            }
            if project_of_task.get(&entry.task_id).copied().flatten() == Some(project_id) {
                kept.push(entry);
            }
        }
        Ok(kept)
    }

    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn pin_task(&self, actor: &Actor, task_id: Uuid) -> Result<(), ApplicationError> {
        let task = self.load_task(task_id).await?;
        self.ensure_access_to(actor, &task).await?;
        self.directory.pin_task(actor.user_id, task_id).await?;
        Ok(())
    }

    pub async fn unpin_task(&self, actor: &Actor, task_id: Uuid) -> Result<(), ApplicationError> {
        self.directory.unpin_task(actor.user_id, task_id).await?;
        Ok(())
    }

    pub(crate) async fn load_task(&self, task_id: Uuid) -> Result<Task, ApplicationError> {
        Ok(require_task(self.directory.find_task(task_id).await?)?)
    }

    pub(crate) async fn ensure_access_to(
        &self,
        actor: &Actor,
        task: &Task,
    ) -> Result<(), ApplicationError> {
        let project = require_project(self.directory.find_project(task.project_id).await?)?;
        let membership = self
            .directory
            .find_membership(project.id, actor.user_id)
            .await?;
        ensure_access(&project, membership.as_ref())?;
        Ok(())
    }

    pub(crate) async fn store_update(&self, entry: TimeEntry) -> Result<TimeEntry, ApplicationError> {
        if !self.log.update(&entry).await? {
            return Err(ApplicationError::not_found("time entry not found"));
        }
        self.notifier
            .publish(TimeEntryChanged::Updated(entry.clone()))
            .await;
        Ok(entry)
    }

    pub(crate) async fn store_delete(&self, entry_id: Uuid) -> Result<(), ApplicationError> {
        let removed = self
            .log
            .delete(entry_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("time entry not found"))?;
        self.notifier
            .publish(TimeEntryChanged::Deleted(removed))
            .await;
        Ok(())
    }
}
