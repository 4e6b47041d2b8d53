// Pure rules for mutating the time entry log.
//
// Purpose
// - Decide, from already-loaded records, whether a mutation may proceed.
//
// Responsibilities
// - Task must be open for any write.
// - Actor must be a project member, or the project must be global.
// - Only the owner may update or delete an entry.
// - Never perform input or output.

use crate::modules::directory::core::model::{Project, ProjectMember, Task};
use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::core::errors::ApplicationError;
use uuid::Uuid;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum DecideError {
    #[error("task not found")]
    TaskNotFound,

    #[error("project not found")]
    ProjectNotFound,

    #[error("time entry not found")]
    EntryNotFound,

    #[error("task is closed")]
    TaskClosed,

    #[error("you are not a member of this project")]
    NotAMember,

    #[error("you can only change your own time entries")]
    NotOwner,

    #[error("time entry already exists for this task and date")]
    AlreadyExists,
}

impl From<DecideError> for ApplicationError {
    fn from(err: DecideError) -> Self {
        let message = err.to_string();
        match err {
            DecideError::TaskNotFound
            | DecideError::ProjectNotFound
            | DecideError::EntryNotFound => ApplicationError::NotFound(message),
            DecideError::TaskClosed => ApplicationError::InvalidState(message),
            DecideError::NotAMember | DecideError::NotOwner => {
                ApplicationError::Forbidden(message)
            }
            DecideError::AlreadyExists => ApplicationError::Conflict(message),
        }
    }
}

pub fn require_task(task: Option<Task>) -> Result<Task, DecideError> {
    task.ok_or(DecideError::TaskNotFound)
}

pub fn require_project(project: Option<Project>) -> Result<Project, DecideError> {
    project.ok_or(DecideError::ProjectNotFound)
}

pub fn require_entry(entry: Option<TimeEntry>) -> Result<TimeEntry, DecideError> {
    entry.ok_or(DecideError::EntryNotFound)
}

pub fn ensure_open(task: &Task) -> Result<(), DecideError> {
    if task.is_closed() {
        return Err(DecideError::TaskClosed);
    }
    Ok(())
}

/// Global projects admit everyone without a membership row.
pub fn ensure_access(
    project: &Project,
    membership: Option<&ProjectMember>,
) -> Result<(), DecideError> {
    if project.is_global || membership.is_some() {
        return Ok(());
    }
    Err(DecideError::NotAMember)
}

pub fn ensure_owner(entry: &TimeEntry, user_id: Uuid) -> Result<(), DecideError> {
    if entry.user_id != user_id {
        return Err(DecideError::NotOwner);
    }
    Ok(())
}

pub fn ensure_absent(existing: Option<&TimeEntry>) -> Result<(), DecideError> {
    if existing.is_some() {
        return Err(DecideError::AlreadyExists);
    }
    Ok(())
}

#[cfg(test)]
mod time_entry_decide_tests {
    use super::*;
    use crate::modules::directory::core::model::{ProjectRole, TaskStatus};
    use crate::tests::fixtures::make_time_entry;
    use rstest::{fixture, rstest};

    #[fixture]
    fn project() -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "Apollo".into(),
            code: None,
            is_global: false,
            is_archived: false,
        }
    }

    fn task(project: &Project, status: TaskStatus) -> Task {
        Task {
            id: Uuid::now_v7(),
            project_id: project.id,
            name: "Design".into(),
            status,
        }
    }

    #[rstest]
    fn it_should_reject_a_missing_task() {
        assert_eq!(require_task(None), Err(DecideError::TaskNotFound));
    }

    #[rstest]
    fn it_should_reject_closed_tasks(project: Project) {
        assert_eq!(
            ensure_open(&task(&project, TaskStatus::Closed)),
            Err(DecideError::TaskClosed)
        );
        assert_eq!(ensure_open(&task(&project, TaskStatus::Open)), Ok(()));
    }

    #[rstest]
    fn it_should_require_membership_on_regular_projects(project: Project) {
        assert_eq!(ensure_access(&project, None), Err(DecideError::NotAMember));

        let member = ProjectMember {
            project_id: project.id,
            user_id: Uuid::now_v7(),
            role: ProjectRole::Member,
        };
        assert_eq!(ensure_access(&project, Some(&member)), Ok(()));
    }

    #[rstest]
    fn it_should_let_everyone_into_global_projects(mut project: Project) {
        project.is_global = true;
        assert_eq!(ensure_access(&project, None), Ok(()));
    }

    #[rstest]
    fn it_should_only_let_owners_mutate() {
        let entry = make_time_entry();
        assert_eq!(ensure_owner(&entry, entry.user_id), Ok(()));
        assert_eq!(
            ensure_owner(&entry, Uuid::now_v7()),
            Err(DecideError::NotOwner)
        );
    }

    #[rstest]
    fn it_should_reject_duplicates() {
        let entry = make_time_entry();
        assert_eq!(
            ensure_absent(Some(&entry)),
            Err(DecideError::AlreadyExists)
        );
        assert_eq!(ensure_absent(None), Ok(()));
    }

    #[rstest]
    #[case(DecideError::TaskNotFound, "not_found")]
    #[case(DecideError::EntryNotFound, "not_found")]
    #[case(DecideError::TaskClosed, "invalid_state")]
    #[case(DecideError::NotAMember, "forbidden")]
    #[case(DecideError::NotOwner, "forbidden")]
    #[case(DecideError::AlreadyExists, "conflict")]
    fn it_should_map_rule_violations_to_error_kinds(
        #[case] err: DecideError,
        #[case] kind: &str,
    ) {
        assert_eq!(ApplicationError::from(err).kind(), kind);
    }
}
