// Thin administration of the collaborator records.
//
// Purpose
// - Let administrators create users, projects, tasks and memberships, and
//   close or reopen tasks.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::core::model::{
    Project, ProjectMember, ProjectRole, Role, Task, TaskStatus, User,
};
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct NewProject {
    pub name: String,
    pub code: Option<String>,
    pub is_global: bool,
}

fn required(field: &str, value: &str) -> Result<String, ApplicationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ApplicationError::validation(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

pub struct DirectoryAdminHandler {
    directory: Arc<dyn Directory>,
}

impl DirectoryAdminHandler {
    pub fn new(directory: Arc<dyn Directory>) -> Self {
        Self { directory }
    }

    #[instrument(skip(self, actor))]
    pub async fn create_user(
        &self,
        actor: &Actor,
        email: &str,
        role: Role,
    ) -> Result<User, ApplicationError> {
        actor.require_admin()?;
        let email = required("email", email)?.to_lowercase();
        if !email.contains('@') {
            return Err(ApplicationError::validation("email must contain '@'"));
        }
        let user = User {
            id: Uuid::now_v7(),
            email,
            role,
        };
        self.directory
            .save_user(user.clone())
            .await
            .map_err(|err| ApplicationError::Conflict(format!("{err:#}")))?;
        Ok(user)
    }

    #[instrument(skip(self, actor))]
    pub async fn create_project(
        &self,
        actor: &Actor,
        project: NewProject,
    ) -> Result<Project, ApplicationError> {
        actor.require_admin()?;
        let project = Project {
            id: Uuid::now_v7(),
            name: required("name", &project.name)?,
            code: project.code.filter(|c| !c.trim().is_empty()),
            is_global: project.is_global,
            is_archived: false,
        };
        self.directory.save_project(project.clone()).await?;
        Ok(project)
    }

    #[instrument(skip(self, actor))]
    pub async fn create_task(
        &self,
        actor: &Actor,
        project_id: Uuid,
        name: &str,
    ) -> Result<Task, ApplicationError> {
        actor.require_admin()?;
        let name = required("name", name)?;
        if self.directory.find_project(project_id).await?.is_none() {
            return Err(ApplicationError::not_found("project not found"));
        }
        let task = Task {
            id: Uuid::now_v7(),
            project_id,
            name,
            status: TaskStatus::Open,
        };
        self.directory.save_task(task.clone()).await?;
        Ok(task)
    }

    #[instrument(skip(self, actor))]
    pub async fn add_member(
        &self,
        actor: &Actor,
        project_id: Uuid,
        user_id: Uuid,
        role: ProjectRole,
    ) -> Result<ProjectMember, ApplicationError> {
        actor.require_admin()?;
        if self.directory.find_project(project_id).await?.is_none() {
            return Err(ApplicationError::not_found("project not found"));
        }
        if self.directory.find_user(user_id).await?.is_none() {
            return Err(ApplicationError::not_found("user not found"));
        }
        let member = ProjectMember {
            project_id,
            user_id,
            role,
        };
        self.directory.save_membership(member.clone()).await?;
        Ok(member)
    }

    /// Closing a task freezes its entries; reopening unfreezes them.
    #[instrument(skip(self, actor))]
    pub async fn set_task_status(
        &self,
        actor: &Actor,
        task_id: Uuid,
        status: TaskStatus,
    ) -> Result<Task, ApplicationError> {
        actor.require_admin()?;
        let mut task = self
            .directory
            .find_task(task_id)
            .await?
            .ok_or_else(|| ApplicationError::not_found("task not found"))?;
        task.status = status;
        self.directory.save_task(task.clone()).await?;
        Ok(task)
    }
}
