// Read and write port for the collaborator records.
//
// Purpose
// - Let the time entry log check task state, membership and pins without
//   knowing where users, projects and tasks are stored.

use crate::modules::directory::core::model::{Project, ProjectMember, Task, User};
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait Directory: Send + Sync {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>>;
    async fn find_project(&self, id: Uuid) -> anyhow::Result<Option<Project>>;
    async fn find_task(&self, id: Uuid) -> anyhow::Result<Option<Task>>;
    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ProjectMember>>;

    async fn save_user(&self, user: User) -> anyhow::Result<()>;
    async fn save_project(&self, project: Project) -> anyhow::Result<()>;
    async fn save_task(&self, task: Task) -> anyhow::Result<()>;
    async fn save_membership(&self, member: ProjectMember) -> anyhow::Result<()>;

    async fn is_pinned(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool>;
    async fn pinned_task_ids(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>>;
    /// Idempotent.
    async fn pin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()>;
    async fn unpin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()>;
}
