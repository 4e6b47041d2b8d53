// In memory implementation of the Directory port.
//
// Purpose
// - Back service and HTTP tests, and local runs without a database.
//
// Responsibilities
// - Keep users, projects, tasks, memberships and pins in maps.
// - Hand out consistent snapshots to the in-memory report queries.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::core::model::{Project, ProjectMember, Task, User};
use std::collections::{BTreeSet, HashMap};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Records {
    users: HashMap<Uuid, User>,
    projects: HashMap<Uuid, Project>,
    tasks: HashMap<Uuid, Task>,
    members: HashMap<(Uuid, Uuid), ProjectMember>,
    pins: BTreeSet<(Uuid, Uuid)>,
}

/// Point-in-time copy of the label sources used by reports.
#[derive(Debug, Clone, Default)]
pub struct DirectorySnapshot {
    pub users: HashMap<Uuid, User>,
    pub projects: HashMap<Uuid, Project>,
    pub tasks: HashMap<Uuid, Task>,
}

impl DirectorySnapshot {
    pub fn user_email(&self, id: Uuid) -> Option<String> {
        self.users.get(&id).map(|u| u.email.clone())
    }

    pub fn project_name(&self, id: Uuid) -> Option<String> {
        self.projects.get(&id).map(|p| p.name.clone())
    }

    pub fn task_name(&self, id: Uuid) -> Option<String> {
        self.tasks.get(&id).map(|t| t.name.clone())
    }

    pub fn project_of_task(&self, task_id: Uuid) -> Option<Uuid> {
        self.tasks.get(&task_id).map(|t| t.project_id)
    }
}

#[derive(Default)]
pub struct InMemoryDirectory {
    records: RwLock<Records>,
    is_offline: bool,
}

impl InMemoryDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    fn ensure_online(&self) -> anyhow::Result<()> {
        if self.is_offline {
            return Err(anyhow::anyhow!("Directory offline"));
        }
        Ok(())
    }

    pub async fn snapshot(&self) -> anyhow::Result<DirectorySnapshot> {
        self.ensure_online()?;
        let guard = self.records.read().await;
        Ok(DirectorySnapshot {
            users: guard.users.clone(),
            projects: guard.projects.clone(),
            tasks: guard.tasks.clone(),
        })
    }
}

#[async_trait::async_trait]
impl Directory for InMemoryDirectory {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.ensure_online()?;
        Ok(self.records.read().await.users.get(&id).cloned())
    }

    async fn find_project(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        self.ensure_online()?;
        Ok(self.records.read().await.projects.get(&id).cloned())
    }

    async fn find_task(&self, id: Uuid) -> anyhow::Result<Option<Task>> {
        self.ensure_online()?;
        Ok(self.records.read().await.tasks.get(&id).cloned())
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ProjectMember>> {
        self.ensure_online()?;
        Ok(self
            .records
            .read()
            .await
            .members
            .get(&(project_id, user_id))
            .cloned())
    }

    async fn save_user(&self, user: User) -> anyhow::Result<()> {
        self.ensure_online()?;
        let mut guard = self.records.write().await;
        if guard
            .users
            .values()
            .any(|existing| existing.email == user.email && existing.id != user.id)
        {
            anyhow::bail!("email {} is already taken", user.email);
        }
        guard.users.insert(user.id, user);
        Ok(())
    }

    async fn save_project(&self, project: Project) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.records
            .write()
            .await
            .projects
            .insert(project.id, project);
        Ok(())
    }

    async fn save_task(&self, task: Task) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.records.write().await.tasks.insert(task.id, task);
        Ok(())
    }

    async fn save_membership(&self, member: ProjectMember) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.records
            .write()
            .await
            .members
            .insert((member.project_id, member.user_id), member);
        Ok(())
    }

    async fn is_pinned(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        self.ensure_online()?;
        Ok(self.records.read().await.pins.contains(&(user_id, task_id)))
    }

    async fn pinned_task_ids(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        self.ensure_online()?;
        Ok(self
            .records
            .read()
            .await
            .pins
            .iter()
            .filter(|(uid, _)| *uid == user_id)
            .map(|(_, task_id)| *task_id)
            .collect())
    }

    async fn pin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.records.write().await.pins.insert((user_id, task_id));
        Ok(())
    }

    async fn unpin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()> {
        self.ensure_online()?;
        self.records.write().await.pins.remove(&(user_id, task_id));
        Ok(())
    }
}
