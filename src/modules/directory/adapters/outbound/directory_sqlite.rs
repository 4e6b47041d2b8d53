// SQLite implementation of the Directory port.
//
// Responsibilities
// - Upsert collaborator records by primary key.
// - The unique email index rejects a second user with the same address.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::core::model::{Project, ProjectMember, Task, User};
use sqlx::{FromRow, SqlitePool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
    role: String,
}

impl TryFrom<UserRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: UserRecord) -> Result<Self, Self::Error> {
        Ok(User {
            id: record.id,
            email: record.email,
            role: record.role.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
struct ProjectRecord {
    id: Uuid,
    name: String,
    code: Option<String>,
    is_global: bool,
    is_archived: bool,
}

impl From<ProjectRecord> for Project {
    fn from(record: ProjectRecord) -> Self {
        Project {
            id: record.id,
            name: record.name,
            code: record.code,
            is_global: record.is_global,
            is_archived: record.is_archived,
        }
    }
}

#[derive(Debug, FromRow)]
struct TaskRecord {
    id: Uuid,
    project_id: Uuid,
    name: String,
    status: String,
}

impl TryFrom<TaskRecord> for Task {
    type Error = anyhow::Error;

    fn try_from(record: TaskRecord) -> Result<Self, Self::Error> {
        Ok(Task {
            id: record.id,
            project_id: record.project_id,
            name: record.name,
            status: record.status.parse()?,
        })
    }
}

#[derive(Debug, FromRow)]
struct MemberRecord {
    project_id: Uuid,
    user_id: Uuid,
    role: String,
}

impl TryFrom<MemberRecord> for ProjectMember {
    type Error = anyhow::Error;

    fn try_from(record: MemberRecord) -> Result<Self, Self::Error> {
        Ok(ProjectMember {
            project_id: record.project_id,
            user_id: record.user_id,
            role: record.role.parse()?,
        })
    }
}

pub struct SqliteDirectory {
    pool: SqlitePool,
}

impl SqliteDirectory {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl Directory for SqliteDirectory {
    async fn find_user(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        sqlx::query_as::<_, UserRecord>("SELECT id, email, role FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    async fn find_project(&self, id: Uuid) -> anyhow::Result<Option<Project>> {
        let record = sqlx::query_as::<_, ProjectRecord>(
            "SELECT id, name, code, is_global, is_archived FROM projects WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(record.map(Project::from))
    }

    async fn find_task(&self, id: Uuid) -> anyhow::Result<Option<Task>> {
        sqlx::query_as::<_, TaskRecord>(
            "SELECT id, project_id, name, status FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(Task::try_from)
        .transpose()
    }

    async fn find_membership(
        &self,
        project_id: Uuid,
        user_id: Uuid,
    ) -> anyhow::Result<Option<ProjectMember>> {
        sqlx::query_as::<_, MemberRecord>(
            "SELECT project_id, user_id, role FROM project_members WHERE project_id = ? AND user_id = ?",
        )
        .bind(project_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?
        .map(ProjectMember::try_from)
        .transpose()
    }

    async fn save_user(&self, user: User) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO users (id, email, role) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET email = excluded.email, role = excluded.role
            "#,
        )
        .bind(user.id)
        .bind(&user.email)
        .bind(user.role.as_str())
        .execute(&self.pool)
        .await
        .map_err(|err| {
            if matches!(&err, sqlx::Error::Database(db) if db.is_unique_violation()) {
                anyhow::anyhow!("email {} is already taken", user.email)
            } else {
                anyhow::Error::from(err)
            }
        })?;
        Ok(())
    }

    async fn save_project(&self, project: Project) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO projects (id, name, code, is_global, is_archived) VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                code = excluded.code,
                is_global = excluded.is_global,
                is_archived = excluded.is_archived
            "#,
        )
        .bind(project.id)
        .bind(&project.name)
        .bind(&project.code)
        .bind(project.is_global)
        .bind(project.is_archived)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_task(&self, task: Task) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO tasks (id, project_id, name, status) VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                project_id = excluded.project_id,
                name = excluded.name,
                status = excluded.status
            "#,
        )
        .bind(task.id)
        .bind(task.project_id)
        .bind(&task.name)
        .bind(task.status.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn save_membership(&self, member: ProjectMember) -> anyhow::Result<()> {
        sqlx::query(
            r#"
            INSERT INTO project_members (project_id, user_id, role) VALUES (?, ?, ?)
            ON CONFLICT(project_id, user_id) DO UPDATE SET role = excluded.role
            "#,
        )
        .bind(member.project_id)
        .bind(member.user_id)
        .bind(member.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn is_pinned(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<bool> {
        let row: Option<(i64,)> = sqlx::query_as(
            "SELECT 1 FROM user_pinned_tasks WHERE user_id = ? AND task_id = ?",
        )
        .bind(user_id)
        .bind(task_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.is_some())
    }

    async fn pinned_task_ids(&self, user_id: Uuid) -> anyhow::Result<Vec<Uuid>> {
        let rows: Vec<(Uuid,)> = sqlx::query_as(
            "SELECT task_id FROM user_pinned_tasks WHERE user_id = ? ORDER BY task_id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(task_id,)| task_id).collect())
    }

    async fn pin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("INSERT OR IGNORE INTO user_pinned_tasks (user_id, task_id) VALUES (?, ?)")
            .bind(user_id)
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn unpin_task(&self, user_id: Uuid, task_id: Uuid) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM user_pinned_tasks WHERE user_id = ? AND task_id = ?")
            .bind(user_id)
            .bind(task_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod sqlite_directory_tests {
    use super::*;
    use crate::modules::directory::core::model::{ProjectRole, Role, TaskStatus};
    use crate::shared::infrastructure::sqlite::SqliteStore;
    use rstest::rstest;

    async fn directory() -> SqliteDirectory {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        SqliteDirectory::new(store.pool)
    }

    fn project() -> Project {
        Project {
            id: Uuid::now_v7(),
            name: "Apollo".into(),
            code: None,
            is_global: true,
            is_archived: false,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_round_trip_collaborator_records() {
        let directory = directory().await;
        let user = User {
            id: Uuid::now_v7(),
            email: "ada@example.com".into(),
            role: Role::Admin,
        };
        let project = project();
        let task = Task {
            id: Uuid::now_v7(),
            project_id: project.id,
            name: "Design".into(),
            status: TaskStatus::Open,
        };
        let member = ProjectMember {
            project_id: project.id,
            user_id: user.id,
            role: ProjectRole::Lead,
        };

        directory.save_user(user.clone()).await.unwrap();
        directory.save_project(project.clone()).await.unwrap();
        directory.save_task(task.clone()).await.unwrap();
        directory.save_membership(member.clone()).await.unwrap();

        assert_eq!(directory.find_user(user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(directory.find_project(project.id).await.unwrap(), Some(project.clone()));
        assert_eq!(directory.find_task(task.id).await.unwrap(), Some(task));
        assert_eq!(
            directory.find_membership(project.id, user.id).await.unwrap(),
            Some(member)
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_update_task_status_in_place() {
        let directory = directory().await;
        let project = project();
        directory.save_project(project.clone()).await.unwrap();
        let mut task = Task {
            id: Uuid::now_v7(),
            project_id: project.id,
            name: "Design".into(),
            status: TaskStatus::Open,
        };
        directory.save_task(task.clone()).await.unwrap();

        task.status = TaskStatus::Closed;
        directory.save_task(task.clone()).await.unwrap();

        assert!(directory.find_task(task.id).await.unwrap().unwrap().is_closed());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_taken_email() {
        let directory = directory().await;
        let first = User {
            id: Uuid::now_v7(),
            email: "ada@example.com".into(),
            role: Role::Worker,
        };
        let second = User {
            id: Uuid::now_v7(),
            ..first.clone()
        };
        directory.save_user(first).await.unwrap();

        let err = directory.save_user(second).await.unwrap_err();
        assert!(err.to_string().contains("already taken"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_pin_idempotently_and_unpin() {
        let directory = directory().await;
        let user_id = Uuid::now_v7();
        let task_id = Uuid::now_v7();

        directory.pin_task(user_id, task_id).await.unwrap();
        directory.pin_task(user_id, task_id).await.unwrap();
        assert!(directory.is_pinned(user_id, task_id).await.unwrap());
        assert_eq!(directory.pinned_task_ids(user_id).await.unwrap(), vec![task_id]);

        directory.unpin_task(user_id, task_id).await.unwrap();
        directory.unpin_task(user_id, task_id).await.unwrap();
        assert!(!directory.is_pinned(user_id, task_id).await.unwrap());
    }
}
