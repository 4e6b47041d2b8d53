use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::directory::core::model::{ProjectRole, Role, TaskStatus};
use crate::modules::directory::use_cases::manage_directory::handler::NewProject;
use crate::shared::core::actor::Actor;
use crate::shell::http::malformed_body;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserBody {
    pub email: String,
    pub role: Role,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectBody {
    pub name: String,
    pub code: Option<String>,
    #[serde(default)]
    pub is_global: bool,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskBody {
    pub name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddMemberBody {
    pub user_id: Uuid,
    pub role: Option<ProjectRole>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusBody {
    pub status: TaskStatus,
}

pub async fn create_user(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<CreateUserBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state
        .directory_admin
        .create_user(&actor, &body.email, body.role)
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(user)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_project(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<CreateProjectBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };
    let project = NewProject {
        name: body.name,
        code: body.code,
        is_global: body.is_global,
    };

    match state.directory_admin.create_project(&actor, project).await {
        Ok(project) => (StatusCode::CREATED, Json(project)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn create_task(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    body: Result<Json<CreateTaskBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state
        .directory_admin
        .create_task(&actor, project_id, &body.name)
        .await
    {
        Ok(task) => (StatusCode::CREATED, Json(task)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn add_member(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    body: Result<Json<AddMemberBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state
        .directory_admin
        .add_member(
            &actor,
            project_id,
            body.user_id,
            body.role.unwrap_or(ProjectRole::Member),
        )
        .await
    {
        Ok(member) => (StatusCode::CREATED, Json(member)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn set_task_status(
    State(state): State<AppState>,
    actor: Actor,
    Path(task_id): Path<Uuid>,
    body: Result<Json<TaskStatusBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state
        .directory_admin
        .set_task_status(&actor, task_id, body.status)
        .await
    {
        Ok(task) => Json(task).into_response(),
        Err(err) => err.into_response(),
    }
}
