use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::time_entries::core::time_entry::{LogTimeEntry, TimeEntryPatch};
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::{parse_date, parse_optional_date};
use crate::shell::http::malformed_body;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeEntryBody {
    pub task_id: Uuid,
    pub work_date: String,
    pub minutes: i32,
    pub notes: Option<String>,
}

impl CreateTimeEntryBody {
    fn into_command(self) -> Result<LogTimeEntry, ApplicationError> {
        Ok(LogTimeEntry {
            task_id: self.task_id,
            work_date: parse_date("workDate", &self.work_date)?,
            minutes: self.minutes,
            notes: self.notes,
        })
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTimeEntriesParams {
    pub from: Option<String>,
    pub to: Option<String>,
    pub project_id: Option<Uuid>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinTaskBody {
    pub task_id: Uuid,
}

pub async fn create(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<CreateTimeEntryBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };
    let command = match body.into_command() {
        Ok(command) => command,
        Err(err) => return err.into_response(),
    };

    match state.time_entries.create(&actor, command).await {
        Ok(entry) => (StatusCode::CREATED, Json(entry)).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn list(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<ListTimeEntriesParams>,
) -> impl IntoResponse {
    let window = parse_optional_date("from", params.from.as_deref()).and_then(|from| {
        parse_optional_date("to", params.to.as_deref()).map(|to| (from, to))
    });
    let (from, to) = match window {
        Ok(window) => window,
        Err(err) => return err.into_response(),
    };

    match state
        .time_entries
        .list_for_user(&actor, from, to, params.project_id)
        .await
    {
        Ok(entries) => Json(entries).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn update(
    State(state): State<AppState>,
    actor: Actor,
    Path(entry_id): Path<Uuid>,
    body: Result<Json<TimeEntryPatch>, JsonRejection>,
) -> impl IntoResponse {
    let Json(patch) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state.time_entries.update(&actor, entry_id, patch).await {
        Ok(entry) => Json(entry).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn delete(
    State(state): State<AppState>,
    actor: Actor,
    Path(entry_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.time_entries.delete(&actor, entry_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn pin(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<PinTaskBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };

    match state.time_entries.pin_task(&actor, body.task_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn unpin(
    State(state): State<AppState>,
    actor: Actor,
    Path(task_id): Path<Uuid>,
) -> impl IntoResponse {
    match state.time_entries.unpin_task(&actor, task_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => err.into_response(),
    }
}

#[cfg(test)]
mod time_entries_http_inbound_tests {
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use http_body_util::BodyExt;
    use rstest::rstest;
    use tower::ServiceExt;

    use crate::shell::http::ACTOR_HEADER;
    use crate::tests::fixtures::{World, world};

    fn post_json(uri: &str, actor: uuid::Uuid, body: String) -> Request<Body> {
        Request::post(uri)
            .header("content-type", "application/json")
            .header(ACTOR_HEADER, actor.to_string())
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_201_with_the_created_entry(#[future] world: World) {
        let world = world.await;
        let body = format!(
            r#"{{"taskId":"{}","workDate":"2024-01-01","minutes":60,"notes":"kickoff"}}"#,
            world.task.id
        );

        let response = world
            .app()
            .oneshot(post_json("/time-entries", world.worker.user_id, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let json = json_body(response).await;
        assert_eq!(json["minutes"], 60);
        assert_eq!(json["workDate"], "2024-01-01");
        assert!(json.get("id").is_some());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_409_with_an_error_body_on_duplicates(#[future] world: World) {
        let world = world.await;
        let body = format!(
            r#"{{"taskId":"{}","workDate":"2024-01-01","minutes":60}}"#,
            world.task.id
        );
        let app = world.app();
        app.clone()
            .oneshot(post_json("/time-entries", world.worker.user_id, body.clone()))
            .await
            .unwrap();

        let response = app
            .oneshot(post_json("/time-entries", world.worker.user_id, body))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(response).await["error"], "conflict");
    }

    #[rstest]
    #[case(r#"not-json"#, StatusCode::UNPROCESSABLE_ENTITY)]
    #[case(r#"{"taskId":"00000000-0000-0000-0000-000000000000","workDate":"01/02/2024","minutes":60}"#, StatusCode::BAD_REQUEST)]
    #[tokio::test]
    async fn it_should_reject_bad_bodies(
        #[future] world: World,
        #[case] body: &str,
        #[case] status: StatusCode,
    ) {
        let world = world.await;
        let response = world
            .app()
            .oneshot(post_json("/time-entries", world.worker.user_id, body.into()))
            .await
            .unwrap();
        assert_eq!(response.status(), status);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_401_without_a_known_actor(#[future] world: World) {
        let world = world.await;
        let missing = Request::get("/time-entries").body(Body::empty()).unwrap();
        let response = world.app().oneshot(missing).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

        let unknown = Request::get("/time-entries")
            .header(ACTOR_HEADER, uuid::Uuid::now_v7().to_string())
            .body(Body::empty())
            .unwrap();
        let response = world.app().oneshot(unknown).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_patch_and_delete_own_entries(#[future] world: World) {
        let world = world.await;
        let app = world.app();
        let body = format!(
            r#"{{"taskId":"{}","workDate":"2024-01-01","minutes":60}}"#,
            world.task.id
        );
        let created = app
            .clone()
            .oneshot(post_json("/time-entries", world.worker.user_id, body))
            .await
            .unwrap();
        let id = json_body(created).await["id"].as_str().unwrap().to_string();

        let patch = Request::patch(format!("/time-entries/{id}"))
            .header("content-type", "application/json")
            .header(ACTOR_HEADER, world.worker.user_id.to_string())
            .body(Body::from(r#"{"minutes":90}"#))
            .unwrap();
        let response = app.clone().oneshot(patch).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["minutes"], 90);

        let delete = Request::delete(format!("/time-entries/{id}"))
            .header(ACTOR_HEADER, world.worker.user_id.to_string())
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(delete).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_return_403_when_pinning_a_foreign_task(#[future] world: World) {
        let world = world.await;
        let body = format!(r#"{{"taskId":"{}"}}"#, world.task.id);
        let response = world
            .app()
            .oneshot(post_json("/timesheet/pins", world.outsider.user_id, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
