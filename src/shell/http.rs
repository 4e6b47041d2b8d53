use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::{
    Extension, Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, patch, post, put},
};
use serde_json::json;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::modules::directory::use_cases::manage_directory::inbound::http as directory_http;
use crate::modules::reporting::use_cases::aggregate_stats::inbound::http as stats_http;
use crate::modules::reporting::use_cases::time_entry_report::inbound::http as report_http;
use crate::modules::time_entries::use_cases::log_time_entry::inbound::http as entries_http;
use crate::modules::time_entries::use_cases::update_timesheet_cell::inbound::http as cell_http;
use crate::modules::time_entries::use_cases::weekly_timesheet::inbound::http as weekly_http;
use crate::shared::core::errors::ApplicationError;
use crate::shell::actor::resolve_actor;
use crate::shell::graphql::{AppSchema, build_schema};
use crate::shell::state::AppState;

/// Set by the identity provider in front of the service.
pub const ACTOR_HEADER: &str = "x-user-id";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
const GRAPHQL_PATH: &str = "/graphql";

impl IntoResponse for ApplicationError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApplicationError::NotFound(_) => StatusCode::NOT_FOUND,
            ApplicationError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApplicationError::InvalidState(_) => StatusCode::BAD_REQUEST,
            ApplicationError::Conflict(_) => StatusCode::CONFLICT,
            ApplicationError::Validation(_) => StatusCode::BAD_REQUEST,
            ApplicationError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }
        (
            status,
            Json(json!({ "error": self.kind(), "message": self.to_string() })),
        )
            .into_response()
    }
}

pub fn malformed_body(rejection: JsonRejection) -> Response {
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": "malformed_body", "message": rejection.body_text() })),
    )
        .into_response()
}

async fn graphql(
    State(state): State<AppState>,
    Extension(schema): Extension<AppSchema>,
    headers: HeaderMap,
    request: GraphQLRequest,
) -> GraphQLResponse {
    let mut request = request.into_inner();
    let header = headers
        .get(ACTOR_HEADER)
        .and_then(|value| value.to_str().ok());
    match resolve_actor(state.directory.as_ref(), header).await {
        Ok(Some(actor)) => request = request.data(actor),
        Ok(None) => {}
        Err(err) => tracing::warn!(error = %err, "could not resolve graphql actor"),
    }
    schema.execute(request).await.into()
}

async fn graphiql() -> Html<String> {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}

pub fn router(state: AppState) -> Router {
    router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

pub fn router_with_timeout(state: AppState, request_timeout: Duration) -> Router {
    let schema = build_schema(state.clone());

    Router::new()
        .route(
            "/time-entries",
            post(entries_http::create).get(entries_http::list),
        )
        .route(
            "/time-entries/{id}",
            patch(entries_http::update).delete(entries_http::delete),
        )
        .route("/timesheet", get(weekly_http::handle))
        .route("/timesheet/cell", put(cell_http::handle))
        .route("/timesheet/pins", post(entries_http::pin))
        .route(
            "/timesheet/pins/{task_id}",
            axum::routing::delete(entries_http::unpin),
        )
        .route("/reports/stats", get(stats_http::stats))
        .route("/reports/project/{id}/stats", get(stats_http::project_stats))
        .route("/reports/worker/{id}/stats", get(stats_http::worker_stats))
        .route("/reports/time-entries", get(report_http::report))
        .route("/reports/time-entries/export", get(report_http::export))
        .route("/admin/users", post(directory_http::create_user))
        .route("/admin/projects", post(directory_http::create_project))
        .route(
            "/admin/projects/{id}/tasks",
            post(directory_http::create_task),
        )
        .route(
            "/admin/projects/{id}/members",
            post(directory_http::add_member),
        )
        .route(
            "/admin/tasks/{id}/status",
            put(directory_http::set_task_status),
        )
        .route(GRAPHQL_PATH, get(graphiql).post(graphql))
        .layer(Extension(schema))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
