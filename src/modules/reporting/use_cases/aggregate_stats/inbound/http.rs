use axum::{
    Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use uuid::Uuid;

use crate::modules::reporting::adapters::inbound::query_params::QueryParams;
use crate::shared::core::actor::Actor;
use crate::shell::state::AppState;

pub async fn stats(
    State(state): State<AppState>,
    actor: Actor,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match QueryParams::new(pairs).stats_filter() {
        Ok(filter) => filter,
        Err(err) => return err.into_response(),
    };

    match state.reporting.get_stats(&actor, filter).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn project_stats(
    State(state): State<AppState>,
    actor: Actor,
    Path(project_id): Path<Uuid>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match QueryParams::new(pairs).entity_stats_filter(project_id) {
        Ok(filter) => filter,
        Err(err) => return err.into_response(),
    };

    match state.reporting.get_project_stats(&actor, filter).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn worker_stats(
    State(state): State<AppState>,
    actor: Actor,
    Path(user_id): Path<Uuid>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match QueryParams::new(pairs).entity_stats_filter(user_id) {
        Ok(filter) => filter,
        Err(err) => return err.into_response(),
    };

    match state.reporting.get_worker_stats(&actor, filter).await {
        Ok(rows) => Json(rows).into_response(),
        Err(err) => err.into_response(),
    }
}
