use axum::{
    Json,
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::modules::reporting::adapters::inbound::query_params::QueryParams;
use crate::shared::core::actor::Actor;
use crate::shell::state::AppState;

pub async fn report(
    State(state): State<AppState>,
    actor: Actor,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match QueryParams::new(pairs).report_filter() {
        Ok(filter) => filter,
        Err(err) => return err.into_response(),
    };

    match state.reports.get_report(&actor, filter).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => err.into_response(),
    }
}

pub async fn export(
    State(state): State<AppState>,
    actor: Actor,
    Query(pairs): Query<Vec<(String, String)>>,
) -> impl IntoResponse {
    let filter = match QueryParams::new(pairs).report_filter() {
        Ok(filter) => filter,
        Err(err) => return err.into_response(),
    };

    match state.reports.export_csv(&actor, filter).await {
        Ok(csv) => (
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
                (
                    header::CONTENT_DISPOSITION,
                    "attachment; filename=\"time-entries.csv\"",
                ),
            ],
            csv,
        )
            .into_response(),
        Err(err) => err.into_response(),
    }
}
