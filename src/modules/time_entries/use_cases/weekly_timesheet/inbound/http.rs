use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde::Deserialize;

use crate::shared::core::actor::Actor;
use crate::shared::core::primitives::parse_date;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTimesheetParams {
    pub week_start: String,
}

pub async fn handle(
    State(state): State<AppState>,
    actor: Actor,
    Query(params): Query<WeeklyTimesheetParams>,
) -> impl IntoResponse {
    let week_start = match parse_date("weekStart", &params.week_start) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };

    match state.weekly_timesheet.handle(&actor, week_start).await {
        Ok(view) => Json(view).into_response(),
        Err(err) => err.into_response(),
    }
}
