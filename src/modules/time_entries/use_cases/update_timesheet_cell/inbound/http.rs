use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::TimesheetCell;
use crate::shared::core::actor::Actor;
use crate::shared::core::primitives::parse_date;
use crate::shell::http::malformed_body;
use crate::shell::state::AppState;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCellBody {
    pub task_id: Uuid,
    pub work_date: String,
    pub minutes: i32,
}

pub async fn handle(
    State(state): State<AppState>,
    actor: Actor,
    body: Result<Json<UpdateCellBody>, JsonRejection>,
) -> impl IntoResponse {
    let Json(body) = match body {
        Ok(b) => b,
        Err(rejection) => return malformed_body(rejection),
    };
    let work_date = match parse_date("workDate", &body.work_date) {
        Ok(date) => date,
        Err(err) => return err.into_response(),
    };
    let cell = TimesheetCell {
        task_id: body.task_id,
        work_date,
        minutes: body.minutes,
    };

    match state.timesheet_cells.handle(&actor, cell).await {
        Ok(()) => StatusCode::OK.into_response(),
        Err(err) => err.into_response(),
    }
}
