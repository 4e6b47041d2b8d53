use async_graphql::{Context, ID, Object, Result as GqlResult};
use uuid::Uuid;

use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::TimesheetCell;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::parse_date;
use crate::shell::graphql::{acting_user, gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct TimesheetMutation;

#[Object]
impl TimesheetMutation {
    async fn update_timesheet_cell(
        &self,
        context: &Context<'_>,
        task_id: ID,
        work_date: String,
        minutes: i32,
    ) -> GqlResult<bool> {
        let actor = acting_user(context)?;
        let state = context.data_unchecked::<AppState>();

        let task_id = Uuid::parse_str(&task_id)
            .map_err(|_| gql_error(ApplicationError::validation("taskId must be a UUID")))?;
        let work_date = parse_date("workDate", &work_date).map_err(gql_error)?;

        state
            .timesheet_cells
            .handle(
                actor,
                TimesheetCell {
                    task_id,
                    work_date,
                    minutes,
                },
            )
            .await
            .map_err(gql_error)?;
        Ok(true)
    }
}
