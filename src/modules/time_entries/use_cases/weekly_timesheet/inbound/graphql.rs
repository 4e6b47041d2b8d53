use async_graphql::{Context, Json, Object, Result as GqlResult};

use crate::modules::time_entries::use_cases::weekly_timesheet::view::TimesheetView;
use crate::shared::core::primitives::parse_date;
use crate::shell::graphql::{acting_user, gql_error};
use crate::shell::state::AppState;

#[derive(Default)]
pub struct TimesheetQuery;

#[Object]
impl TimesheetQuery {
    /// The acting user's grid for the seven days from `week_start`.
    async fn weekly_timesheet(
        &self,
        context: &Context<'_>,
        week_start: String,
    ) -> GqlResult<Json<TimesheetView>> {
        let actor = acting_user(context)?;
        let state = context.data_unchecked::<AppState>();
        let week_start = parse_date("weekStart", &week_start).map_err(gql_error)?;

        state
            .weekly_timesheet
            .handle(actor, week_start)
            .await
            .map(Json)
            .map_err(gql_error)
    }
}
