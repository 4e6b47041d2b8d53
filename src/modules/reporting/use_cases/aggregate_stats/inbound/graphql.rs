use async_graphql::{Context, InputObject, Object, Result as GqlResult};

use crate::modules::reporting::core::filters::{EntityGrouping, StatsFilter, TimeGrouping};
use crate::modules::reporting::core::rows::StatsRow;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::parse_optional_date;
use crate::shell::graphql::{acting_user, gql_error};
use crate::shell::state::AppState;

#[derive(InputObject, Default)]
pub struct StatsFilterInput {
    pub from: Option<String>,
    pub to: Option<String>,
    pub user_id: Option<String>,
    pub project_id: Option<String>,
    pub task_id: Option<String>,
    pub time_grouping: Option<String>,
    pub group_by: Option<Vec<String>>,
}

fn parse_id(field: &str, raw: Option<&str>) -> Result<Option<uuid::Uuid>, ApplicationError> {
    raw.map(|value| {
        uuid::Uuid::parse_str(value.trim())
            .map_err(|_| ApplicationError::validation(format!("{field} must be a UUID")))
    })
    .transpose()
}

impl StatsFilterInput {
    fn into_filter(self) -> Result<StatsFilter, ApplicationError> {
        Ok(StatsFilter {
            from: parse_optional_date("from", self.from.as_deref())?,
            to: parse_optional_date("to", self.to.as_deref())?,
            user_id: parse_id("userId", self.user_id.as_deref())?,
            project_id: parse_id("projectId", self.project_id.as_deref())?,
            task_id: parse_id("taskId", self.task_id.as_deref())?,
            time_grouping: self
                .time_grouping
                .as_deref()
                .map(str::parse::<TimeGrouping>)
                .transpose()?
                .unwrap_or_default(),
            group_by: self
                .group_by
                .unwrap_or_default()
                .iter()
                .map(|raw| raw.parse::<EntityGrouping>())
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

#[derive(Default)]
pub struct ReportingQuery;

#[Object]
impl ReportingQuery {
    async fn stats(
        &self,
        context: &Context<'_>,
        filter: Option<StatsFilterInput>,
    ) -> GqlResult<Vec<StatsRow>> {
        let actor = acting_user(context)?;
        let state = context.data_unchecked::<AppState>();
        let filter = filter
            .unwrap_or_default()
            .into_filter()
            .map_err(gql_error)?;

        state
            .reporting
            .get_stats(actor, filter)
            .await
            .map_err(gql_error)
    }
}
