use async_graphql::{
    Context, EmptySubscription, ErrorExtensions, MergedObject, Result as GqlResult, Schema,
};

use crate::modules::reporting::use_cases::aggregate_stats::inbound::graphql::ReportingQuery;
use crate::modules::time_entries::use_cases::update_timesheet_cell::inbound::graphql::TimesheetMutation;
use crate::modules::time_entries::use_cases::weekly_timesheet::inbound::graphql::TimesheetQuery;
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shell::state::AppState;

#[derive(MergedObject, Default)]
pub struct QueryRoot(TimesheetQuery, ReportingQuery);

#[derive(MergedObject, Default)]
pub struct MutationRoot(TimesheetMutation);

pub type AppSchema = Schema<QueryRoot, MutationRoot, EmptySubscription>;

pub fn build_schema(state: AppState) -> AppSchema {
    Schema::build(QueryRoot::default(), MutationRoot::default(), EmptySubscription)
        .data(state)
        .finish()
}

/// Carries the error kind as `extensions.code`.
pub fn gql_error(err: ApplicationError) -> async_graphql::Error {
    let code = err.kind();
    async_graphql::Error::new(err.to_string()).extend_with(|_, e| e.set("code", code))
}

/// The actor attached to the request by the transport.
pub fn acting_user<'a>(context: &Context<'a>) -> GqlResult<&'a Actor> {
    context.data_opt::<Actor>().ok_or_else(|| {
        async_graphql::Error::new("unknown or missing acting user")
            .extend_with(|_, e| e.set("code", "unauthorized"))
    })
}
