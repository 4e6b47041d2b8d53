// Read port of the aggregation engine.
//
// Purpose
// - Run grouped, filtered and bucketed sums without the service knowing the backend.
//
// Responsibilities
// - `stats` reads the datalake projection.
// - Per-entity stats and reports read the log joined to task, project and user.
// - Sums are integers and zero on empty input.

use crate::modules::reporting::core::filters::{EntityStatsFilter, ReportFilter, ReportGrouping};
use crate::modules::reporting::core::rows::{
    ProjectStatsRow, ReportGroupRow, StatsRow, TimeEntryDetail, WorkerStatsRow,
};
use crate::modules::reporting::core::stats_query::StatsQuery;
use async_trait::async_trait;

#[async_trait]
pub trait ReportingQueries: Send + Sync {
    /// Rows ordered by the group columns ascending, first column first.
    async fn stats(&self, query: &StatsQuery) -> anyhow::Result<Vec<StatsRow>>;
    /// `entity_id` is the project. Ordered by date, then user email.
    async fn project_stats(&self, filter: &EntityStatsFilter)
    -> anyhow::Result<Vec<ProjectStatsRow>>;
    /// `entity_id` is the user. Ordered by date, then project name.
    async fn worker_stats(&self, filter: &EntityStatsFilter) -> anyhow::Result<Vec<WorkerStatsRow>>;
    async fn report_groups(
        &self,
        filter: &ReportFilter,
        grouping: ReportGrouping,
    ) -> anyhow::Result<Vec<ReportGroupRow>>;
    /// Newest work date first.
    async fn report_entries(&self, filter: &ReportFilter) -> anyhow::Result<Vec<TimeEntryDetail>>;
}
