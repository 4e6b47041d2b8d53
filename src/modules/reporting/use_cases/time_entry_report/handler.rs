// Raw report over the joined log, grouped or detailed, plus its CSV export.

use crate::modules::reporting::adapters::outbound::reporting_queries::ReportingQueries;
use crate::modules::reporting::core::csv;
use crate::modules::reporting::core::filters::ReportFilter;
use crate::modules::reporting::core::rows::Report;
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use std::sync::Arc;
use tracing::instrument;

pub struct TimeEntryReportHandler {
    queries: Arc<dyn ReportingQueries>,
}

impl TimeEntryReportHandler {
    pub fn new(queries: Arc<dyn ReportingQueries>) -> Self {
        Self { queries }
    }

    #[instrument(skip(self, filter), fields(user_id = %actor.user_id))]
    pub async fn get_report(
        &self,
        actor: &Actor,
        filter: ReportFilter,
    ) -> Result<Report, ApplicationError> {
        actor.require_admin()?;
        let filter = filter.validated()?;
        match filter.group_by {
            Some(grouping) => Ok(Report::Grouped(
                self.queries.report_groups(&filter, grouping).await?,
            )),
            None => Ok(Report::Detailed(self.queries.report_entries(&filter).await?)),
        }
    }

    /// Always the detailed feed; `group_by` is ignored.
    #[instrument(skip(self, filter), fields(user_id = %actor.user_id))]
    pub async fn export_csv(
        &self,
        actor: &Actor,
        filter: ReportFilter,
    ) -> Result<String, ApplicationError> {
        actor.require_admin()?;
        let filter = filter.validated()?;
        let entries = self.queries.report_entries(&filter).await?;
        Ok(csv::render(&entries))
    }
}

#[cfg(test)]
mod time_entry_report_handler_tests {
    use super::*;
    use crate::modules::reporting::core::filters::ReportGrouping;
    use crate::tests::fixtures::{World, world};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_list_details_newest_first(#[future] world: World) {
        let world = world.await;
        world.log_minutes(&world.worker, world.task.id, "2024-01-01", 60).await;
        world.log_minutes(&world.worker, world.global_task.id, "2024-01-03", 30).await;

        let report = world
            .reports
            .get_report(&world.admin, ReportFilter::default())
            .await
            .unwrap();

        let Report::Detailed(rows) = report else {
            panic!("expected a detailed report");
        };
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].work_date, "2024-01-03");
        assert_eq!(rows[0].task_name.as_deref(), Some("Meetings"));
        assert_eq!(rows[1].project_name.as_deref(), Some("Apollo"));
        assert_eq!(rows[1].user_email.as_deref(), Some("worker@example.com"));
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_group_by_day(#[future] world: World) {
        let world = world.await;
        world.log_minutes(&world.worker, world.task.id, "2024-01-02", 60).await;
        world.log_minutes(&world.worker, world.global_task.id, "2024-01-02", 30).await;
        world.log_minutes(&world.worker, world.task.id, "2024-01-01", 15).await;

        let report = world
            .reports
            .get_report(
                &world.admin,
                ReportFilter {
                    group_by: Some(ReportGrouping::Day),
                    ..ReportFilter::default()
                },
            )
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"group": "2024-01-01", "totalMinutes": 15},
                {"group": "2024-01-02", "totalMinutes": 90},
            ])
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_filter_by_project(#[future] world: World) {
        let world = world.await;
        world.log_minutes(&world.worker, world.task.id, "2024-01-01", 60).await;
        world.log_minutes(&world.worker, world.global_task.id, "2024-01-01", 30).await;

        let report = world
            .reports
            .get_report(
                &world.admin,
                ReportFilter {
                    project_id: Some(world.global_project.id),
                    group_by: Some(ReportGrouping::Project),
                    ..ReportFilter::default()
                },
            )
            .await
            .unwrap();

        let Report::Grouped(rows) = report else {
            panic!("expected a grouped report");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group, world.global_project.id.to_string());
        assert_eq!(rows[0].total_minutes, 30);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_export_csv_for_admins_only(#[future] world: World) {
        let world = world.await;
        world.log_minutes(&world.worker, world.task.id, "2024-01-01", 90).await;

        let csv = world
            .reports
            .export_csv(&world.admin, ReportFilter::default())
            .await
            .unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some(csv::CSV_HEADER));
        assert!(lines.next().unwrap().contains(",Apollo,"));

        let denied = world
            .reports
            .export_csv(&world.worker, ReportFilter::default())
            .await;
        assert_eq!(denied.unwrap_err().kind(), "forbidden");
    }
}
