// In memory implementation of the ReportingQueries port.
//
// Purpose
// - Aggregate over snapshots of the in-memory directory, log and datalake so
//   service and end-to-end tests run without a database.
//
// Responsibilities
// - Mirror the SQL adapter: group keys sort ascending with missing labels first.

use crate::modules::datalake::adapters::outbound::datalake_in_memory::InMemoryDatalake;
use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::directory::adapters::outbound::directory_in_memory::{
    DirectorySnapshot, InMemoryDirectory,
};
use crate::modules::reporting::adapters::outbound::reporting_queries::ReportingQueries;
use crate::modules::reporting::core::filters::{EntityStatsFilter, ReportFilter, ReportGrouping};
use crate::modules::reporting::core::rows::{
    ProjectStatsRow, ReportGroupRow, StatsRow, TimeEntryDetail, WorkerStatsRow,
};
use crate::modules::reporting::core::stats_query::{
    StatsColumn, StatsQuery, TOTAL_LABEL, truncate_date,
};
use crate::modules::time_entries::adapters::outbound::time_entry_log_in_memory::InMemoryTimeEntryLog;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::core::primitives::format_date;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::sync::Arc;

pub struct InMemoryReportingQueries {
    directory: Arc<InMemoryDirectory>,
    log: Arc<InMemoryTimeEntryLog>,
    datalake: Arc<InMemoryDatalake>,
}

impl InMemoryReportingQueries {
    pub fn new(
        directory: Arc<InMemoryDirectory>,
        log: Arc<InMemoryTimeEntryLog>,
        datalake: Arc<InMemoryDatalake>,
    ) -> Self {
        Self {
            directory,
            log,
            datalake,
        }
    }

    async fn entries_in_window(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> anyhow::Result<Vec<TimeEntry>> {
        Ok(self
            .log
            .snapshot()
            .await?
            .into_iter()
            .filter(|e| from.is_none_or(|from| e.work_date >= from))
            .filter(|e| to.is_none_or(|to| e.work_date <= to))
            .collect())
    }

    async fn report_rows(
        &self,
        filter: &ReportFilter,
    ) -> anyhow::Result<(DirectorySnapshot, Vec<TimeEntry>)> {
        let labels = self.directory.snapshot().await?;
        let entries = self
            .entries_in_window(filter.from, filter.to)
            .await?
            .into_iter()
            .filter(|e| filter.user_id.is_none_or(|id| e.user_id == id))
            .filter(|e| filter.task_id.is_none_or(|id| e.task_id == id))
            .filter(|e| {
                filter
                    .project_id
                    .is_none_or(|id| labels.project_of_task(e.task_id) == Some(id))
            })
            .collect();
        Ok((labels, entries))
    }
}

fn set_column(row: &mut StatsRow, column: StatsColumn, value: Option<String>) {
    match column {
        StatsColumn::ProjectName => row.project_name = value,
        StatsColumn::TaskName => row.task_name = value,
        StatsColumn::UserEmail => row.user_email = value,
        StatsColumn::Period(_) => row.period = value,
    }
}

#[async_trait::async_trait]
impl ReportingQueries for InMemoryReportingQueries {
    async fn stats(&self, query: &StatsQuery) -> anyhow::Result<Vec<StatsRow>> {
        let labels = self.directory.snapshot().await?;
        let rows = self.datalake.list_all().await?;
        let matching = rows.iter().filter(|row| query.matches(row));

        if query.is_total() {
            return Ok(vec![StatsRow {
                label: Some(TOTAL_LABEL.to_string()),
                total_minutes: matching.map(|row| i64::from(row.minutes)).sum(),
                ..StatsRow::default()
            }]);
        }

        let mut groups: BTreeMap<Vec<Option<String>>, i64> = BTreeMap::new();
        for row in matching {
            let key = query
                .group_by
                .iter()
                .map(|column| match column {
                    StatsColumn::ProjectName => labels.project_name(row.project_id),
                    StatsColumn::TaskName => labels.task_name(row.task_id),
                    StatsColumn::UserEmail => labels.user_email(row.user_id),
                    StatsColumn::Period(period) => Some(period.value_of(row).to_string()),
                })
                .collect();
            *groups.entry(key).or_default() += i64::from(row.minutes);
        }

        Ok(groups
            .into_iter()
            .map(|(key, total_minutes)| {
                let mut out = StatsRow {
                    total_minutes,
                    ..StatsRow::default()
                };
                for (column, value) in query.group_by.iter().zip(key) {
                    set_column(&mut out, *column, value);
                }
                out
            })
            .collect())
    }

    async fn project_stats(
        &self,
        filter: &EntityStatsFilter,
    ) -> anyhow::Result<Vec<ProjectStatsRow>> {
        let labels = self.directory.snapshot().await?;
        let mut groups: BTreeMap<(NaiveDate, Option<String>), i64> = BTreeMap::new();
        for entry in self.entries_in_window(filter.from, filter.to).await? {
            if labels.project_of_task(entry.task_id) != Some(filter.entity_id) {
                continue;
            }
            let key = (
                truncate_date(entry.work_date, filter.group_by),
                labels.user_email(entry.user_id),
            );
            *groups.entry(key).or_default() += i64::from(entry.minutes);
        }
        Ok(groups
            .into_iter()
            .map(|((date, user_email), minutes)| ProjectStatsRow {
                date: format_date(date),
                user_email,
                minutes,
            })
            .collect())
    }

    async fn worker_stats(&self, filter: &EntityStatsFilter) -> anyhow::Result<Vec<WorkerStatsRow>> {
        let labels = self.directory.snapshot().await?;
        let mut groups: BTreeMap<(NaiveDate, Option<String>), i64> = BTreeMap::new();
        for entry in self.entries_in_window(filter.from, filter.to).await? {
            if entry.user_id != filter.entity_id {
                continue;
            }
            let project_name = labels
                .project_of_task(entry.task_id)
                .and_then(|id| labels.project_name(id));
            let key = (truncate_date(entry.work_date, filter.group_by), project_name);
            *groups.entry(key).or_default() += i64::from(entry.minutes);
        }
        Ok(groups
            .into_iter()
            .map(|((date, project_name), minutes)| WorkerStatsRow {
                date: format_date(date),
                project_name,
                minutes,
            })
            .collect())
    }

    async fn report_groups(
        &self,
        filter: &ReportFilter,
        grouping: ReportGrouping,
    ) -> anyhow::Result<Vec<ReportGroupRow>> {
        let (labels, entries) = self.report_rows(filter).await?;
        let mut groups: BTreeMap<String, i64> = BTreeMap::new();
        for entry in entries {
            let group = match grouping {
                ReportGrouping::User => entry.user_id.to_string(),
                ReportGrouping::Project => labels
                    .project_of_task(entry.task_id)
                    .map(|id| id.to_string())
                    .unwrap_or_default(),
                ReportGrouping::Task => entry.task_id.to_string(),
                ReportGrouping::Day => format_date(entry.work_date),
            };
            *groups.entry(group).or_default() += i64::from(entry.minutes);
        }
        Ok(groups
            .into_iter()
            .map(|(group, total_minutes)| ReportGroupRow {
                group,
                total_minutes,
            })
            .collect())
    }

    async fn report_entries(&self, filter: &ReportFilter) -> anyhow::Result<Vec<TimeEntryDetail>> {
        let (labels, mut entries) = self.report_rows(filter).await?;
        entries.sort_by(|a, b| b.work_date.cmp(&a.work_date).then(a.id.cmp(&b.id)));
        Ok(entries
            .into_iter()
            .map(|entry| {
                let project_id = labels.project_of_task(entry.task_id);
                TimeEntryDetail {
                    id: entry.id,
                    work_date: format_date(entry.work_date),
                    minutes: entry.minutes,
                    notes: entry.notes,
                    user_id: entry.user_id,
                    user_email: labels.user_email(entry.user_id),
                    project_id,
                    project_name: project_id.and_then(|id| labels.project_name(id)),
                    task_id: entry.task_id,
                    task_name: labels.task_name(entry.task_id),
                }
            })
            .collect())
    }
}
