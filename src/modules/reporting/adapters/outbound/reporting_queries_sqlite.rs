// SQLite implementation of the ReportingQueries port.
//
// Purpose
// - Translate the query accumulator and report filters into grouped SQL.
//
// Responsibilities
// - Global stats read `datalake_entries`, labels joined from the collaborator tables.
// - Per-entity stats and reports read `time_entries` joined to task, project and user.
// - Date truncation for per-entity series lives in `bucket_expression` only.
// - Ascending SQLite order puts NULL labels first, like the in-memory adapter.

use crate::modules::reporting::adapters::outbound::reporting_queries::ReportingQueries;
use crate::modules::reporting::core::filters::{
    DateBucket, EntityStatsFilter, ReportFilter, ReportGrouping,
};
use crate::modules::reporting::core::rows::{
    ProjectStatsRow, ReportGroupRow, StatsRow, TimeEntryDetail, WorkerStatsRow,
};
use crate::modules::reporting::core::stats_query::{
    PeriodColumn, StatsColumn, StatsPredicate, StatsQuery, TOTAL_LABEL,
};
use crate::shared::core::primitives::format_date;
use chrono::NaiveDate;
use sqlx::{FromRow, QueryBuilder, Sqlite, SqlitePool};
use uuid::Uuid;

const STATS_COLUMNS: [StatsColumn; 4] = [
    StatsColumn::Period(PeriodColumn::Date),
    StatsColumn::ProjectName,
    StatsColumn::TaskName,
    StatsColumn::UserEmail,
];

const ENTRY_JOINS: &str = " FROM time_entries e \
     LEFT JOIN tasks t ON t.id = e.task_id \
     LEFT JOIN projects p ON p.id = t.project_id \
     LEFT JOIN users u ON u.id = e.user_id";

/// Start of the bucket containing `e.work_date`, as `YYYY-MM-DD` text.
fn bucket_expression(bucket: DateBucket) -> &'static str {
    match bucket {
        DateBucket::Day => "e.work_date",
        DateBucket::Week => "date(e.work_date, '-6 days', 'weekday 1')",
        DateBucket::Month => "strftime('%Y-%m-01', e.work_date)",
    }
}

fn stats_expression(column: StatsColumn) -> &'static str {
    match column {
        StatsColumn::ProjectName => "p.name",
        StatsColumn::TaskName => "t.name",
        StatsColumn::UserEmail => "u.email",
        StatsColumn::Period(period) => match period {
            PeriodColumn::Date => "d.date",
            PeriodColumn::Week => "d.week",
            PeriodColumn::Month => "d.month",
        },
    }
}

fn report_group_expression(grouping: ReportGrouping) -> &'static str {
    match grouping {
        ReportGrouping::User => "e.user_id",
        ReportGrouping::Project => "t.project_id",
        ReportGrouping::Task => "e.task_id",
        ReportGrouping::Day => "e.work_date",
    }
}

#[derive(Debug, FromRow)]
#[sqlx(rename_all = "camelCase")]
struct StatsRecord {
    period: Option<String>,
    project_name: Option<String>,
    task_name: Option<String>,
    user_email: Option<String>,
    total_minutes: i64,
}

#[derive(Debug, FromRow)]
struct SeriesRecord {
    date: String,
    label: Option<String>,
    minutes: i64,
}

#[derive(Debug, FromRow)]
struct ReportGroupRecord {
    group_id: Option<Uuid>,
    group_day: Option<NaiveDate>,
    total_minutes: i64,
}

#[derive(Debug, FromRow)]
struct EntryDetailRecord {
    id: Uuid,
    work_date: NaiveDate,
    minutes: i32,
    notes: Option<String>,
    user_id: Uuid,
    user_email: Option<String>,
    project_id: Option<Uuid>,
    project_name: Option<String>,
    task_id: Uuid,
    task_name: Option<String>,
}

impl From<EntryDetailRecord> for TimeEntryDetail {
    fn from(record: EntryDetailRecord) -> Self {
        TimeEntryDetail {
            id: record.id,
            work_date: format_date(record.work_date),
            minutes: record.minutes,
            notes: record.notes,
            user_id: record.user_id,
            user_email: record.user_email,
            project_id: record.project_id,
            project_name: record.project_name,
            task_id: record.task_id,
            task_name: record.task_name,
        }
    }
}

fn push_window<'a>(
    builder: &mut QueryBuilder<'a, Sqlite>,
    column: &str,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) {
    if let Some(from) = from {
        builder.push(format!(" AND {column} >= ")).push_bind(from);
    }
    if let Some(to) = to {
        builder.push(format!(" AND {column} <= ")).push_bind(to);
    }
}

fn push_report_filter<'a>(builder: &mut QueryBuilder<'a, Sqlite>, filter: &ReportFilter) {
    builder.push(" WHERE 1=1");
    push_window(builder, "e.work_date", filter.from, filter.to);
    if let Some(user_id) = filter.user_id {
        builder.push(" AND e.user_id = ").push_bind(user_id);
    }
    if let Some(project_id) = filter.project_id {
        builder.push(" AND t.project_id = ").push_bind(project_id);
    }
    if let Some(task_id) = filter.task_id {
        builder.push(" AND e.task_id = ").push_bind(task_id);
    }
}

pub struct SqliteReportingQueries {
    pool: SqlitePool,
}

impl SqliteReportingQueries {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn series(
        &self,
        bucket: DateBucket,
        label: &str,
        entity_column: &str,
        filter: &EntityStatsFilter,
    ) -> anyhow::Result<Vec<SeriesRecord>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {} AS date, {label} AS label, SUM(e.minutes) AS minutes",
            bucket_expression(bucket)
        ));
        builder.push(ENTRY_JOINS);
        builder
            .push(format!(" WHERE {entity_column} = "))
            .push_bind(filter.entity_id);
        push_window(&mut builder, "e.work_date", filter.from, filter.to);
        builder.push(" GROUP BY 1, 2 ORDER BY 1, 2");

        Ok(builder
            .build_query_as::<SeriesRecord>()
            .fetch_all(&self.pool)
            .await?)
    }
}

#[async_trait::async_trait]
impl ReportingQueries for SqliteReportingQueries {
    async fn stats(&self, query: &StatsQuery) -> anyhow::Result<Vec<StatsRow>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new("SELECT ");
        for slot in STATS_COLUMNS {
            let grouped = query.group_by.iter().find(|column| match (column, slot) {
                (StatsColumn::Period(_), StatsColumn::Period(_)) => true,
                _ => **column == slot,
            });
            let expression = grouped.map(|column| stats_expression(*column)).unwrap_or("NULL");
            builder.push(format!("{expression} AS \"{}\", ", slot.alias()));
        }
        builder.push("COALESCE(SUM(d.minutes), 0) AS \"totalMinutes\"");
        builder.push(
            " FROM datalake_entries d \
             LEFT JOIN projects p ON p.id = d.project_id \
             LEFT JOIN tasks t ON t.id = d.task_id \
             LEFT JOIN users u ON u.id = d.user_id \
             WHERE 1=1",
        );
        for predicate in &query.predicates {
            match predicate {
                StatsPredicate::DateFrom(from) => {
                    builder.push(" AND d.date >= ").push_bind(format_date(*from));
                }
                StatsPredicate::DateTo(to) => {
                    builder.push(" AND d.date <= ").push_bind(format_date(*to));
                }
                StatsPredicate::User(id) => {
                    builder.push(" AND d.user_id = ").push_bind(*id);
                }
                StatsPredicate::Project(id) => {
                    builder.push(" AND d.project_id = ").push_bind(*id);
                }
                StatsPredicate::Task(id) => {
                    builder.push(" AND d.task_id = ").push_bind(*id);
                }
            }
        }

        if !query.is_total() {
            let columns: Vec<&str> = query.group_by.iter().map(|c| stats_expression(*c)).collect();
            let columns = columns.join(", ");
            builder.push(format!(" GROUP BY {columns} ORDER BY {columns}"));
        }

        let records = builder
            .build_query_as::<StatsRecord>()
            .fetch_all(&self.pool)
            .await?;

        if query.is_total() {
            let total_minutes = records.first().map(|r| r.total_minutes).unwrap_or(0);
            return Ok(vec![StatsRow {
                label: Some(TOTAL_LABEL.to_string()),
                total_minutes,
                ..StatsRow::default()
            }]);
        }

        Ok(records
            .into_iter()
            .map(|record| StatsRow {
                period: record.period,
                project_name: record.project_name,
                task_name: record.task_name,
                user_email: record.user_email,
                label: None,
                total_minutes: record.total_minutes,
            })
            .collect())
    }

    async fn project_stats(
        &self,
        filter: &EntityStatsFilter,
    ) -> anyhow::Result<Vec<ProjectStatsRow>> {
        let records = self
            .series(filter.group_by, "u.email", "t.project_id", filter)
            .await?;
        Ok(records
            .into_iter()
            .map(|r| ProjectStatsRow {
                date: r.date,
                user_email: r.label,
                minutes: r.minutes,
            })
            .collect())
    }

    async fn worker_stats(&self, filter: &EntityStatsFilter) -> anyhow::Result<Vec<WorkerStatsRow>> {
        let records = self
            .series(filter.group_by, "p.name", "e.user_id", filter)
            .await?;
        Ok(records
            .into_iter()
            .map(|r| WorkerStatsRow {
                date: r.date,
                project_name: r.label,
                minutes: r.minutes,
            })
            .collect())
    }

    async fn report_groups(
        &self,
        filter: &ReportFilter,
        grouping: ReportGrouping,
    ) -> anyhow::Result<Vec<ReportGroupRow>> {
        let expression = report_group_expression(grouping);
        let (id_column, day_column) = match grouping {
            ReportGrouping::Day => ("NULL", expression),
            _ => (expression, "NULL"),
        };
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {id_column} AS group_id, {day_column} AS group_day, \
             SUM(e.minutes) AS total_minutes"
        ));
        builder.push(ENTRY_JOINS);
        push_report_filter(&mut builder, filter);
        builder.push(format!(" GROUP BY {expression} ORDER BY {expression}"));

        let records = builder
            .build_query_as::<ReportGroupRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records
            .into_iter()
            .map(|record| ReportGroupRow {
                group: record
                    .group_id
                    .map(|id| id.to_string())
                    .or(record.group_day.map(format_date))
                    .unwrap_or_default(),
                total_minutes: record.total_minutes,
            })
            .collect())
    }

    async fn report_entries(&self, filter: &ReportFilter) -> anyhow::Result<Vec<TimeEntryDetail>> {
        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
            "SELECT e.id, e.work_date, e.minutes, e.notes, e.user_id, u.email AS user_email, \
             t.project_id, p.name AS project_name, e.task_id, t.name AS task_name",
        );
        builder.push(ENTRY_JOINS);
        push_report_filter(&mut builder, filter);
        builder.push(" ORDER BY e.work_date DESC, e.id ASC");

        let records = builder
            .build_query_as::<EntryDetailRecord>()
            .fetch_all(&self.pool)
            .await?;
        Ok(records.into_iter().map(TimeEntryDetail::from).collect())
    }
}
