// Query accumulator for global stats.
//
// Purpose
// - Turn a validated filter into an ordered list of predicates and group-by
//   columns that every backend interprets the same way.
//
// Responsibilities
// - Entity groupings come first, in request order; the period column last.
// - No group-by columns means a single "Total" row.

use crate::modules::datalake::core::datalake_entry::DatalakeEntry;
use crate::modules::reporting::core::filters::{
    DateBucket, EntityGrouping, StatsFilter, TimeGrouping,
};
use crate::shared::core::primitives::format_date;
use chrono::{Datelike, Days, NaiveDate};
use uuid::Uuid;

pub const TOTAL_LABEL: &str = "Total";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsPredicate {
    DateFrom(NaiveDate),
    DateTo(NaiveDate),
    User(Uuid),
    Project(Uuid),
    Task(Uuid),
}

/// Pre-computed bucket column of the datalake.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodColumn {
    Date,
    Week,
    Month,
}

impl PeriodColumn {
    pub fn for_grouping(grouping: TimeGrouping) -> Option<Self> {
        match grouping {
            TimeGrouping::Day => Some(Self::Date),
            TimeGrouping::Week => Some(Self::Week),
            TimeGrouping::Month => Some(Self::Month),
            TimeGrouping::Total => None,
        }
    }

    pub fn column(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    pub fn value_of<'a>(&self, row: &'a DatalakeEntry) -> &'a str {
        match self {
            Self::Date => &row.date,
            Self::Week => &row.week,
            Self::Month => &row.month,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatsColumn {
    ProjectName,
    TaskName,
    UserEmail,
    Period(PeriodColumn),
}

impl StatsColumn {
    /// Name of the output field.
    pub fn alias(&self) -> &'static str {
        match self {
            Self::ProjectName => "projectName",
            Self::TaskName => "taskName",
            Self::UserEmail => "userEmail",
            Self::Period(_) => "period",
        }
    }
}

impl From<EntityGrouping> for StatsColumn {
    fn from(grouping: EntityGrouping) -> Self {
        match grouping {
            EntityGrouping::Project => Self::ProjectName,
            EntityGrouping::Task => Self::TaskName,
            EntityGrouping::User => Self::UserEmail,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatsQuery {
    pub predicates: Vec<StatsPredicate>,
    pub group_by: Vec<StatsColumn>,
}

impl StatsQuery {
    pub fn from_filter(filter: &StatsFilter) -> Self {
        let mut query = Self::default();

        if let Some(from) = filter.from {
            query.predicates.push(StatsPredicate::DateFrom(from));
        }
        if let Some(to) = filter.to {
            query.predicates.push(StatsPredicate::DateTo(to));
        }
        if let Some(user_id) = filter.user_id {
            query.predicates.push(StatsPredicate::User(user_id));
        }
        if let Some(project_id) = filter.project_id {
            query.predicates.push(StatsPredicate::Project(project_id));
        }
        if let Some(task_id) = filter.task_id {
            query.predicates.push(StatsPredicate::Task(task_id));
        }

        for grouping in &filter.group_by {
            let column = StatsColumn::from(*grouping);
            if !query.group_by.contains(&column) {
                query.group_by.push(column);
            }
        }
        if let Some(period) = PeriodColumn::for_grouping(filter.time_grouping) {
            query.group_by.push(StatsColumn::Period(period));
        }

        query
    }

    pub fn is_total(&self) -> bool {
        self.group_by.is_empty()
    }

    pub fn matches(&self, row: &DatalakeEntry) -> bool {
        self.predicates.iter().all(|predicate| match predicate {
            // Zero-padded date strings compare like dates.
            StatsPredicate::DateFrom(from) => row.date >= format_date(*from),
            StatsPredicate::DateTo(to) => row.date <= format_date(*to),
            StatsPredicate::User(id) => row.user_id == *id,
            StatsPredicate::Project(id) => row.project_id == *id,
            StatsPredicate::Task(id) => row.task_id == *id,
        })
    }
}

/// Start of the day, Monday-start week or month containing `date`.
pub fn truncate_date(date: NaiveDate, bucket: DateBucket) -> NaiveDate {
    match bucket {
        DateBucket::Day => date,
        // The first week of the calendar is clamped to its first day.
        DateBucket::Week => date
            .checked_sub_days(Days::new(u64::from(date.weekday().num_days_from_monday())))
            .unwrap_or(NaiveDate::MIN),
        DateBucket::Month => date.with_day(1).unwrap_or(date),
    }
}
