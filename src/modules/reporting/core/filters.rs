// Validated query filters for the aggregation engine.
//
// All three filters serialize to the canonical form used as cache key, so
// every field that changes the result must be serialized.

use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::ensure_window;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeGrouping {
    Day,
    Week,
    Month,
    #[default]
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityGrouping {
    Project,
    Task,
    User,
}

/// Bucket a per-entity series is truncated to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateBucket {
    #[default]
    Day,
    Week,
    Month,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportGrouping {
    User,
    Project,
    Task,
    Day,
}

fn unknown(kind: &str, value: &str) -> ApplicationError {
    ApplicationError::validation(format!("unknown {kind} '{value}'"))
}

impl FromStr for TimeGrouping {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "total" | "" => Ok(Self::Total),
            _ => Err(unknown("time grouping", value)),
        }
    }
}

impl FromStr for EntityGrouping {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            "user" => Ok(Self::User),
            _ => Err(unknown("entity grouping", value)),
        }
    }
}

impl FromStr for DateBucket {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "day" | "" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(unknown("date bucket", value)),
        }
    }
}

impl FromStr for ReportGrouping {
    type Err = ApplicationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "user" => Ok(Self::User),
            "project" => Ok(Self::Project),
            "task" => Ok(Self::Task),
            "day" => Ok(Self::Day),
            _ => Err(unknown("report grouping", value)),
        }
    }
}

/// Keeps first occurrences, in order.
pub fn dedup_groupings(groupings: impl IntoIterator<Item = EntityGrouping>) -> Vec<EntityGrouping> {
    let mut unique = Vec::new();
    for grouping in groupings {
        if !unique.contains(&grouping) {
            unique.push(grouping);
        }
    }
    unique
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub time_grouping: TimeGrouping,
    /// Order-sensitive: the first grouping is the first sort key.
    pub group_by: Vec<EntityGrouping>,
}

impl StatsFilter {
    pub fn validated(mut self) -> Result<Self, ApplicationError> {
        ensure_window(self.from, self.to)?;
        self.group_by = dedup_groupings(self.group_by);
        Ok(self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityStatsFilter {
    pub entity_id: Uuid,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub group_by: DateBucket,
}

impl EntityStatsFilter {
    pub fn validated(self) -> Result<Self, ApplicationError> {
        ensure_window(self.from, self.to)?;
        Ok(self)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub user_id: Option<Uuid>,
    pub project_id: Option<Uuid>,
    pub task_id: Option<Uuid>,
    pub group_by: Option<ReportGrouping>,
}

impl ReportFilter {
    pub fn validated(self) -> Result<Self, ApplicationError> {
        ensure_window(self.from, self.to)?;
        Ok(self)
    }
}
