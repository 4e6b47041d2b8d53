use async_graphql::SimpleObject;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One aggregate row of global stats. Only the requested group columns are set;
/// `label` is set only on the ungrouped "Total" row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, SimpleObject)]
#[serde(rename_all = "camelCase")]
pub struct StatsRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub total_minutes: i64,
}

/// `date` is the start of the bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectStatsRow {
    pub date: String,
    pub user_email: Option<String>,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkerStatsRow {
    pub date: String,
    pub project_name: Option<String>,
    pub minutes: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportGroupRow {
    pub group: String,
    pub total_minutes: i64,
}

/// A log entry with its task, project and user labels resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeEntryDetail {
    pub id: Uuid,
    pub work_date: String,
    pub minutes: i32,
    pub notes: Option<String>,
    pub user_id: Uuid,
    pub user_email: Option<String>,
    pub project_id: Option<Uuid>,
    pub project_name: Option<String>,
    pub task_id: Uuid,
    pub task_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Report {
    Grouped(Vec<ReportGroupRow>),
    Detailed(Vec<TimeEntryDetail>),
}
