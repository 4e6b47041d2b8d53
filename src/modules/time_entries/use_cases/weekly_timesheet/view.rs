use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

/// One task row of the weekly grid. `minutes_by_day` has a key for each of
/// the seven days, zero where nothing was logged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetRow {
    pub project_id: Uuid,
    pub project_name: String,
    pub task_id: Uuid,
    pub task_name: String,
    pub is_closed: bool,
    pub minutes_by_day: BTreeMap<String, i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimesheetView {
    pub week_start: String,
    pub days: Vec<String>,
    pub rows: Vec<TimesheetRow>,
    pub totals_by_day: BTreeMap<String, i64>,
    pub total_week: i64,
}
