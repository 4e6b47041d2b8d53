use crate::modules::datalake::core::buckets::derive_buckets;
use crate::modules::time_entries::core::time_entry::TimeEntry;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Flat, pre-bucketed copy of one time entry. Shares the entry's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatalakeEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub project_id: Uuid,
    pub task_id: Uuid,
    pub date: String,
    pub week: String,
    pub month: String,
    pub year: String,
    pub minutes: i32,
}

impl DatalakeEntry {
    /// `project_id` is denormalized from the entry's task.
    pub fn project(entry: &TimeEntry, project_id: Uuid) -> Self {
        let buckets = derive_buckets(entry.work_date);
        Self {
            id: entry.id,
            user_id: entry.user_id,
            project_id,
            task_id: entry.task_id,
            date: buckets.date,
            week: buckets.week,
            month: buckets.month,
            year: buckets.year,
            minutes: entry.minutes,
        }
    }
}

#[cfg(test)]
mod datalake_entry_tests {
    use super::*;
    use crate::tests::fixtures::make_time_entry_on;
    use rstest::rstest;

    #[rstest]
    fn it_should_copy_the_entry_and_its_buckets() {
        let entry = make_time_entry_on(Uuid::now_v7(), Uuid::now_v7(), "2023-01-02", 120);
        let project_id = Uuid::now_v7();

        let row = DatalakeEntry::project(&entry, project_id);

        assert_eq!(row.id, entry.id);
        assert_eq!(row.project_id, project_id);
        assert_eq!(row.minutes, 120);
        assert_eq!(row.date, "2023-01-02");
        assert_eq!(row.week, "2023-01");
        assert_eq!(row.month, "2023-01");
        assert_eq!(row.year, "2023");
    }
}
