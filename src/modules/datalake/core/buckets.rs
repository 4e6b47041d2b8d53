use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Pre-computed grouping keys of one work date.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Buckets {
    /// `YYYY-MM-DD`
    pub date: String,
    /// ISO week, `YYYY-WW`, using the ISO week-year.
    pub week: String,
    /// `YYYY-MM`
    pub month: String,
    /// `YYYY`
    pub year: String,
}

pub fn derive_buckets(work_date: NaiveDate) -> Buckets {
    let iso = work_date.iso_week();
    Buckets {
        date: work_date.format("%Y-%m-%d").to_string(),
        week: format!("{:04}-{:02}", iso.year(), iso.week()),
        month: format!("{:04}-{:02}", work_date.year(), work_date.month()),
        year: format!("{:04}", work_date.year()),
    }
}
