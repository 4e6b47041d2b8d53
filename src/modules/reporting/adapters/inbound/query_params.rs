// Query string parsing for the report routes.
//
// `groupBy` is accepted repeated (`groupBy=a&groupBy=b`), in bracket form
// (`groupBy[]=a`) and comma-separated (`groupBy=a,b`), so the pairs are read
// raw instead of through a derived struct.

use crate::modules::reporting::core::filters::{
    DateBucket, EntityGrouping, EntityStatsFilter, ReportFilter, ReportGrouping, StatsFilter,
    TimeGrouping,
};
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::parse_optional_date;
use chrono::NaiveDate;
use uuid::Uuid;

pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    pub fn new(pairs: Vec<(String, String)>) -> Self {
        Self { pairs }
    }

    fn last(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .rev()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .filter(|value| !value.trim().is_empty())
    }

    /// Every value of `name` and `name[]`, split on commas.
    fn all(&self, name: &str) -> Vec<&str> {
        let bracketed = format!("{name}[]");
        self.pairs
            .iter()
            .filter(|(key, _)| key == name || *key == bracketed)
            .flat_map(|(_, value)| value.split(','))
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .collect()
    }

    fn date(&self, name: &str) -> Result<Option<NaiveDate>, ApplicationError> {
        parse_optional_date(name, self.last(name))
    }

    fn uuid(&self, name: &str) -> Result<Option<Uuid>, ApplicationError> {
        self.last(name)
            .map(|raw| {
                Uuid::parse_str(raw.trim()).map_err(|_| {
                    ApplicationError::validation(format!("{name} must be a UUID, got '{raw}'"))
                })
            })
            .transpose()
    }

    pub fn stats_filter(&self) -> Result<StatsFilter, ApplicationError> {
        let group_by = self
            .all("groupBy")
            .into_iter()
            .map(str::parse::<EntityGrouping>)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(StatsFilter {
            from: self.date("from")?,
            to: self.date("to")?,
            user_id: self.uuid("userId")?,
            project_id: self.uuid("projectId")?,
            task_id: self.uuid("taskId")?,
            time_grouping: self
                .last("timeGrouping")
                .map(str::parse::<TimeGrouping>)
                .transpose()?
                .unwrap_or_default(),
            group_by,
        })
    }

    pub fn entity_stats_filter(&self, entity_id: Uuid) -> Result<EntityStatsFilter, ApplicationError> {
        Ok(EntityStatsFilter {
            entity_id,
            from: self.date("from")?,
            to: self.date("to")?,
            group_by: self
                .last("groupBy")
                .map(str::parse::<DateBucket>)
                .transpose()?
                .unwrap_or_default(),
        })
    }

    pub fn report_filter(&self) -> Result<ReportFilter, ApplicationError> {
        Ok(ReportFilter {
            from: self.date("from")?,
            to: self.date("to")?,
            user_id: self.uuid("userId")?,
            project_id: self.uuid("projectId")?,
            task_id: self.uuid("taskId")?,
            group_by: self
                .last("groupBy")
                .map(str::parse::<ReportGrouping>)
                .transpose()?,
        })
    }
}
