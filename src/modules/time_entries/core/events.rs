use crate::modules::time_entries::core::time_entry::TimeEntry;
use crate::shared::infrastructure::event_bus::Topic;
use uuid::Uuid;

pub const TIME_ENTRY_CREATED: &str = "time-entry.created";
pub const TIME_ENTRY_UPDATED: &str = "time-entry.updated";
pub const TIME_ENTRY_DELETED: &str = "time-entry.deleted";

/// Emitted after a log mutation is committed. `Deleted` carries the row as it
/// was before removal.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", content = "entry")]
pub enum TimeEntryChanged {
    Created(TimeEntry),
    Updated(TimeEntry),
    Deleted(TimeEntry),
}

impl TimeEntryChanged {
    pub fn entry(&self) -> &TimeEntry {
        match self {
            TimeEntryChanged::Created(entry)
            | TimeEntryChanged::Updated(entry)
            | TimeEntryChanged::Deleted(entry) => entry,
        }
    }

    pub fn entry_id(&self) -> Uuid {
        self.entry().id
    }
}

impl Topic for TimeEntryChanged {
    fn topic(&self) -> &'static str {
        match self {
            TimeEntryChanged::Created(_) => TIME_ENTRY_CREATED,
            TimeEntryChanged::Updated(_) => TIME_ENTRY_UPDATED,
            TimeEntryChanged::Deleted(_) => TIME_ENTRY_DELETED,
        }
    }
}
