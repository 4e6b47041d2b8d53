// Wiring of adapters into use case handlers.
//
// Responsibilities
// - Pick in-memory or SQLite adapters behind the ports.
// - Subscribe the datalake projector to the change notifier before any write.

use crate::modules::datalake::adapters::outbound::datalake_in_memory::InMemoryDatalake;
use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::datalake::adapters::outbound::datalake_sqlite::SqliteDatalake;
use crate::modules::datalake::use_cases::project_time_entries::projector::DatalakeProjector;
use crate::modules::datalake::use_cases::rebuild_datalake::handler::RebuildDatalakeHandler;
use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::adapters::outbound::directory_in_memory::InMemoryDirectory;
use crate::modules::directory::adapters::outbound::directory_sqlite::SqliteDirectory;
use crate::modules::directory::use_cases::manage_directory::handler::DirectoryAdminHandler;
use crate::modules::reporting::adapters::outbound::reporting_queries::ReportingQueries;
use crate::modules::reporting::adapters::outbound::reporting_queries_in_memory::InMemoryReportingQueries;
use crate::modules::reporting::adapters::outbound::reporting_queries_sqlite::SqliteReportingQueries;
use crate::modules::reporting::use_cases::aggregate_stats::handler::ReportingService;
use crate::modules::reporting::use_cases::time_entry_report::handler::TimeEntryReportHandler;
use crate::modules::time_entries::adapters::outbound::time_entry_log::TimeEntryLog;
use crate::modules::time_entries::adapters::outbound::time_entry_log_in_memory::InMemoryTimeEntryLog;
use crate::modules::time_entries::adapters::outbound::time_entry_log_sqlite::SqliteTimeEntryLog;
use crate::modules::time_entries::core::events::TimeEntryChanged;
use crate::modules::time_entries::use_cases::log_time_entry::handler::TimeEntryHandler;
use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::UpdateTimesheetCellHandler;
use crate::modules::time_entries::use_cases::weekly_timesheet::handler::WeeklyTimesheetHandler;
use crate::shared::infrastructure::aggregate_cache::{AggregateCache, CachePolicy};
use crate::shared::infrastructure::aggregate_cache::in_memory::InMemoryAggregateCache;
use crate::shared::infrastructure::event_bus::ChangeNotifier;
use crate::shared::infrastructure::event_bus::in_process::InProcessEventBus;
use crate::shared::infrastructure::sqlite::SqliteStore;
use std::sync::Arc;

pub const DATALAKE_PROJECTOR: &str = "datalake_projector";

/// Storage behind every port.
#[derive(Clone)]
pub struct Backends {
    pub directory: Arc<dyn Directory>,
    pub log: Arc<dyn TimeEntryLog>,
    pub datalake: Arc<dyn DatalakeRepository>,
    pub queries: Arc<dyn ReportingQueries>,
    pub cache: Arc<dyn AggregateCache>,
    pub bus: Arc<dyn ChangeNotifier<TimeEntryChanged>>,
}

impl Backends {
    pub fn in_memory() -> Self {
        let directory = Arc::new(InMemoryDirectory::new());
        let log = Arc::new(InMemoryTimeEntryLog::new());
        let datalake = Arc::new(InMemoryDatalake::new());
        let queries = Arc::new(InMemoryReportingQueries::new(
            directory.clone(),
            log.clone(),
            datalake.clone(),
        ));
        Self {
            directory,
            log,
            datalake,
            queries,
            cache: Arc::new(InMemoryAggregateCache::new()),
            bus: Arc::new(InProcessEventBus::<TimeEntryChanged>::new()),
        }
    }

    pub fn sqlite(store: &SqliteStore) -> Self {
        Self {
            directory: Arc::new(SqliteDirectory::new(store.pool.clone())),
            log: Arc::new(SqliteTimeEntryLog::new(store.pool.clone())),
            datalake: Arc::new(SqliteDatalake::new(store.pool.clone())),
            queries: Arc::new(SqliteReportingQueries::new(store.pool.clone())),
            cache: Arc::new(InMemoryAggregateCache::new()),
            bus: Arc::new(InProcessEventBus::<TimeEntryChanged>::new()),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub directory: Arc<dyn Directory>,
    pub time_entries: Arc<TimeEntryHandler>,
    pub timesheet_cells: Arc<UpdateTimesheetCellHandler>,
    pub weekly_timesheet: Arc<WeeklyTimesheetHandler>,
    pub reporting: Arc<ReportingService>,
    pub reports: Arc<TimeEntryReportHandler>,
    pub directory_admin: Arc<DirectoryAdminHandler>,
    pub rebuild: Arc<RebuildDatalakeHandler>,
}

impl AppState {
    pub async fn assemble(backends: Backends, policy: CachePolicy, batch_size: u64) -> Self {
        let Backends {
            directory,
            log,
            datalake,
            queries,
            cache,
            bus,
        } = backends;

        let projector = DatalakeProjector::new(
            DATALAKE_PROJECTOR,
            log.clone(),
            directory.clone(),
            datalake.clone(),
        );
        bus.subscribe(Arc::new(projector)).await;

        let time_entries = Arc::new(TimeEntryHandler::new(
            directory.clone(),
            log.clone(),
            bus,
        ));

        Self {
            timesheet_cells: Arc::new(UpdateTimesheetCellHandler::new(time_entries.clone())),
            weekly_timesheet: Arc::new(WeeklyTimesheetHandler::new(
                directory.clone(),
                log.clone(),
            )),
            reporting: Arc::new(ReportingService::new(queries.clone(), cache, policy)),
            reports: Arc::new(TimeEntryReportHandler::new(queries)),
            directory_admin: Arc::new(DirectoryAdminHandler::new(directory.clone())),
            rebuild: Arc::new(RebuildDatalakeHandler::new(
                log,
                directory.clone(),
                datalake,
                batch_size,
            )),
            time_entries,
            directory,
        }
    }
}
