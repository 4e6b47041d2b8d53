// Shared test fixtures.
//
// `World` is a fully wired application on in-memory adapters with a small
// directory: an admin, a worker who is a member of "Apollo", an outsider with
// no memberships, and the global "Internal" project every user may log to.

use crate::modules::datalake::adapters::outbound::datalake_in_memory::InMemoryDatalake;
use crate::modules::datalake::use_cases::rebuild_datalake::handler::{
    DEFAULT_BATCH_SIZE, RebuildDatalakeHandler,
};
use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::directory::adapters::outbound::directory_in_memory::InMemoryDirectory;
use crate::modules::directory::core::model::{
    Project, ProjectMember, ProjectRole, Role, Task, TaskStatus, User,
};
use crate::modules::directory::use_cases::manage_directory::handler::DirectoryAdminHandler;
use crate::modules::reporting::adapters::outbound::reporting_queries_in_memory::InMemoryReportingQueries;
use crate::modules::reporting::use_cases::aggregate_stats::handler::ReportingService;
use crate::modules::reporting::use_cases::time_entry_report::handler::TimeEntryReportHandler;
use crate::modules::time_entries::adapters::outbound::time_entry_log_in_memory::InMemoryTimeEntryLog;
use crate::modules::time_entries::core::events::TimeEntryChanged;
use crate::modules::time_entries::core::time_entry::{LogTimeEntry, TimeEntry};
use crate::modules::time_entries::use_cases::log_time_entry::handler::TimeEntryHandler;
use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::UpdateTimesheetCellHandler;
use crate::modules::time_entries::use_cases::weekly_timesheet::handler::WeeklyTimesheetHandler;
use crate::shared::core::actor::Actor;
use crate::shared::infrastructure::aggregate_cache::CachePolicy;
use crate::shared::infrastructure::aggregate_cache::in_memory::InMemoryAggregateCache;
use crate::shared::infrastructure::event_bus::in_process::InProcessEventBus;
use crate::shared::infrastructure::event_bus::{ChangeHandler, ChangeNotifier, Topic};
use crate::shell::state::{AppState, Backends};
use axum::Router;
use chrono::NaiveDate;
use rstest::fixture;
use std::sync::Arc;
use tokio::sync::Mutex;
use uuid::Uuid;

pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const WORKER_EMAIL: &str = "worker@example.com";
pub const OUTSIDER_EMAIL: &str = "outsider@example.com";

pub fn date(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap()
}

pub struct TimeEntryBuilder {
    inner: TimeEntry,
}

impl Default for TimeEntryBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[allow(dead_code)]
impl TimeEntryBuilder {
    pub fn new() -> Self {
        Self {
            inner: TimeEntry {
                id: Uuid::now_v7(),
                user_id: Uuid::now_v7(),
                task_id: Uuid::now_v7(),
                work_date: date("2024-01-01"),
                minutes: 60,
                notes: None,
                created_at: 1_700_000_000_000,
                updated_at: 1_700_000_000_000,
            },
        }
    }

    pub fn user_id(mut self, v: Uuid) -> Self {
        self.inner.user_id = v;
        self
    }

    pub fn task_id(mut self, v: Uuid) -> Self {
        self.inner.task_id = v;
        self
    }

    pub fn work_date(mut self, v: &str) -> Self {
        self.inner.work_date = date(v);
        self
    }

    pub fn minutes(mut self, v: i32) -> Self {
        self.inner.minutes = v;
        self
    }

    pub fn notes(mut self, v: impl Into<String>) -> Self {
        self.inner.notes = Some(v.into());
        self
    }

    pub fn build(self) -> TimeEntry {
        self.inner
    }
}

pub fn make_time_entry() -> TimeEntry {
    TimeEntryBuilder::new().build()
}

pub fn make_time_entry_on(user_id: Uuid, task_id: Uuid, day: &str, minutes: i32) -> TimeEntry {
    TimeEntryBuilder::new()
        .user_id(user_id)
        .task_id(task_id)
        .work_date(day)
        .minutes(minutes)
        .build()
}

/// Remembers the topic of every event it sees.
#[derive(Default)]
pub struct TopicRecorder {
    topics: Mutex<Vec<&'static str>>,
}

#[async_trait::async_trait]
impl ChangeHandler<TimeEntryChanged> for TopicRecorder {
    fn name(&self) -> &str {
        "topic_recorder"
    }

    async fn handle(&self, event: &TimeEntryChanged) -> anyhow::Result<()> {
        self.topics.lock().await.push(event.topic());
        Ok(())
    }
}

pub struct World {
    pub state: AppState,
    pub directory: Arc<InMemoryDirectory>,
    pub log: Arc<InMemoryTimeEntryLog>,
    pub datalake: Arc<InMemoryDatalake>,
    pub bus: Arc<dyn ChangeNotifier<TimeEntryChanged>>,
    pub time_entries: Arc<TimeEntryHandler>,
    pub cells: Arc<UpdateTimesheetCellHandler>,
    pub weekly: Arc<WeeklyTimesheetHandler>,
    pub reporting: Arc<ReportingService>,
    pub reports: Arc<TimeEntryReportHandler>,
    pub rebuild: Arc<RebuildDatalakeHandler>,
    pub directory_admin: Arc<DirectoryAdminHandler>,
    pub admin: Actor,
    pub worker: Actor,
    pub outsider: Actor,
    pub project: Project,
    pub task: Task,
    pub global_project: Project,
    pub global_task: Task,
    recorder: Arc<TopicRecorder>,
}

fn user(email: &str, role: Role) -> User {
    User {
        id: Uuid::now_v7(),
        email: email.into(),
        role,
    }
}

fn project(name: &str, is_global: bool) -> Project {
    Project {
        id: Uuid::now_v7(),
        name: name.into(),
        code: None,
        is_global,
        is_archived: false,
    }
}

fn task(project: &Project, name: &str) -> Task {
    Task {
        id: Uuid::now_v7(),
        project_id: project.id,
        name: name.into(),
        status: TaskStatus::Open,
    }
}

#[fixture]
pub async fn world() -> World {
    let directory = Arc::new(InMemoryDirectory::new());
    let log = Arc::new(InMemoryTimeEntryLog::new());
    let datalake = Arc::new(InMemoryDatalake::new());
    let bus: Arc<dyn ChangeNotifier<TimeEntryChanged>> =
        Arc::new(InProcessEventBus::<TimeEntryChanged>::new());

    let backends = Backends {
        directory: directory.clone(),
        log: log.clone(),
        datalake: datalake.clone(),
        queries: Arc::new(InMemoryReportingQueries::new(
            directory.clone(),
            log.clone(),
            datalake.clone(),
        )),
        cache: Arc::new(InMemoryAggregateCache::new()),
        bus: bus.clone(),
    };
    let state = AppState::assemble(backends, CachePolicy::development(), DEFAULT_BATCH_SIZE).await;

    let recorder = Arc::new(TopicRecorder::default());
    bus.subscribe(recorder.clone()).await;

    let admin = user(ADMIN_EMAIL, Role::Admin);
    let worker = user(WORKER_EMAIL, Role::Worker);
    let outsider = user(OUTSIDER_EMAIL, Role::Worker);
    let apollo = project("Apollo", false);
    let design = task(&apollo, "Design");
    let internal = project("Internal", true);
    let meetings = task(&internal, "Meetings");

    for record in [&admin, &worker, &outsider] {
        directory.save_user(record.clone()).await.unwrap();
    }
    directory.save_project(apollo.clone()).await.unwrap();
    directory.save_project(internal.clone()).await.unwrap();
    directory.save_task(design.clone()).await.unwrap();
    directory.save_task(meetings.clone()).await.unwrap();
    directory
        .save_membership(ProjectMember {
            project_id: apollo.id,
            user_id: worker.id,
            role: ProjectRole::Member,
        })
        .await
        .unwrap();

    World {
        directory,
        log,
        datalake,
        bus,
        time_entries: state.time_entries.clone(),
        cells: state.timesheet_cells.clone(),
        weekly: state.weekly_timesheet.clone(),
        reporting: state.reporting.clone(),
        reports: state.reports.clone(),
        rebuild: state.rebuild.clone(),
        directory_admin: state.directory_admin.clone(),
        state,
        admin: Actor::from(&admin),
        worker: Actor::from(&worker),
        outsider: Actor::from(&outsider),
        project: apollo,
        task: design,
        global_project: internal,
        global_task: meetings,
        recorder,
    }
}

impl World {
    pub fn app(&self) -> Router {
        crate::shell::http::router(self.state.clone())
    }

    pub async fn recorded_topics(&self) -> Vec<&'static str> {
        self.recorder.topics.lock().await.clone()
    }

    /// Sets the status of `task` directly in the directory.
    pub async fn set_task_status(&self, status: TaskStatus) {
        let task = Task {
            status,
            ..self.task.clone()
        };
        self.directory.save_task(task).await.unwrap();
    }

    pub async fn log_minutes(&self, actor: &Actor, task_id: Uuid, day: &str, minutes: i32) -> TimeEntry {
        self.time_entries
            .create(
                actor,
                LogTimeEntry {
                    task_id,
                    work_date: date(day),
                    minutes,
                    notes: None,
                },
            )
            .await
            .unwrap()
    }
}
