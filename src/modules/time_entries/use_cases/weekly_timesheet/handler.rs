// Weekly grid read model.
//
// Purpose
// - Build the seven-day grid for one user, starting at any date.
//
// Responsibilities
// - Union the user's entries in the window with the user's pinned tasks.
// - Fill every row with all seven days, zero where nothing was logged.
// - Order rows by project name, then task name.

use crate::modules::directory::adapters::outbound::directory::Directory;
use crate::modules::time_entries::adapters::outbound::time_entry_log::TimeEntryLog;
use crate::modules::time_entries::use_cases::weekly_timesheet::view::{TimesheetRow, TimesheetView};
use crate::shared::core::actor::Actor;
use crate::shared::core::errors::ApplicationError;
use crate::shared::core::primitives::{format_date, week_days};
use chrono::NaiveDate;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

pub struct WeeklyTimesheetHandler {
    directory: Arc<dyn Directory>,
    log: Arc<dyn TimeEntryLog>,
}

impl WeeklyTimesheetHandler {
    pub fn new(directory: Arc<dyn Directory>, log: Arc<dyn TimeEntryLog>) -> Self {
        Self { directory, log }
    }

    #[instrument(skip(self), fields(user_id = %actor.user_id))]
    pub async fn handle(
        &self,
        actor: &Actor,
        week_start: NaiveDate,
    ) -> Result<TimesheetView, ApplicationError> {
        let dates = week_days(week_start)?;
        let week_end = dates.last().copied().unwrap_or(week_start);
        let days: Vec<String> = dates.into_iter().map(format_date).collect();

        let entries = self
            .log
            .list_for_user(actor.user_id, Some(week_start), Some(week_end))
            .await?;
        let pinned = self.directory.pinned_task_ids(actor.user_id).await?;

        let mut logged: HashMap<(Uuid, String), i64> = HashMap::new();
        for entry in &entries {
            *logged
                .entry((entry.task_id, format_date(entry.work_date)))
                .or_default() += i64::from(entry.minutes);
        }

        let task_ids: BTreeSet<Uuid> = entries
            .iter()
            .map(|e| e.task_id)
            .chain(pinned)
            .collect();

        let mut rows = Vec::with_capacity(task_ids.len());
        for task_id in task_ids {
            // A pin can outlive its task.
            let Some(task) = self.directory.find_task(task_id).await? else {
                continue;
            };
            let project_name = self
                .directory
                .find_project(task.project_id)
                .await?
                .map(|p| p.name)
                .unwrap_or_default();

            let minutes_by_day = days
                .iter()
                .map(|day| {
                    let minutes = logged.get(&(task_id, day.clone())).copied().unwrap_or(0);
                    (day.clone(), minutes)
                })
                .collect();

            rows.push(TimesheetRow {
                project_id: task.project_id,
                project_name,
                task_id,
                is_closed: task.is_closed(),
                task_name: task.name,
                minutes_by_day,
            });
        }
        rows.sort_by(|a, b| {
            a.project_name
                .cmp(&b.project_name)
                .then_with(|| a.task_name.cmp(&b.task_name))
        });

        let totals_by_day: BTreeMap<String, i64> = days
            .iter()
            .map(|day| {
                let total = rows
                    .iter()
                    .map(|row| row.minutes_by_day.get(day).copied().unwrap_or(0))
                    .sum();
                (day.clone(), total)
            })
            .collect();
        let total_week = totals_by_day.values().sum();

        Ok(TimesheetView {
            week_start: format_date(week_start),
            days,
            rows,
            totals_by_day,
            total_week,
        })
    }
}

#[cfg(test)]
mod weekly_timesheet_handler_tests {
    use super::*;
    use crate::modules::directory::core::model::Task;
    use crate::modules::directory::core::model::TaskStatus;
    use crate::modules::time_entries::core::time_entry::LogTimeEntry;
    use crate::tests::fixtures::{World, date, world};
    use rstest::rstest;

    #[rstest]
    #[tokio::test]
    async fn it_should_show_pinned_tasks_with_zero_minutes(#[future] world: World) {
        let world = world.await;
        world
            .time_entries
            .pin_task(&world.worker, world.task.id)
            .await
            .unwrap();

        let view = world
            .weekly
            .handle(&world.worker, date("2024-01-01"))
            .await
            .unwrap();

        assert_eq!(view.days.len(), 7);
        assert_eq!(view.rows.len(), 1);
        assert!(view.rows[0].minutes_by_day.values().all(|m| *m == 0));
        assert_eq!(view.total_week, 0);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_only_count_entries_inside_the_window(#[future] world: World) {
        let world = world.await;
        for (day, minutes) in [("2024-01-01", 60), ("2024-01-07", 30), ("2024-01-08", 240)] {
            world
                .time_entries
                .create(
                    &world.worker,
                    LogTimeEntry {
                        task_id: world.task.id,
                        work_date: date(day),
                        minutes,
                        notes: None,
                    },
                )
                .await
                .unwrap();
        }

        let view = world
            .weekly
            .handle(&world.worker, date("2024-01-01"))
            .await
            .unwrap();

        assert_eq!(view.totals_by_day["2024-01-01"], 60);
        assert_eq!(view.totals_by_day["2024-01-07"], 30);
        assert!(!view.totals_by_day.contains_key("2024-01-08"));
        assert_eq!(view.total_week, 90);
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_order_rows_by_project_then_task_and_flag_closed(#[future] world: World) {
        let world = world.await;
        let second = Task {
            id: Uuid::now_v7(),
            project_id: world.project.id,
            name: "Analysis".into(),
            status: TaskStatus::Closed,
        };
        world.directory.save_task(second.clone()).await.unwrap();
        for task_id in [world.task.id, second.id, world.global_task.id] {
            world
                .directory
                .pin_task(world.worker.user_id, task_id)
                .await
                .unwrap();
        }

        let view = world
            .weekly
            .handle(&world.worker, date("2024-01-01"))
            .await
            .unwrap();

        let order: Vec<(&str, &str, bool)> = view
            .rows
            .iter()
            .map(|r| (r.project_name.as_str(), r.task_name.as_str(), r.is_closed))
            .collect();
        assert_eq!(
            order,
            vec![
                ("Apollo", "Analysis", true),
                ("Apollo", "Design", false),
                ("Internal", "Meetings", false),
            ]
        );
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_skip_pins_of_vanished_tasks(#[future] world: World) {
        let world = world.await;
        world
            .directory
            .pin_task(world.worker.user_id, Uuid::now_v7())
            .await
            .unwrap();
        let view = world
            .weekly
            .handle(&world.worker, date("2024-01-01"))
            .await
            .unwrap();
        assert!(view.rows.is_empty());
    }

    #[rstest]
    #[tokio::test]
    async fn it_should_reject_a_week_running_past_the_last_date(#[future] world: World) {
        let world = world.await;
        let result = world.weekly.handle(&world.worker, NaiveDate::MAX).await;
        assert_eq!(result.unwrap_err().kind(), "validation");
    }
}
