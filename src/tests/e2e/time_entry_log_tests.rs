use crate::modules::directory::core::model::TaskStatus;
use crate::modules::time_entries::adapters::outbound::time_entry_log_in_memory::InMemoryTimeEntryLog;
use crate::modules::time_entries::core::time_entry::LogTimeEntry;
use crate::modules::time_entries::use_cases::log_time_entry::handler::TimeEntryHandler;
use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::TimesheetCell;
use crate::tests::fixtures::{World, date, world};
use rstest::rstest;
use std::sync::Arc;

#[rstest]
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creates_for_one_cell_yield_one_entry(#[future] world: World) {
    let world = world.await;
    let mut log = InMemoryTimeEntryLog::new();
    log.set_delay_insert_ms(25);
    let log = Arc::new(log);
    let handler = Arc::new(TimeEntryHandler::new(
        world.directory.clone(),
        log.clone(),
        world.bus.clone(),
    ));

    let attempts: Vec<_> = (0..6)
        .map(|_| {
            let handler = handler.clone();
            let actor = world.worker;
            let task_id = world.task.id;
            tokio::spawn(async move {
                handler
                    .create(
                        &actor,
                        LogTimeEntry {
                            task_id,
                            work_date: date("2024-02-01"),
                            minutes: 30,
                            notes: None,
                        },
                    )
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => created += 1,
            Err(err) => {
                assert_eq!(err.kind(), "conflict");
                conflicts += 1;
            }
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 5);
    assert_eq!(log.snapshot().await.unwrap().len(), 1);
}

#[rstest]
#[tokio::test]
async fn clearing_a_cell_shows_zero_and_removes_the_entry(#[future] world: World) {
    let world = world.await;
    let cell = |minutes| TimesheetCell {
        task_id: world.task.id,
        work_date: date("2024-01-03"),
        minutes,
    };

    world.cells.handle(&world.worker, cell(120)).await.unwrap();
    world.cells.handle(&world.worker, cell(0)).await.unwrap();

    let view = world
        .weekly
        .handle(&world.worker, date("2024-01-01"))
        .await
        .unwrap();
    let row = view
        .rows
        .iter()
        .find(|row| row.task_id == world.task.id)
        .unwrap();
    assert_eq!(row.minutes_by_day["2024-01-03"], 0);
    assert_eq!(view.total_week, 0);
    assert!(world.log.snapshot().await.unwrap().is_empty());
}

#[rstest]
#[tokio::test]
async fn a_closed_task_freezes_its_cells_until_reopened(#[future] world: World) {
    let world = world.await;
    let cell = |minutes| TimesheetCell {
        task_id: world.task.id,
        work_date: date("2024-01-04"),
        minutes,
    };
    world.cells.handle(&world.worker, cell(120)).await.unwrap();

    world
        .directory_admin
        .set_task_status(&world.admin, world.task.id, TaskStatus::Closed)
        .await
        .unwrap();
    let refused = world.cells.handle(&world.worker, cell(180)).await;
    assert_eq!(refused.unwrap_err().kind(), "invalid_state");

    world
        .directory_admin
        .set_task_status(&world.admin, world.task.id, TaskStatus::Open)
        .await
        .unwrap();
    world.cells.handle(&world.worker, cell(180)).await.unwrap();

    let entries = world.log.snapshot().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].minutes, 180);
}

#[rstest]
#[tokio::test]
async fn a_week_starting_on_sunday_buckets_by_its_own_seven_days(#[future] world: World) {
    let world = world.await;
    world
        .log_minutes(&world.worker, world.task.id, "2023-01-02", 120)
        .await;

    let view = world
        .weekly
        .handle(&world.worker, date("2023-01-01"))
        .await
        .unwrap();

    assert_eq!(view.days.first().map(String::as_str), Some("2023-01-01"));
    assert_eq!(view.days.last().map(String::as_str), Some("2023-01-07"));
    assert_eq!(view.total_week, 120);
    for (day, total) in &view.totals_by_day {
        let expected = if day == "2023-01-02" { 120 } else { 0 };
        assert_eq!(*total, expected, "total for {day}");
    }
}
