use crate::modules::datalake::adapters::outbound::datalake_repository::DatalakeRepository;
use crate::modules::reporting::core::filters::{EntityGrouping, StatsFilter, TimeGrouping};
use crate::modules::time_entries::core::time_entry::TimeEntryPatch;
use crate::modules::time_entries::use_cases::update_timesheet_cell::handler::TimesheetCell;
use crate::tests::fixtures::{World, date, world};
use rstest::rstest;

async fn seed_mixed_activity(world: &World) {
    world
        .log_minutes(&world.worker, world.task.id, "2024-01-01", 60)
        .await;
    world
        .log_minutes(&world.worker, world.global_task.id, "2024-01-01", 30)
        .await;
    world
        .log_minutes(&world.outsider, world.global_task.id, "2024-01-02", 45)
        .await;
    world
        .log_minutes(&world.admin, world.global_task.id, "2024-01-08", 15)
        .await;
}

#[rstest]
#[tokio::test]
async fn rebuild_matches_the_event_driven_projection(#[future] world: World) {
    let world = world.await;
    seed_mixed_activity(&world).await;

    let updated = world
        .log_minutes(&world.worker, world.task.id, "2024-01-05", 10)
        .await;
    world
        .time_entries
        .update(
            &world.worker,
            updated.id,
            TimeEntryPatch {
                minutes: Some(25),
                notes: None,
            },
        )
        .await
        .unwrap();
    let removed = world
        .log_minutes(&world.worker, world.task.id, "2024-01-06", 10)
        .await;
    world
        .time_entries
        .delete(&world.worker, removed.id)
        .await
        .unwrap();
    world
        .cells
        .handle(
            &world.worker,
            TimesheetCell {
                task_id: world.task.id,
                work_date: date("2024-01-01"),
                minutes: 0,
            },
        )
        .await
        .unwrap();

    let projected = world.datalake.list_all().await.unwrap();
    let written = world.rebuild.handle().await.unwrap();
    let rebuilt = world.datalake.list_all().await.unwrap();

    assert_eq!(written as usize, rebuilt.len());
    assert_eq!(projected, rebuilt);
    assert_eq!(rebuilt.len(), world.log.snapshot().await.unwrap().len());
}

#[rstest]
#[tokio::test]
async fn ungrouped_stats_return_one_total_row(#[future] world: World) {
    let world = world.await;
    seed_mixed_activity(&world).await;

    let rows = world
        .reporting
        .get_stats(
            &world.admin,
            StatsFilter {
                to: Some(date("2024-01-07")),
                ..StatsFilter::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].label.as_deref(), Some("Total"));
    assert_eq!(rows[0].total_minutes, 135);
}

#[rstest]
#[tokio::test]
async fn grouping_by_project_and_day_preserves_the_grand_total(#[future] world: World) {
    let world = world.await;
    seed_mixed_activity(&world).await;

    let total = world
        .reporting
        .get_stats(&world.admin, StatsFilter::default())
        .await
        .unwrap()[0]
        .total_minutes;
    let grouped = world
        .reporting
        .get_stats(
            &world.admin,
            StatsFilter {
                time_grouping: TimeGrouping::Day,
                group_by: vec![EntityGrouping::Project],
                ..StatsFilter::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(total, 150);
    assert_eq!(grouped.iter().map(|row| row.total_minutes).sum::<i64>(), total);
    let keys: Vec<(&str, &str)> = grouped
        .iter()
        .map(|row| {
            (
                row.project_name.as_deref().unwrap(),
                row.period.as_deref().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        keys,
        vec![
            ("Apollo", "2024-01-01"),
            ("Internal", "2024-01-01"),
            ("Internal", "2024-01-02"),
            ("Internal", "2024-01-08")
        ]
    );
}

#[rstest]
#[tokio::test]
async fn day_grouping_returns_one_row_per_day(#[future] world: World) {
    let world = world.await;
    world
        .log_minutes(&world.worker, world.task.id, "2024-01-01", 60)
        .await;
    world
        .log_minutes(&world.worker, world.task.id, "2024-01-02", 90)
        .await;

    let rows = world
        .reporting
        .get_stats(
            &world.admin,
            StatsFilter {
                time_grouping: TimeGrouping::Day,
                ..StatsFilter::default()
            },
        )
        .await
        .unwrap();

    let flat: Vec<(Option<&str>, i64)> = rows
        .iter()
        .map(|row| (row.period.as_deref(), row.total_minutes))
        .collect();
    assert_eq!(
        flat,
        vec![(Some("2024-01-01"), 60), (Some("2024-01-02"), 90)]
    );
}
