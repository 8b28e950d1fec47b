//! In-memory integration tests for drag commits and their persistence.

use super::helpers::{SeededBoard, orders_in, seeded_board, titles_in};
use boardsync::board::{
    adapters::memory::StoreOperation,
    domain::{
        CommitPlan, PersistedTask, Priority, Task, TaskDraft, TaskFilter, TaskId,
        is_densely_ordered,
    },
    ports::{DragEvent, DragEventHandler},
    services::{DragState, SyncError},
};
use rstest::{fixture, rstest};

#[fixture]
fn seeded() -> SeededBoard {
    seeded_board().expect("board should seed")
}

fn cached_tasks(seeded: &SeededBoard) -> Result<Vec<Task>, eyre::Report> {
    Ok(seeded.board.cache().tasks()?)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn load_mirrors_the_store(seeded: SeededBoard) -> Result<(), eyre::Report> {
    seeded.board.load().await?;

    eyre::ensure!(
        seeded.board.cache().lists()? == seeded.store.lists()?,
        "cached lists should match the store"
    );
    eyre::ensure!(
        cached_tasks(&seeded)? == seeded.store.tasks()?,
        "cached tasks should match the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reorder_is_visible_before_persistence_finishes(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let (a, b) = (seeded.a.id().to_string(), seeded.b.id().to_string());

    seeded.board.drag_start(&a)?;
    seeded.board.drag_over(&a, &b)?;
    let pending = seeded
        .board
        .drag_end(&a, Some(&b))?
        .ok_or_else(|| eyre::eyre!("expected a committed reorder"))?;

    eyre::ensure!(
        matches!(pending.plan(), CommitPlan::Reorder { .. }),
        "expected a reorder plan"
    );
    eyre::ensure!(
        orders_in(&cached_tasks(&seeded)?, &seeded.todo)
            == vec![("B".to_owned(), 0), ("A".to_owned(), 1)],
        "cache should hold the new order immediately"
    );
    pending.wait().await?;
    eyre::ensure!(
        orders_in(&seeded.store.tasks()?, &seeded.todo)
            == vec![("B".to_owned(), 0), ("A".to_owned(), 1)],
        "store should persist the new order"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn cross_column_drop_appends_and_compacts(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let a = seeded.a.id().to_string();
    let doing = seeded.doing.id().to_string();

    seeded.board.drag_start(&a)?;
    seeded.board.drag_over(&a, &doing)?;
    let plan = seeded.board.drag_end_and_sync(&a, Some(&doing)).await?;

    eyre::ensure!(
        matches!(plan, Some(CommitPlan::Move { .. })),
        "expected a move plan"
    );
    let remote = seeded.store.tasks()?;
    eyre::ensure!(
        orders_in(&remote, &seeded.doing) == vec![("C".to_owned(), 0), ("A".to_owned(), 1)],
        "moved task should be appended to the destination"
    );
    eyre::ensure!(
        orders_in(&remote, &seeded.todo) == vec![("B".to_owned(), 0)],
        "source column should be compacted"
    );
    eyre::ensure!(
        cached_tasks(&seeded)? == remote,
        "cache should agree with the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn drop_outside_any_target_restores_and_skips_the_store(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let before = cached_tasks(&seeded)?;
    let a = seeded.a.id().to_string();
    let doing = seeded.doing.id().to_string();

    seeded.board.drag_start(&a)?;
    seeded.board.drag_over(&a, &doing)?;
    let pending = seeded.board.drag_end(&a, None)?;

    eyre::ensure!(pending.is_none(), "aborted drag should not persist");
    eyre::ensure!(
        seeded.board.drag_state() == &DragState::Idle,
        "engine should return to idle"
    );
    eyre::ensure!(
        cached_tasks(&seeded)? == before,
        "speculative move should be undone"
    );
    eyre::ensure!(
        seeded.store.calls()? == vec![StoreOperation::FetchLists, StoreOperation::FetchTasks],
        "no write should reach the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropping_back_on_the_origin_column_skips_the_store(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let before = cached_tasks(&seeded)?;
    let b = seeded.b.id().to_string();
    let (todo, doing) = (seeded.todo.id().to_string(), seeded.doing.id().to_string());

    seeded.board.drag_start(&b)?;
    seeded.board.drag_over(&b, &doing)?;
    let plan = seeded.board.drag_end_and_sync(&b, Some(&todo)).await?;

    eyre::ensure!(plan.is_none(), "returning to the same slot should not commit");
    eyre::ensure!(
        cached_tasks(&seeded)? == before,
        "cache should be back at the drag-start placement"
    );
    eyre::ensure!(
        seeded.store.calls()? == vec![StoreOperation::FetchLists, StoreOperation::FetchTasks],
        "no write should reach the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn rejected_reorder_reloads_server_truth(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    seeded.store.fail(StoreOperation::ReorderTasks)?;
    let (a, b) = (seeded.a.id().to_string(), seeded.b.id().to_string());

    seeded.board.drag_start(&a)?;
    let result = seeded.board.drag_end_and_sync(&a, Some(&b)).await;

    eyre::ensure!(
        matches!(
            result,
            Err(SyncError::Remote {
                resynchronized: true,
                ..
            })
        ),
        "expected a resynchronized remote error, got {result:?}"
    );
    eyre::ensure!(
        titles_in(&cached_tasks(&seeded)?, &seeded.todo) == vec!["A", "B"],
        "cache should show the server order again"
    );

    seeded.store.clear_failures()?;
    seeded.board.drag_start(&a)?;
    seeded.board.drag_end_and_sync(&a, Some(&b)).await?;
    eyre::ensure!(
        titles_in(&seeded.store.tasks()?, &seeded.todo) == vec!["B", "A"],
        "retried drag should persist once the store recovers"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn legacy_duplicate_orders_become_dense_after_a_reorder(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    for (raw_id, title) in [("x", "X"), ("y", "Y")] {
        seeded.store.seed_raw_task(Task::from_persisted(PersistedTask::new(
            TaskId::new(raw_id)?,
            title,
            seeded.todo.id().clone(),
            0,
        )))?;
    }
    seeded.board.load().await?;
    eyre::ensure!(
        titles_in(&cached_tasks(&seeded)?, &seeded.todo) == vec!["A", "X", "Y", "B"],
        "duplicate orders should tie-break by id"
    );
    let (a, b) = (seeded.a.id().to_string(), seeded.b.id().to_string());

    seeded.board.drag_start(&b)?;
    seeded.board.drag_end_and_sync(&b, Some(&a)).await?;

    let remote = seeded.store.tasks()?;
    eyre::ensure!(
        titles_in(&remote, &seeded.todo) == vec!["B", "A", "X", "Y"],
        "unexpected order after reorder"
    );
    eyre::ensure!(
        is_densely_ordered(&remote, seeded.todo.id()),
        "column should be dense after the reorder"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn gesture_events_spawn_background_persistence(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let c = seeded.c.id().to_string();
    let todo = seeded.todo.id().to_string();

    seeded.board.on_drag_start(&DragEvent::new(c.as_str()))?;
    seeded
        .board
        .on_drag_over(&DragEvent::over(c.as_str(), todo.as_str()))?;
    let pending = seeded
        .board
        .on_drag_end(&DragEvent::over(c.as_str(), todo.as_str()))?
        .ok_or_else(|| eyre::eyre!("expected a committed move"))?;
    pending.wait().await?;

    eyre::ensure!(
        orders_in(&seeded.store.tasks()?, &seeded.todo)
            == vec![
                ("A".to_owned(), 0),
                ("B".to_owned(), 1),
                ("C".to_owned(), 2)
            ],
        "moved task should land at the end of Todo"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_task_can_be_dragged_immediately(
    mut seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    let created = seeded
        .board
        .create_task(&TaskDraft::new("D", seeded.todo.id().clone())?.with_priority(Priority::High))
        .await?;
    let (d, a) = (created.id().to_string(), seeded.a.id().to_string());

    seeded.board.drag_start(&d)?;
    seeded.board.drag_end_and_sync(&d, Some(&a)).await?;

    eyre::ensure!(
        titles_in(&seeded.store.tasks()?, &seeded.todo) == vec!["D", "A", "B"],
        "created task should move to the top"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn columns_follow_list_order_and_filter(seeded: SeededBoard) -> Result<(), eyre::Report> {
    seeded.board.load().await?;

    let columns = seeded.board.columns(&TaskFilter::new().with_search(" b "))?;

    let summary: Vec<(String, Vec<String>)> = columns
        .iter()
        .map(|column| {
            (
                column.list.name().to_owned(),
                column
                    .tasks
                    .iter()
                    .map(|task| task.title().to_owned())
                    .collect(),
            )
        })
        .collect();
    eyre::ensure!(
        summary
            == vec![
                ("Todo".to_owned(), vec!["B".to_owned()]),
                ("Doing".to_owned(), Vec::new()),
            ],
        "unexpected columns: {summary:?}"
    );
    eyre::ensure!(
        seeded.board.visible_tasks(&TaskFilter::new())?.len() == 3,
        "empty filter should show every task"
    );
    Ok(())
}
