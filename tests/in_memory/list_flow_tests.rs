//! In-memory integration tests for list creation and deletion.

use super::helpers::{SeededBoard, orders_in, seeded_board};
use boardsync::board::{
    adapters::memory::StoreOperation,
    domain::{ListPatch, TaskFilter},
    services::ListLifecycleError,
};
use rstest::{fixture, rstest};

#[fixture]
fn seeded() -> SeededBoard {
    seeded_board().expect("board should seed")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_a_list_moves_its_tasks_to_the_first_list(
    seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;

    seeded.board.delete_list(seeded.doing.id()).await?;

    let lists = seeded.board.cache().lists()?;
    eyre::ensure!(lists == vec![seeded.todo.clone()], "only Todo should remain");
    let cached = seeded.board.cache().tasks()?;
    eyre::ensure!(
        orders_in(&cached, &seeded.todo)
            == vec![
                ("A".to_owned(), 0),
                ("B".to_owned(), 1),
                ("C".to_owned(), 2)
            ],
        "orphaned task should be appended to Todo"
    );
    eyre::ensure!(
        seeded.store.calls()?.ends_with(&[
            StoreOperation::DeleteList,
            StoreOperation::FetchTasks
        ]),
        "tasks should be refetched after the delete"
    );
    eyre::ensure!(
        cached == seeded.store.tasks()?,
        "cache should agree with the store"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn the_last_list_cannot_be_deleted(seeded: SeededBoard) -> Result<(), eyre::Report> {
    seeded.board.load().await?;
    seeded.board.delete_list(seeded.doing.id()).await?;
    let calls_before = seeded.store.calls()?.len();

    let result = seeded.board.delete_list(seeded.todo.id()).await;

    eyre::ensure!(
        matches!(result, Err(ListLifecycleError::LastListRemaining)),
        "expected the minimum-list guard, got {result:?}"
    );
    eyre::ensure!(
        seeded.store.calls()?.len() == calls_before,
        "the store should not be contacted"
    );
    eyre::ensure!(
        seeded.board.cache().list_count()? == 1,
        "the list should still be cached"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn created_list_appears_as_an_empty_column(
    seeded: SeededBoard,
) -> Result<(), eyre::Report> {
    seeded.board.load().await?;

    let review = seeded.board.create_list("Review").await?;
    let renamed = seeded
        .board
        .update_list(review.id(), &ListPatch::new().with_name("QA")?)
        .await?;

    let columns = seeded.board.columns(&TaskFilter::new())?;
    let last = columns
        .last()
        .ok_or_else(|| eyre::eyre!("expected at least one column"))?;
    eyre::ensure!(last.list == renamed, "new list should be the last column");
    eyre::ensure!(last.list.name() == "QA", "rename should be cached");
    eyre::ensure!(last.tasks.is_empty(), "new list should be empty");
    eyre::ensure!(columns.len() == 3, "expected three columns");
    Ok(())
}
