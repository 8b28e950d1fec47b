//! Shared helpers for in-memory board integration tests.

use std::sync::Arc;

use boardsync::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{BoardList, ListDraft, Task, TaskDraft},
    services::Board,
};
use mockable::DefaultClock;

/// Board type used across the in-memory integration tests.
pub type TestBoard = Board<InMemoryBoardStore, DefaultClock>;

/// A seeded store with two lists and three tasks.
///
/// `Todo` holds `A` and `B` (orders 0 and 1); `Doing` holds `C`.
pub struct SeededBoard {
    /// Store shared with the board.
    pub store: InMemoryBoardStore,
    /// Board under test; not yet loaded.
    pub board: TestBoard,
    /// First list.
    pub todo: BoardList,
    /// Second list.
    pub doing: BoardList,
    /// Task `A`.
    pub a: Task,
    /// Task `B`.
    pub b: Task,
    /// Task `C`.
    pub c: Task,
}

/// Seeds the canonical two-column board.
///
/// # Errors
///
/// Returns an error if the store rejects any seed.
pub fn seeded_board() -> Result<SeededBoard, eyre::Report> {
    let store = InMemoryBoardStore::new();
    let todo = store.seed_list(&ListDraft::new("Todo")?)?;
    let doing = store.seed_list(&ListDraft::new("Doing")?)?;
    let a = store.seed_task(&TaskDraft::new("A", todo.id().clone())?)?;
    let b = store.seed_task(&TaskDraft::new("B", todo.id().clone())?)?;
    let c = store.seed_task(&TaskDraft::new("C", doing.id().clone())?)?;
    let board = Board::new(Arc::new(store.clone()), Arc::new(DefaultClock));
    Ok(SeededBoard {
        store,
        board,
        todo,
        doing,
        a,
        b,
        c,
    })
}

/// Returns the titles of `tasks` in the given list, sorted by order.
#[must_use]
pub fn titles_in(tasks: &[Task], list: &BoardList) -> Vec<String> {
    let mut column: Vec<&Task> = tasks
        .iter()
        .filter(|task| task.status() == list.id())
        .collect();
    column.sort_by(|left, right| {
        left.order()
            .cmp(&right.order())
            .then_with(|| left.id().cmp(right.id()))
    });
    column.iter().map(|task| task.title().to_owned()).collect()
}

/// Returns the `(title, order)` pairs of a list, sorted by order.
#[must_use]
pub fn orders_in(tasks: &[Task], list: &BoardList) -> Vec<(String, u32)> {
    let mut column: Vec<(String, u32)> = tasks
        .iter()
        .filter(|task| task.status() == list.id())
        .map(|task| (task.title().to_owned(), task.order()))
        .collect();
    column.sort_by_key(|(_, order)| *order);
    column
}
