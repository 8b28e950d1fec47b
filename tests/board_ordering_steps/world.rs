//! Shared world state for board ordering BDD scenarios.

use std::{collections::HashMap, sync::Arc};

use boardsync::board::{
    adapters::memory::InMemoryBoardStore,
    domain::{ListId, Task, TaskId},
    services::{Board, ListLifecycleResult},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Board type used by the BDD world.
pub type TestBoard = Board<InMemoryBoardStore, DefaultClock>;

/// Scenario world for board ordering behaviour tests.
///
/// The store mints identifiers, so steps refer to lists by name and to
/// tasks by title through the lookup maps.
pub struct BoardWorld {
    pub store: InMemoryBoardStore,
    pub board: TestBoard,
    pub lists: HashMap<String, ListId>,
    pub tasks: HashMap<String, TaskId>,
    pub last_delete_result: Option<ListLifecycleResult<()>>,
}

impl BoardWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        let store = InMemoryBoardStore::new();
        let board = Board::new(Arc::new(store.clone()), Arc::new(DefaultClock));
        Self {
            store,
            board,
            lists: HashMap::new(),
            tasks: HashMap::new(),
            last_delete_result: None,
        }
    }

    /// Resolves a list name to its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no list with that name was seeded.
    pub fn list_id(&self, name: &str) -> Result<ListId, eyre::Report> {
        self.lists
            .get(name)
            .cloned()
            .ok_or_else(|| eyre::eyre!("unknown list {name} in scenario world"))
    }

    /// Resolves a task title to its identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if no task with that title was seeded.
    pub fn task_id(&self, title: &str) -> Result<TaskId, eyre::Report> {
        self.tasks
            .get(title)
            .cloned()
            .ok_or_else(|| eyre::eyre!("unknown task {title} in scenario world"))
    }
}

impl Default for BoardWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BoardWorld {
    BoardWorld::default()
}

/// Splits a comma-separated step argument into trimmed titles.
#[must_use]
pub fn titles(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(str::to_owned)
        .collect()
}

/// Returns the titles of a list's tasks in display order.
#[must_use]
pub fn column_titles(tasks: &[Task], list: &ListId) -> Vec<String> {
    let mut column: Vec<&Task> = tasks.iter().filter(|task| task.status() == list).collect();
    column.sort_by(|left, right| {
        left.order()
            .cmp(&right.order())
            .then_with(|| left.id().cmp(right.id()))
    });
    column.iter().map(|task| task.title().to_owned()).collect()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
