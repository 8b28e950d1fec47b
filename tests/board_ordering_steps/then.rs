//! Then steps for board ordering BDD scenarios.

use super::world::{BoardWorld, column_titles, titles};
use boardsync::board::services::ListLifecycleError;
use rstest_bdd_macros::then;

#[then(r#"list "{name}" shows tasks "{expected}" in order"#)]
fn list_shows_tasks(world: &BoardWorld, name: String, expected: String) -> Result<(), eyre::Report> {
    let id = world.list_id(&name)?;
    let tasks = world.board.cache().tasks()?;
    let shown = column_titles(&tasks, &id);
    if shown != titles(&expected) {
        return Err(eyre::eyre!("list {name} shows {shown:?}, expected {expected}"));
    }
    let orders: Vec<u32> = tasks
        .iter()
        .filter(|task| task.status() == &id)
        .map(|task| task.order())
        .collect();
    if !boardsync::board::domain::is_densely_ordered(&tasks, &id) {
        return Err(eyre::eyre!("list {name} is not densely ordered: {orders:?}"));
    }
    Ok(())
}

#[then("the store agrees with the board")]
fn store_agrees(world: &BoardWorld) -> Result<(), eyre::Report> {
    let cached = world.board.cache().tasks()?;
    let remote = world.store.tasks()?;
    for id in world.lists.values() {
        if column_titles(&cached, id) != column_titles(&remote, id) {
            return Err(eyre::eyre!("store and board disagree on list {id}"));
        }
    }
    Ok(())
}

#[then("the deletion is refused because it is the last list")]
fn deletion_refused(world: &BoardWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_delete_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing delete result in scenario world"))?;
    if !matches!(result, Err(ListLifecycleError::LastListRemaining)) {
        return Err(eyre::eyre!("expected the minimum-list guard, got {result:?}"));
    }
    Ok(())
}

#[then("the number of lists is {count:usize}")]
fn number_of_lists(world: &BoardWorld, count: usize) -> Result<(), eyre::Report> {
    let cached = world.board.cache().list_count()?;
    let remote = world.store.lists()?.len();
    if cached != count || remote != count {
        return Err(eyre::eyre!(
            "expected {count} lists, board has {cached} and store has {remote}"
        ));
    }
    Ok(())
}
