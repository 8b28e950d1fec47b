//! Given steps for board ordering BDD scenarios.

use super::world::{BoardWorld, run_async, titles};
use boardsync::board::domain::{ListDraft, TaskDraft};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a list "{name}" with tasks "{task_titles}""#)]
fn list_with_tasks(
    world: &mut BoardWorld,
    name: String,
    task_titles: String,
) -> Result<(), eyre::Report> {
    let list = world
        .store
        .seed_list(&ListDraft::new(name.as_str())?)
        .wrap_err("seed list")?;
    for title in titles(&task_titles) {
        let task = world
            .store
            .seed_task(&TaskDraft::new(title.as_str(), list.id().clone())?)
            .wrap_err("seed task")?;
        world.tasks.insert(title, task.id().clone());
    }
    world.lists.insert(name, list.id().clone());
    Ok(())
}

#[given("the board is loaded")]
fn board_is_loaded(world: &mut BoardWorld) -> Result<(), eyre::Report> {
    run_async(world.board.load()).wrap_err("load board")
}

#[given(r#"list "{name}" has been deleted"#)]
fn list_already_deleted(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.list_id(&name)?;
    run_async(world.board.delete_list(&id)).wrap_err("delete list during setup")
}
