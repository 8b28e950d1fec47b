//! When steps for board ordering BDD scenarios.

use super::world::{BoardWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;

fn drag_and_drop(world: &mut BoardWorld, active: &str, over: &str) -> Result<(), eyre::Report> {
    world.board.drag_start(active)?;
    world.board.drag_over(active, over)?;
    run_async(world.board.drag_end_and_sync(active, Some(over)))
        .wrap_err("persist drag")?
        .ok_or_else(|| eyre::eyre!("expected the drop to commit"))?;
    Ok(())
}

#[when(r#"task "{title}" is dragged onto task "{target}""#)]
fn drag_onto_task(
    world: &mut BoardWorld,
    title: String,
    target: String,
) -> Result<(), eyre::Report> {
    let active = world.task_id(&title)?.to_string();
    let over = world.task_id(&target)?.to_string();
    drag_and_drop(world, &active, &over)
}

#[when(r#"task "{title}" is dragged onto list "{name}""#)]
fn drag_onto_list(world: &mut BoardWorld, title: String, name: String) -> Result<(), eyre::Report> {
    let active = world.task_id(&title)?.to_string();
    let over = world.list_id(&name)?.to_string();
    drag_and_drop(world, &active, &over)
}

#[when(r#"task "{title}" is dragged over list "{name}" and dropped outside"#)]
fn drag_and_drop_outside(
    world: &mut BoardWorld,
    title: String,
    name: String,
) -> Result<(), eyre::Report> {
    let active = world.task_id(&title)?.to_string();
    let over = world.list_id(&name)?.to_string();
    world.board.drag_start(&active)?;
    world.board.drag_over(&active, &over)?;
    let pending = world.board.drag_end(&active, None)?;
    eyre::ensure!(pending.is_none(), "an aborted drop must not persist");
    Ok(())
}

#[when(r#"list "{name}" is deleted"#)]
fn delete_list(world: &mut BoardWorld, name: String) -> Result<(), eyre::Report> {
    let id = world.list_id(&name)?;
    world.last_delete_result = Some(run_async(world.board.delete_list(&id)));
    Ok(())
}
