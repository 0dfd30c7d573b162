//! taskflow category commands

use crate::cli::Context;
use crate::error::Result;
use crate::model::{CategoryId, CategoryPatch, NewCategory};
use crate::output::{emit_success, HumanOutput};

pub fn run_ls(ctx: &Context) -> Result<()> {
    let board = ctx.open_board()?;
    let categories = board.categories();

    let mut human = HumanOutput::new("Categories");
    human.push_summary("Total", categories.len().to_string());
    for category in categories {
        human.push_detail(format!(
            "{} {} {} ({} open)",
            category.id, category.name, category.color, category.task_count
        ));
    }
    if categories.is_empty() {
        human.push_next_step("taskflow category add <name>");
    }

    emit_success(ctx.output, "category ls", &categories, Some(&human))
}

pub fn run_add(ctx: &Context, name: String, color: String) -> Result<()> {
    let mut board = ctx.open_board()?;
    let category = board.create_category(NewCategory::new(name, color))?;

    let mut human = HumanOutput::new(format!(
        "taskflow category add: {} {}",
        category.id, category.name
    ));
    human.push_summary("color", category.color.clone());
    human.push_next_step(format!("taskflow add \"<title>\" --category {}", category.id));

    emit_success(ctx.output, "category add", &category, Some(&human))
}

pub fn run_edit(
    ctx: &Context,
    id: CategoryId,
    name: Option<String>,
    color: Option<String>,
) -> Result<()> {
    let mut board = ctx.open_board()?;
    let category = board.update_category(id, CategoryPatch { name, color })?;

    let mut human = HumanOutput::new(format!(
        "taskflow category edit: {} {}",
        category.id, category.name
    ));
    human.push_summary("color", category.color.clone());
    human.push_summary("open tasks", category.task_count.to_string());

    emit_success(ctx.output, "category edit", &category, Some(&human))
}

pub fn run_rm(ctx: &Context, id: CategoryId) -> Result<()> {
    let mut board = ctx.open_board()?;
    let category = board.category(id)?;
    board.delete_category(id)?;

    let human = HumanOutput::new(format!(
        "taskflow category rm: {} {}",
        category.id, category.name
    ));

    emit_success(ctx.output, "category rm", &category, Some(&human))
}
