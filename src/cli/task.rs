//! taskflow task commands: list, stats, add, edit, done/reopen, rm.

use chrono::NaiveDate;
use serde::Serialize;

use crate::board::{TaskBoard, TaskListing};
use crate::cli::Context;
use crate::error::{Error, Result};
use crate::model::{CategoryId, NewTask, Priority, Task, TaskId, TaskPatch};
use crate::output::{emit_success, HumanOutput};
use crate::stats::Sidebar;
use crate::view::{DueStatus, View, ViewQuery};

/// Options for `taskflow list`
pub struct ListOptions {
    pub view: Option<View>,
    pub search: Option<String>,
    pub hide_completed: bool,
}

/// Options for `taskflow add`
pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<NaiveDate>,
    pub category: Option<CategoryId>,
}

/// Options for `taskflow edit`
pub struct EditOptions {
    pub id: TaskId,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due: Option<NaiveDate>,
    pub clear_due: bool,
    pub category: Option<CategoryId>,
}

#[derive(Serialize)]
struct RemoveReport {
    requested: Vec<TaskId>,
    removed: Vec<Task>,
    skipped: Vec<TaskId>,
}

pub fn run_list(ctx: &Context, options: ListOptions) -> Result<()> {
    let board = ctx.open_board()?;
    let view = match options.view {
        Some(view) => view,
        None => ctx.config.view.default_view()?,
    };
    if let View::Category(id) = view {
        board.category(id)?;
    }

    let query = ViewQuery {
        view,
        search: options.search,
        hide_completed: options.hide_completed,
    };
    let listing = board.view(&query)?;

    let mut human = HumanOutput::new(listing.title.clone());
    match listing.empty_state {
        Some(empty) => {
            human.push_summary(empty.title, "");
            human.push_summary(empty.description, "");
            if !query.searching() {
                human.push_next_step("taskflow add \"<title>\"");
            }
        }
        None => {
            human.push_summary(
                "Progress",
                format!(
                    "{}/{} ({}%)",
                    listing.progress.completed, listing.progress.total, listing.progress.percent
                ),
            );
            if !listing.sections.completed.is_empty() {
                human.push_summary(listing.sections.completed_heading(), "");
            }
            for task in listing.tasks() {
                human.push_detail(task_line(&board, &listing, task));
            }
        }
    }

    emit_success(ctx.output, "list", &listing, Some(&human))
}

pub fn run_stats(ctx: &Context) -> Result<()> {
    let board = ctx.open_board()?;
    let sidebar: &Sidebar = board.sidebar();

    let mut human = HumanOutput::new("taskflow stats");
    human.push_summary("All Tasks", sidebar.all_count.to_string());
    human.push_summary("Today", sidebar.stats.today_count.to_string());
    human.push_summary("Overdue", sidebar.stats.overdue_count.to_string());
    human.push_summary("Completed", sidebar.stats.completed_count.to_string());
    for category in &sidebar.categories {
        human.push_detail(format!(
            "{} {} ({} open)",
            category.id, category.name, category.task_count
        ));
    }

    emit_success(ctx.output, "stats", sidebar, Some(&human))
}

pub fn run_add(ctx: &Context, options: AddOptions) -> Result<()> {
    let mut board = ctx.open_board()?;
    let task = board.create(NewTask {
        title: options.title,
        description: options.description,
        priority: options.priority,
        due_date: options.due,
        category_id: options.category,
    })?;

    let mut human = HumanOutput::new(format!("taskflow add: #{} {}", task.id, task.title));
    push_task_summary(&mut human, &board, &task);
    human.push_next_step(format!("taskflow done {}", task.id));

    emit_success(ctx.output, "add", &task, Some(&human))
}

pub fn run_edit(ctx: &Context, options: EditOptions) -> Result<()> {
    let patch = TaskPatch {
        title: options.title,
        description: options.description,
        priority: options.priority,
        due_date: if options.clear_due {
            Some(None)
        } else {
            options.due.map(Some)
        },
        completed: None,
        category_id: options.category,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change; pass at least one field".to_string(),
        ));
    }

    let mut board = ctx.open_board()?;
    let task = board.update(options.id, patch)?;

    let mut human = HumanOutput::new(format!("taskflow edit: #{} {}", task.id, task.title));
    push_task_summary(&mut human, &board, &task);

    emit_success(ctx.output, "edit", &task, Some(&human))
}

pub fn run_set_completed(ctx: &Context, id: TaskId, completed: bool) -> Result<()> {
    let mut board = ctx.open_board()?;
    let task = board.set_completed(id, completed)?;

    let (command, verb) = if completed {
        ("done", "completed")
    } else {
        ("reopen", "reopened")
    };
    let mut human = HumanOutput::new(format!("taskflow {command}: #{} {verb}", task.id));
    push_task_summary(&mut human, &board, &task);

    emit_success(ctx.output, command, &task, Some(&human))
}

/// A single id must exist; several ids are deleted best-effort.
pub fn run_rm(ctx: &Context, ids: &[TaskId]) -> Result<()> {
    let mut board = ctx.open_board()?;
    let removed = match ids {
        [id] => {
            let task = board.task(*id)?;
            board.delete(*id)?;
            vec![task]
        }
        _ => board.bulk_delete(ids)?,
    };
    let skipped: Vec<TaskId> = ids
        .iter()
        .copied()
        .filter(|id| !removed.iter().any(|task| task.id == *id))
        .collect();

    let mut human = HumanOutput::new(format!("taskflow rm: {} removed", removed.len()));
    for task in &removed {
        human.push_detail(format!("#{} {}", task.id, task.title));
    }
    for id in &skipped {
        human.push_warning(format!("task {id} not found; skipped"));
    }

    let report = RemoveReport {
        requested: ids.to_vec(),
        removed,
        skipped,
    };
    emit_success(ctx.output, "rm", &report, Some(&human))
}

fn task_line(board: &TaskBoard, listing: &TaskListing, task: &Task) -> String {
    let mark = if task.completed { "x" } else { " " };
    let mut line = format!("[{mark}] #{} {}", task.id, task.title);
    if let Some(priority) = task.priority {
        line.push_str(&format!(" ({priority})"));
    }
    if let Some(badge) = listing.badges.get(&task.id) {
        let note = match badge.status {
            DueStatus::Overdue => " overdue",
            DueStatus::DueToday => " today",
            DueStatus::Scheduled => "",
        };
        line.push_str(&format!(" due {}{note}", badge.label));
    }
    if let Some(name) = category_name(board, task.category_id) {
        line.push_str(&format!(" [{name}]"));
    }
    line
}

fn push_task_summary(human: &mut HumanOutput, board: &TaskBoard, task: &Task) {
    if let Some(priority) = task.priority {
        human.push_summary("priority", priority.to_string());
    }
    if let Some(due) = task.due_date {
        human.push_summary("due", due.to_string());
    }
    let category = category_name(board, task.category_id)
        .map(str::to_string)
        .unwrap_or_else(|| task.category_id.to_string());
    human.push_summary("category", category);
    human.push_summary("completed", task.completed.to_string());
}

fn category_name(board: &TaskBoard, id: CategoryId) -> Option<&str> {
    board
        .categories()
        .iter()
        .find(|category| category.id == id)
        .map(|category| category.name.as_str())
}
