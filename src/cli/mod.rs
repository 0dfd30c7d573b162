//! Command-line interface for taskflow
//!
//! This module defines the CLI structure using clap derive macros.
//! Task commands live in `task`, category commands in `category`.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::board::TaskBoard;
use crate::config::{Backend, Config};
use crate::error::Result;
use crate::model::{CategoryId, Priority, TaskId, DEFAULT_CATEGORY_COLOR};
use crate::output::OutputOptions;
use crate::store::open_store;
use crate::view::View;

mod category;
mod task;

/// taskflow - a small task manager
///
/// Tasks live in categories, carry a priority and an optional due date, and
/// are listed through views: all, today, overdue, completed, or a category.
#[derive(Parser, Debug)]
#[command(name = "taskflow")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (defaults to ./.taskflow.toml)
    #[arg(long, global = true, env = "TASKFLOW_CONFIG")]
    pub config: Option<PathBuf>,

    /// Data file; selects the file backend
    #[arg(long, global = true, env = "TASKFLOW_DATA")]
    pub data: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List tasks in a view
    List {
        /// View: all, today, overdue, completed, category:<id>
        #[arg(long)]
        view: Option<View>,

        /// Shortcut for --view category:<id>
        #[arg(long, conflicts_with = "view")]
        category: Option<CategoryId>,

        /// Case-insensitive text to match in title or description
        #[arg(short, long)]
        search: Option<String>,

        /// Leave completed tasks out of the list
        #[arg(long)]
        hide_completed: bool,
    },

    /// Show sidebar counters
    Stats,

    /// Add a task
    Add {
        /// Task title
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// low, medium or high (default medium)
        #[arg(short, long)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<NaiveDate>,

        /// Category id (defaults to the first category)
        #[arg(short, long)]
        category: Option<CategoryId>,
    },

    /// Change fields of a task
    Edit {
        id: TaskId,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<Priority>,

        /// Due date (YYYY-MM-DD)
        #[arg(long, conflicts_with = "clear_due")]
        due: Option<NaiveDate>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short, long)]
        category: Option<CategoryId>,
    },

    /// Mark a task completed
    Done { id: TaskId },

    /// Mark a completed task open again
    Reopen { id: TaskId },

    /// Delete tasks
    Rm {
        #[arg(required = true)]
        ids: Vec<TaskId>,
    },

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),
}

/// Category subcommands
#[derive(Subcommand, Debug)]
pub enum CategoryCommands {
    /// List categories with open task counts
    Ls,

    /// Create a category
    Add {
        name: String,

        /// Hex color (#rgb or #rrggbb)
        #[arg(long, default_value = DEFAULT_CATEGORY_COLOR)]
        color: String,
    },

    /// Rename or recolor a category
    Edit {
        id: CategoryId,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        color: Option<String>,
    },

    /// Delete a category that no task references
    Rm { id: CategoryId },
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    pub config: Config,
    pub output: OutputOptions,
}

impl Context {
    /// Load config from `--config` or the working directory, then apply
    /// `--data` on top.
    pub fn load(config: Option<PathBuf>, data: Option<PathBuf>, output: OutputOptions) -> Result<Self> {
        let mut config = match config {
            Some(path) => Config::load(&path)?,
            None => {
                let cwd = std::env::current_dir()?;
                Config::load_from_dir(&cwd)?
            }
        };
        if let Some(path) = data {
            config.store.backend = Backend::File;
            config.store.path = Some(path);
        }
        Ok(Self { config, output })
    }

    pub fn open_board(&self) -> Result<TaskBoard> {
        TaskBoard::new(open_store(&self.config)?)
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::load(
            self.config,
            self.data,
            OutputOptions {
                json: self.json,
                quiet: self.quiet,
            },
        )?;

        match self.command {
            Commands::List { view, category, search, hide_completed } => {
                task::run_list(&ctx, task::ListOptions {
                    view: category.map(View::Category).or(view),
                    search,
                    hide_completed,
                })
            }
            Commands::Stats => task::run_stats(&ctx),
            Commands::Add { title, description, priority, due, category } => {
                task::run_add(&ctx, task::AddOptions {
                    title,
                    description,
                    priority,
                    due,
                    category,
                })
            }
            Commands::Edit { id, title, description, priority, due, clear_due, category } => {
                task::run_edit(&ctx, task::EditOptions {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    clear_due,
                    category,
                })
            }
            Commands::Done { id } => task::run_set_completed(&ctx, id, true),
            Commands::Reopen { id } => task::run_set_completed(&ctx, id, false),
            Commands::Rm { ids } => task::run_rm(&ctx, &ids),
            Commands::Category(cmd) => match cmd {
                CategoryCommands::Ls => category::run_ls(&ctx),
                CategoryCommands::Add { name, color } => category::run_add(&ctx, name, color),
                CategoryCommands::Edit { id, name, color } => {
                    category::run_edit(&ctx, id, name, color)
                }
                CategoryCommands::Rm { id } => category::run_rm(&ctx, id),
            },
        }
    }
}
