//! taskflow - task filtering, ordering, statistics and mutation
//!
//! # Core Concepts
//!
//! - **Views**: named rules selecting tasks (all, today, overdue, completed,
//!   per category), composable with a free-text search
//! - **Ordering**: open before done, then priority, due date, recency
//! - **Stats**: sidebar counters always recomputed from live tasks
//! - **Board**: the single mutation entry point enforcing invariants
//! - **Stores**: interchangeable persistence backends behind two traits
//!
//! # Module Organization
//!
//! - `model`: Task and category records, drafts and patches
//! - `view`: View filter, search, due badges
//! - `sort`: Display ordering and completed-section split
//! - `stats`: Counters, progress and sidebar snapshot
//! - `store`: Store traits plus memory and file backends
//! - `board`: `TaskBoard` mutation facade
//! - `config`: Configuration loading from `.taskflow.toml`
//! - `error`: Error types and result aliases
//! - `storage`: Atomic JSON file I/O
//! - `lock`: File locking for the file backend
//! - `output`: Human and JSON output for the CLI
//! - `cli`: Command-line interface using clap

pub mod board;
pub mod cli;
pub mod config;
pub mod error;
pub mod lock;
pub mod model;
pub mod output;
pub mod sort;
pub mod stats;
pub mod storage;
pub mod store;
pub mod view;

pub use board::{TaskBoard, TaskListing};
pub use error::{Error, Result};
