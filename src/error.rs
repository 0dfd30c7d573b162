//! Error types for taskflow
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (validation, unknown id, bad args or config)
//! - 3: Blocked by a constraint (category still referenced by tasks)
//! - 4: Operation failed (store unreachable, I/O, lock contention)

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the taskflow CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const CONSTRAINT_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskflow operations
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Task not found: {0}")]
    TaskNotFound(u64),

    #[error("Category not found: {0}")]
    CategoryNotFound(u64),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    // Constraint violations (exit code 3)
    #[error("Cannot delete category {id}: {tasks} task(s) still reference it")]
    CategoryInUse { id: u64, tasks: usize },

    // Transport failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Lock acquisition failed: {0}")]
    LockFailed(PathBuf),

    #[error("Store unavailable: {0}")]
    Transport(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Validation(_)
            | Error::TaskNotFound(_)
            | Error::CategoryNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_) => exit_codes::USER_ERROR,

            Error::CategoryInUse { .. } => exit_codes::CONSTRAINT_BLOCKED,

            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::LockFailed(_)
            | Error::Transport(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable name of the error kind, used in JSON output
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::TaskNotFound(_) | Error::CategoryNotFound(_) => "not_found",
            Error::CategoryInUse { .. } => "constraint_violation",
            Error::InvalidConfig(_) | Error::InvalidArgument(_) => "user_error",
            _ => "transport_error",
        }
    }

    /// True for the not-found kind, which bulk callers may treat as satisfied
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::TaskNotFound(_) | Error::CategoryNotFound(_))
    }

    /// Structured fields for machine-readable output
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::TaskNotFound(id) => Some(serde_json::json!({ "task_id": id })),
            Error::CategoryNotFound(id) => Some(serde_json::json!({ "category_id": id })),
            Error::CategoryInUse { id, tasks } => Some(serde_json::json!({
                "category_id": id,
                "tasks": tasks,
            })),
            Error::Validation(message)
            | Error::InvalidConfig(message)
            | Error::InvalidArgument(message)
            | Error::Transport(message) => Some(serde_json::json!({ "message": message })),
            Error::LockFailed(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for taskflow operations
pub type Result<T> = std::result::Result<T, Error>;

/// Wrapper for displaying errors in JSON format
#[derive(serde::Serialize)]
pub struct JsonError {
    pub error: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            error: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
        }
    }
}
