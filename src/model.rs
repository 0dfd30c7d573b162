//! Task and category records.
//!
//! These are the canonical shapes every layer works with. Persistence
//! backends translate to and from them at their own boundary
//! (see `store::record`), so nothing here knows how a backend names its
//! fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub type TaskId = u64;
pub type CategoryId = u64;

/// Display color used when a category has none of its own.
pub const DEFAULT_CATEGORY_COLOR: &str = "#5B47E0";

/// Calendar date format shared by due dates and CLI arguments.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::Low, Priority::Medium, Priority::High];

    /// Sort weight: high 3, medium 2, low 1.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }

    /// Lenient parse used for persisted values; unknown strings yield `None`.
    pub fn parse(value: &str) -> Option<Self> {
        let trimmed = value.trim();
        Priority::ALL
            .into_iter()
            .find(|priority| priority.as_str().eq_ignore_ascii_case(trimmed))
    }
}

/// Rank of an optional priority; missing or unrecognized ranks lowest.
pub fn priority_rank(priority: Option<Priority>) -> u8 {
    priority.map_or(0, Priority::rank)
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Priority::parse(s).ok_or_else(|| {
            Error::InvalidArgument(format!(
                "unknown priority '{}' (expected low|medium|high)",
                s.trim()
            ))
        })
    }
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT).map_err(|err| {
        Error::InvalidArgument(format!("invalid date '{}': {err}", value.trim()))
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    pub category_id: CategoryId,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    pub fn is_due_on(&self, day: NaiveDate) -> bool {
        self.due_date == Some(day)
    }

    pub fn is_due_before(&self, day: NaiveDate) -> bool {
        self.due_date.is_some_and(|due| due < day)
    }

    /// Move between the incomplete and complete states.
    ///
    /// Completing stamps `completed_at` unless a stamp is already present;
    /// reopening always clears it.
    pub fn set_completed(&mut self, completed: bool, now: DateTime<Utc>) {
        self.completed = completed;
        if completed {
            if self.completed_at.is_none() {
                self.completed_at = Some(now);
            }
        } else {
            self.completed_at = None;
        }
    }

    /// Merge a patch into this record, keeping `completed_at` in step with
    /// `completed`. `id` and `created_at` never change.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(description) = &patch.description {
            self.description = description.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = Some(priority);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(category_id) = patch.category_id {
            self.category_id = category_id;
        }
        if let Some(completed) = patch.completed {
            self.set_completed(completed, now);
        }
    }
}

/// Fields accepted when creating a task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub due_date: Option<NaiveDate>,
    pub category_id: Option<CategoryId>,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn in_category(mut self, category_id: CategoryId) -> Self {
        self.category_id = Some(category_id);
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn due(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Build the stored record. New tasks always start incomplete.
    pub fn into_task(self, id: TaskId, now: DateTime<Utc>) -> Result<Task> {
        let category_id = self
            .category_id
            .ok_or_else(|| Error::Validation("category is required".to_string()))?;
        Ok(Task {
            id,
            title: self.title,
            description: self.description.unwrap_or_default(),
            priority: Some(self.priority.unwrap_or_default()),
            due_date: self.due_date,
            completed: false,
            category_id,
            created_at: now,
            completed_at: None,
        })
    }
}

/// Partial update for a task. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub completed: Option<bool>,
    pub category_id: Option<CategoryId>,
}

impl TaskPatch {
    pub fn completion(completed: bool) -> Self {
        Self {
            completed: Some(completed),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
    /// Open tasks referencing this category, computed on every read.
    #[serde(default)]
    pub task_count: usize,
}

impl Category {
    pub fn apply(&mut self, patch: &CategoryPatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(color) = &patch.color {
            self.color = color.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    #[serde(default = "default_category_color")]
    pub color: String,
}

fn default_category_color() -> String {
    DEFAULT_CATEGORY_COLOR.to_string()
}

impl NewCategory {
    pub fn new(name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            color: color.into(),
        }
    }

    pub fn into_category(self, id: CategoryId, now: DateTime<Utc>) -> Category {
        Category {
            id,
            name: self.name,
            color: self.color,
            created_at: now,
            task_count: 0,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub color: Option<String>,
}

/// Accepts `#rgb` and `#rrggbb`.
pub fn is_hex_color(value: &str) -> bool {
    let Some(digits) = value.strip_prefix('#') else {
        return false;
    };
    matches!(digits.len(), 3 | 6) && digits.chars().all(|ch| ch.is_ascii_hexdigit())
}

/// Next id after the largest live one, so it never collides with an
/// existing record. Deleting the current maximum frees its id again.
pub fn next_id(existing: impl IntoIterator<Item = u64>) -> u64 {
    existing.into_iter().max().unwrap_or(0) + 1
}
