//! Persisted record layout.
//!
//! Stored rows use the record-API field names (`Id`, `title_c`,
//! `due_date_c`, ...). This module is the only place that knows them; it
//! converts rows to the canonical `Task` / `Category` shapes and back.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{Category, CategoryId, Priority, Task, TaskId, TaskPatch, DATE_FORMAT};

pub const SCHEMA_VERSION: &str = "taskflow.records.v1";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskRow {
    #[serde(rename = "Id")]
    pub id: TaskId,
    pub title_c: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description_c: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority_c: Option<String>,
    #[serde(default)]
    pub due_date_c: Option<String>,
    #[serde(default)]
    pub completed_c: bool,
    pub category_id_c: CategoryId,
    pub created_at_c: DateTime<Utc>,
    #[serde(default)]
    pub completed_at_c: Option<DateTime<Utc>>,
}

impl From<&Task> for TaskRow {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id,
            title_c: task.title.clone(),
            description_c: Some(task.description.clone()),
            priority_c: task.priority.map(|priority| priority.as_str().to_string()),
            due_date_c: task.due_date.map(|due| due.format(DATE_FORMAT).to_string()),
            completed_c: task.completed,
            category_id_c: task.category_id,
            created_at_c: task.created_at,
            completed_at_c: task.completed_at,
        }
    }
}

impl TaskRow {
    /// Convert to the canonical record. Unparsable priorities and dates
    /// degrade to "none" instead of failing the whole read.
    pub fn into_task(self) -> Task {
        let priority = self.priority_c.as_deref().and_then(|raw| {
            let parsed = Priority::parse(raw);
            if parsed.is_none() {
                tracing::warn!(task_id = self.id, priority = raw, "unrecognized priority");
            }
            parsed
        });
        let due_date = self
            .due_date_c
            .as_deref()
            .filter(|raw| !raw.trim().is_empty())
            .and_then(|raw| match NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT) {
                Ok(date) => Some(date),
                Err(err) => {
                    tracing::warn!(task_id = self.id, due_date = raw, %err, "malformed due date");
                    None
                }
            });
        let completed_at = match (self.completed_c, self.completed_at_c) {
            (false, _) => None,
            (true, Some(at)) => Some(at),
            (true, None) => {
                tracing::warn!(task_id = self.id, "completed task without completion time");
                Some(self.created_at_c)
            }
        };
        Task {
            id: self.id,
            title: self.title_c,
            description: self.description_c.unwrap_or_default(),
            priority,
            due_date,
            completed: self.completed_c,
            category_id: self.category_id_c,
            created_at: self.created_at_c,
            completed_at,
        }
    }

    /// Merge `patch` into this row and return the updated record.
    ///
    /// Stored priority and due date strings are rewritten only when the
    /// patch sets them, so values that failed to parse survive edits to
    /// other fields.
    pub fn apply(&mut self, patch: &TaskPatch, now: DateTime<Utc>) -> Task {
        let mut task = self.clone().into_task();
        task.apply(patch, now);

        let mut row = TaskRow::from(&task);
        if patch.priority.is_none() {
            row.priority_c = self.priority_c.take();
        }
        if patch.due_date.is_none() {
            row.due_date_c = self.due_date_c.take();
        }
        *self = row;
        task
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryRow {
    #[serde(rename = "Id")]
    pub id: CategoryId,
    pub name_c: String,
    pub color_c: String,
    pub created_at_c: DateTime<Utc>,
}

impl From<&Category> for CategoryRow {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name_c: category.name.clone(),
            color_c: category.color.clone(),
            created_at_c: category.created_at,
        }
    }
}

impl CategoryRow {
    /// `task_count` is left at zero; callers fill it from live tasks.
    pub fn into_category(self) -> Category {
        Category {
            id: self.id,
            name: self.name_c,
            color: self.color_c,
            created_at: self.created_at_c,
            task_count: 0,
        }
    }
}

/// Whole-file document for the file backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreDocument {
    pub schema_version: String,
    #[serde(default)]
    pub tasks: Vec<TaskRow>,
    #[serde(default)]
    pub categories: Vec<CategoryRow>,
}

impl StoreDocument {
    pub fn empty() -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            tasks: Vec::new(),
            categories: Vec::new(),
        }
    }

    pub fn require_category(&self, id: CategoryId) -> Result<()> {
        if self.categories.iter().any(|row| row.id == id) {
            Ok(())
        } else {
            Err(Error::CategoryNotFound(id))
        }
    }

    pub fn tasks(&self) -> Vec<Task> {
        self.tasks.iter().cloned().map(TaskRow::into_task).collect()
    }

    pub fn categories(&self) -> Vec<Category> {
        self.categories
            .iter()
            .cloned()
            .map(CategoryRow::into_category)
            .collect()
    }
}
