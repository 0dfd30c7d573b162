//! Display ordering for task lists.

use std::cmp::Ordering;

use serde::Serialize;

use crate::model::{priority_rank, Task};

/// Order tasks for display:
/// incomplete before complete, higher priority first, dated before undated
/// (earlier date first), then newest `created_at` first. Remaining ties fall
/// back to id so the order is total.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(compare_tasks);
}

pub fn compare_tasks(left: &Task, right: &Task) -> Ordering {
    left.completed
        .cmp(&right.completed)
        .then_with(|| priority_rank(right.priority).cmp(&priority_rank(left.priority)))
        .then_with(|| due_rank(left).cmp(&due_rank(right)))
        .then_with(|| right.created_at.cmp(&left.created_at))
        .then_with(|| left.id.cmp(&right.id))
}

fn due_rank(task: &Task) -> (u8, Option<chrono::NaiveDate>) {
    match task.due_date {
        Some(due) => (0, Some(due)),
        None => (1, None),
    }
}

/// A sorted list split on the completion boundary.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Sections {
    pub pending: Vec<Task>,
    pub completed: Vec<Task>,
}

impl Sections {
    /// Split an already sorted list; no re-ordering happens here.
    pub fn split(sorted: &[Task]) -> Self {
        let (completed, pending): (Vec<Task>, Vec<Task>) = sorted.iter().cloned().partition(|task| task.completed);
        Self { pending, completed }
    }

    pub fn completed_heading(&self) -> String {
        format!("Completed ({})", self.completed.len())
    }

    pub fn len(&self) -> usize {
        self.pending.len() + self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
