//! Named task views and the free-text search that composes with them.
//!
//! Every predicate takes the reference date explicitly so a single pass
//! over the collection uses one "today" throughout.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::model::{CategoryId, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum View {
    #[default]
    All,
    Today,
    Overdue,
    Completed,
    Category(CategoryId),
}

impl View {
    /// Whether `task` belongs to this view on the given reference date.
    pub fn includes(&self, task: &Task, today: NaiveDate) -> bool {
        match self {
            View::All => true,
            View::Today => task.is_due_on(today) && !task.completed,
            View::Overdue => task.is_due_before(today) && !task.completed,
            View::Completed => task.completed,
            View::Category(id) => task.category_id == *id,
        }
    }

    /// Heading shown above the list. Category views use the category name.
    pub fn title(&self, category_name: Option<&str>) -> String {
        match self {
            View::All => "All Tasks".to_string(),
            View::Today => "Today's Tasks".to_string(),
            View::Overdue => "Overdue Tasks".to_string(),
            View::Completed => "Completed Tasks".to_string(),
            View::Category(_) => category_name.unwrap_or("Category").to_string(),
        }
    }

    pub fn empty_state(&self) -> EmptyState {
        match self {
            View::Today => EmptyState {
                title: "No tasks for today",
                description: "You're all caught up! Enjoy your productive day.",
            },
            View::Overdue => EmptyState {
                title: "No overdue tasks",
                description: "Great job staying on top of your deadlines!",
            },
            View::Completed => EmptyState {
                title: "No completed tasks yet",
                description: "Completed tasks will appear here. Start checking off those to-dos!",
            },
            View::All | View::Category(_) => EmptyState {
                title: "No tasks found",
                description: "Get started by creating your first task and organize your productivity",
            },
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::All => f.write_str("all"),
            View::Today => f.write_str("today"),
            View::Overdue => f.write_str("overdue"),
            View::Completed => f.write_str("completed"),
            View::Category(id) => write!(f, "category:{id}"),
        }
    }
}

impl FromStr for View {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let trimmed = s.trim().to_ascii_lowercase();
        match trimmed.as_str() {
            "all" | "" => Ok(View::All),
            "today" => Ok(View::Today),
            "overdue" => Ok(View::Overdue),
            "completed" => Ok(View::Completed),
            other => {
                let id = other
                    .strip_prefix("category:")
                    .and_then(|raw| raw.trim().parse::<CategoryId>().ok())
                    .ok_or_else(|| {
                        Error::InvalidArgument(format!(
                            "unknown view '{}' (expected all|today|overdue|completed|category:<id>)",
                            s.trim()
                        ))
                    })?;
                Ok(View::Category(id))
            }
        }
    }
}

/// Message pair shown when a view has nothing to display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EmptyState {
    pub title: &'static str,
    pub description: &'static str,
}

pub const SEARCH_EMPTY_STATE: EmptyState = EmptyState {
    title: "No matching tasks found",
    description: "Try adjusting your search terms or check different categories",
};

/// Subset of `tasks` in `view`, preserving input order.
pub fn filter_tasks(tasks: &[Task], view: View, today: NaiveDate) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| view.includes(task, today))
        .cloned()
        .collect()
}

/// Case-insensitive substring match against title or description.
/// A blank query matches everything.
pub fn matches_search(task: &Task, query: &str) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    task.title.to_lowercase().contains(&needle)
        || task.description.to_lowercase().contains(&needle)
}

/// A view plus the optional refinements the list screen applies after it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewQuery {
    pub view: View,
    pub search: Option<String>,
    pub hide_completed: bool,
}

impl ViewQuery {
    pub fn new(view: View) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn searching(&self) -> bool {
        self.search
            .as_deref()
            .is_some_and(|query| !query.trim().is_empty())
    }

    /// View filter first, then search, then the completed toggle.
    pub fn select(&self, tasks: &[Task], today: NaiveDate) -> Vec<Task> {
        let query = self.search.as_deref().unwrap_or("");
        tasks
            .iter()
            .filter(|task| self.view.includes(task, today))
            .filter(|task| matches_search(task, query))
            .filter(|task| !(self.hide_completed && task.completed))
            .cloned()
            .collect()
    }

    pub fn empty_state(&self) -> EmptyState {
        if self.searching() {
            SEARCH_EMPTY_STATE
        } else {
            self.view.empty_state()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DueStatus {
    Overdue,
    DueToday,
    Scheduled,
}

/// Due-date badge for a task card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DueBadge {
    pub status: DueStatus,
    pub label: String,
}

pub fn due_badge(task: &Task, today: NaiveDate) -> Option<DueBadge> {
    let due = task.due_date?;
    let status = if task.completed {
        DueStatus::Scheduled
    } else if due < today {
        DueStatus::Overdue
    } else if due == today {
        DueStatus::DueToday
    } else {
        DueStatus::Scheduled
    };
    Some(DueBadge {
        status,
        label: due.format("%b %-d").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewTask;
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn task(id: u64, due: Option<NaiveDate>, completed: bool) -> Task {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut task = NewTask::new(format!("Task {id}"))
            .in_category(1)
            .into_task(id, now)
            .unwrap();
        task.due_date = due;
        task.set_completed(completed, now);
        task
    }

    #[test]
    fn parses_view_selectors() {
        assert_eq!("Today".parse::<View>().unwrap(), View::Today);
        assert_eq!("category:4".parse::<View>().unwrap(), View::Category(4));
        assert_eq!(View::Category(4).to_string(), "category:4");
        assert!("category:x".parse::<View>().is_err());
        assert!("someday".parse::<View>().is_err());
    }

    #[test]
    fn due_today_is_never_overdue() {
        let today = day(10);
        let due_today = task(1, Some(today), false);
        assert!(View::Today.includes(&due_today, today));
        assert!(!View::Overdue.includes(&due_today, today));

        let done_late = task(2, Some(day(9)), true);
        assert!(!View::Overdue.includes(&done_late, today));
        assert!(View::Completed.includes(&done_late, today));
    }

    #[test]
    fn undated_tasks_only_show_in_all_and_category() {
        let today = day(10);
        let undated = task(1, None, false);
        assert!(View::All.includes(&undated, today));
        assert!(View::Category(1).includes(&undated, today));
        assert!(!View::Category(2).includes(&undated, today));
        assert!(!View::Today.includes(&undated, today));
        assert!(!View::Overdue.includes(&undated, today));
    }

    #[test]
    fn search_matches_title_or_description() {
        let mut t = task(1, None, false);
        t.title = "Buy Milk".to_string();
        t.description = "from the corner shop".to_string();
        assert!(matches_search(&t, "milk"));
        assert!(matches_search(&t, "CORNER"));
        assert!(matches_search(&t, "  "));
        assert!(!matches_search(&t, "bread"));
    }

    #[test]
    fn search_applies_after_view() {
        let today = day(10);
        let mut pending = task(1, Some(today), false);
        pending.title = "Call plumber".to_string();
        let mut done = task(2, Some(today), true);
        done.title = "Call bank".to_string();

        let query = ViewQuery::new(View::Today).with_search("call");
        let ids: Vec<u64> = query
            .select(&[pending, done], today)
            .into_iter()
            .map(|t| t.id)
            .collect();
        assert_eq!(ids, vec![1]);
    }

    #[test]
    fn search_changes_empty_state() {
        let query = ViewQuery::new(View::Overdue);
        assert_eq!(query.empty_state().title, "No overdue tasks");
        let query = query.with_search("x");
        assert_eq!(query.empty_state(), SEARCH_EMPTY_STATE);
    }

    #[test]
    fn due_badges() {
        let today = day(10);
        let badge = due_badge(&task(1, Some(day(5)), false), today).unwrap();
        assert_eq!(badge.status, DueStatus::Overdue);
        assert_eq!(badge.label, "Mar 5");

        let badge = due_badge(&task(2, Some(today), false), today).unwrap();
        assert_eq!(badge.status, DueStatus::DueToday);

        let badge = due_badge(&task(3, Some(day(5)), true), today).unwrap();
        assert_eq!(badge.status, DueStatus::Scheduled);

        assert!(due_badge(&task(4, None, false), today).is_none());
    }
}
