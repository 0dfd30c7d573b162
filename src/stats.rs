//! Counters derived from the full task collection.
//!
//! Nothing here is patched incrementally: every value is a fresh scan of
//! the tasks it is given.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Category, CategoryId, Task};
use crate::view::View;

/// Sidebar badge counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStats {
    pub today_count: usize,
    pub overdue_count: usize,
    pub completed_count: usize,
}

impl TaskStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        tasks.iter().fold(Self::default(), |mut stats, task| {
            if View::Today.includes(task, today) {
                stats.today_count += 1;
            }
            if View::Overdue.includes(task, today) {
                stats.overdue_count += 1;
            }
            if View::Completed.includes(task, today) {
                stats.completed_count += 1;
            }
            stats
        })
    }
}

/// Open tasks referencing `category_id`.
pub fn open_task_count(tasks: &[Task], category_id: CategoryId) -> usize {
    tasks
        .iter()
        .filter(|task| task.category_id == category_id && !task.completed)
        .count()
}

/// Overwrite each category's `task_count` from the live task list.
pub fn refresh_task_counts(categories: &mut [Category], tasks: &[Task]) {
    for category in categories.iter_mut() {
        category.task_count = open_task_count(tasks, category.id);
    }
}

/// Completion progress for the list header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
    pub percent: u8,
}

impl Progress {
    /// The completed view always reports 100%.
    pub fn compute(visible: &[Task], view: View) -> Self {
        let total = visible.len();
        let completed = visible.iter().filter(|task| task.completed).count();
        let percent = if view == View::Completed {
            100
        } else if total == 0 {
            0
        } else {
            ((completed * 100) / total) as u8
        };
        Self {
            completed,
            total,
            percent,
        }
    }
}

/// Everything the sidebar renders, computed in one pass over fresh data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Sidebar {
    /// Sum of open counts across categories.
    pub all_count: usize,
    #[serde(flatten)]
    pub stats: TaskStats,
    pub categories: Vec<Category>,
}

impl Sidebar {
    pub fn compute(tasks: &[Task], mut categories: Vec<Category>, today: NaiveDate) -> Self {
        refresh_task_counts(&mut categories, tasks);
        Self {
            all_count: categories.iter().map(|category| category.task_count).sum(),
            stats: TaskStats::compute(tasks, today),
            categories,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewCategory, NewTask};
    use chrono::{TimeZone, Utc};

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn task(id: u64, category: u64, due: Option<u32>, completed: bool) -> Task {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut task = NewTask::new(format!("Task {id}"))
            .in_category(category)
            .into_task(id, now)
            .unwrap();
        task.due_date = due.map(day);
        task.set_completed(completed, now);
        task
    }

    #[test]
    fn stats_match_view_sizes() {
        let tasks = vec![
            task(1, 1, Some(10), false),
            task(2, 1, Some(9), false),
            task(3, 1, Some(9), true),
            task(4, 2, None, false),
        ];
        let stats = TaskStats::compute(&tasks, day(10));
        assert_eq!(
            stats,
            TaskStats {
                today_count: 1,
                overdue_count: 1,
                completed_count: 1,
            }
        );
    }

    #[test]
    fn sidebar_counts_only_open_tasks() {
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let mut stale = NewCategory::new("Work", "#3B82F6").into_category(1, now);
        stale.task_count = 99;
        let other = NewCategory::new("Home", "#10B981").into_category(2, now);
        let tasks = vec![
            task(1, 1, None, false),
            task(2, 1, None, true),
            task(3, 2, None, false),
            task(4, 2, None, false),
        ];
        let sidebar = Sidebar::compute(&tasks, vec![stale, other], day(10));
        assert_eq!(sidebar.categories[0].task_count, 1);
        assert_eq!(sidebar.categories[1].task_count, 2);
        assert_eq!(sidebar.all_count, 3);
        assert_eq!(sidebar.stats.completed_count, 1);
    }

    #[test]
    fn progress_percent() {
        let tasks = vec![task(1, 1, None, true), task(2, 1, None, false), task(3, 1, None, false)];
        let progress = Progress::compute(&tasks, View::All);
        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.percent, 33);
        assert_eq!(Progress::compute(&[], View::All).percent, 0);
        assert_eq!(Progress::compute(&[], View::Completed).percent, 100);
    }
}
