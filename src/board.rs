//! Task mutation facade.
//!
//! `TaskBoard` is the one entry point for changing tasks and categories.
//! It validates input before the store is touched, turns store-level
//! "nothing there" answers into not-found errors, and rebuilds the sidebar
//! snapshot from a fresh read after every successful mutation.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{
    is_hex_color, Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId,
    TaskPatch,
};
use crate::sort::{sort_tasks, Sections};
use crate::stats::{Progress, Sidebar, TaskStats};
use crate::store::Store;
use crate::view::{due_badge, DueBadge, EmptyState, ViewQuery};

/// Everything needed to render one task list.
#[derive(Debug, Clone, Serialize)]
pub struct TaskListing {
    pub view: String,
    pub title: String,
    pub sections: Sections,
    pub progress: Progress,
    /// Present only when nothing is visible.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_state: Option<EmptyState>,
    pub badges: BTreeMap<TaskId, DueBadge>,
}

impl TaskListing {
    /// Visible tasks in display order.
    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.sections.pending.iter().chain(self.sections.completed.iter())
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

pub struct TaskBoard {
    store: Box<dyn Store>,
    sidebar: Sidebar,
    pinned_today: Option<NaiveDate>,
}

impl TaskBoard {
    pub fn new(store: Box<dyn Store>) -> Result<Self> {
        let mut board = Self {
            store,
            sidebar: Sidebar::default(),
            pinned_today: None,
        };
        board.refresh()?;
        Ok(board)
    }

    /// Use a fixed reference date instead of the local calendar date.
    pub fn with_today(mut self, today: NaiveDate) -> Result<Self> {
        self.pinned_today = Some(today);
        self.refresh()?;
        Ok(self)
    }

    pub fn today(&self) -> NaiveDate {
        self.pinned_today
            .unwrap_or_else(|| Local::now().date_naive())
    }

    // --- tasks ---

    pub fn create(&mut self, mut fields: NewTask) -> Result<Task> {
        fields.title = required_text("title", &fields.title)?;
        let category_id = match fields.category_id {
            Some(id) => self.require_category(id)?,
            None => self
                .store
                .list_categories()?
                .first()
                .map(|category| category.id)
                .ok_or_else(|| Error::Validation("category is required".to_string()))?,
        };
        fields.category_id = Some(category_id);

        let task = self.store.create(fields)?;
        self.refresh()?;
        Ok(task)
    }

    /// Create a task from a title alone.
    pub fn quick_add(&mut self, title: &str) -> Result<Task> {
        self.create(NewTask::new(title))
    }

    pub fn update(&mut self, id: TaskId, mut patch: TaskPatch) -> Result<Task> {
        if let Some(title) = &patch.title {
            patch.title = Some(required_text("title", title)?);
        }
        let current = self.store.get(id)?;
        if let Some(category_id) = patch.category_id {
            self.require_category(category_id)?;
        }
        if patch.is_empty() {
            return Ok(current);
        }

        let task = self.store.update(id, &patch)?;
        self.refresh()?;
        Ok(task)
    }

    pub fn set_completed(&mut self, id: TaskId, completed: bool) -> Result<Task> {
        self.update(id, TaskPatch::completion(completed))
    }

    pub fn delete(&mut self, id: TaskId) -> Result<()> {
        if !self.store.delete(id)? {
            return Err(Error::TaskNotFound(id));
        }
        self.refresh()
    }

    /// Delete every existing id, skipping unknown ones. Returns the
    /// records actually removed.
    pub fn bulk_delete(&mut self, ids: &[TaskId]) -> Result<Vec<Task>> {
        let removed = self.store.bulk_delete(ids)?;
        self.refresh()?;
        Ok(removed)
    }

    pub fn task(&self, id: TaskId) -> Result<Task> {
        self.store.get(id)
    }

    // --- categories ---

    pub fn categories(&self) -> &[Category] {
        &self.sidebar.categories
    }

    pub fn category(&self, id: CategoryId) -> Result<Category> {
        self.store
            .get_category(id)?
            .ok_or(Error::CategoryNotFound(id))
    }

    pub fn create_category(&mut self, mut fields: NewCategory) -> Result<Category> {
        fields.name = required_text("name", &fields.name)?;
        check_color(&fields.color)?;
        let category = self.store.create_category(fields)?;
        self.refresh()?;
        Ok(category)
    }

    pub fn update_category(&mut self, id: CategoryId, mut patch: CategoryPatch) -> Result<Category> {
        if let Some(name) = &patch.name {
            patch.name = Some(required_text("name", name)?);
        }
        if let Some(color) = &patch.color {
            check_color(color)?;
        }
        let category = self
            .store
            .update_category(id, &patch)?
            .ok_or(Error::CategoryNotFound(id))?;
        self.refresh()?;
        Ok(category)
    }

    /// Fails with `CategoryInUse` while any task, open or completed,
    /// references the category.
    pub fn delete_category(&mut self, id: CategoryId) -> Result<()> {
        if !self.store.delete_category(id)? {
            return Err(Error::CategoryNotFound(id));
        }
        self.refresh()
    }

    // --- queries ---

    pub fn view(&self, query: &ViewQuery) -> Result<TaskListing> {
        let today = self.today();
        let mut visible = query.select(&self.store.list()?, today);
        sort_tasks(&mut visible);

        let category_name = match query.view {
            crate::view::View::Category(id) => self
                .sidebar
                .categories
                .iter()
                .find(|category| category.id == id)
                .map(|category| category.name.as_str()),
            _ => None,
        };
        let badges = visible
            .iter()
            .filter_map(|task| due_badge(task, today).map(|badge| (task.id, badge)))
            .collect();

        tracing::debug!(view = %query.view, visible = visible.len(), "built task listing");
        Ok(TaskListing {
            view: query.view.to_string(),
            title: query.view.title(category_name),
            progress: Progress::compute(&visible, query.view),
            empty_state: visible.is_empty().then(|| query.empty_state()),
            sections: Sections::split(&visible),
            badges,
        })
    }

    pub fn stats(&self) -> TaskStats {
        self.sidebar.stats
    }

    pub fn sidebar(&self) -> &Sidebar {
        &self.sidebar
    }

    /// Rebuild the sidebar snapshot from the store.
    pub fn refresh(&mut self) -> Result<()> {
        let tasks = self.store.list()?;
        let categories = self.store.list_categories()?;
        self.sidebar = Sidebar::compute(&tasks, categories, self.today());
        Ok(())
    }

    fn require_category(&self, id: CategoryId) -> Result<CategoryId> {
        self.store
            .get_category(id)?
            .map(|category| category.id)
            .ok_or(Error::CategoryNotFound(id))
    }
}

fn required_text(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

fn check_color(color: &str) -> Result<()> {
    if is_hex_color(color) {
        Ok(())
    } else {
        Err(Error::Validation(format!(
            "color '{color}' must look like #rgb or #rrggbb"
        )))
    }
}
