//! In-memory store.

use chrono::Utc;

use crate::error::{Error, Result};
use crate::model::{
    next_id, Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};
use crate::stats::{open_task_count, refresh_task_counts};
use crate::store::{CategoryStore, TaskStore};

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tasks: Vec<Task>,
    categories: Vec<Category>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store containing the given categories and no tasks.
    pub fn seeded(categories: Vec<NewCategory>) -> Self {
        let mut store = Self::new();
        let now = Utc::now();
        for fields in categories {
            let id = next_id(store.categories.iter().map(|c| c.id));
            store.categories.push(fields.into_category(id, now));
        }
        store
    }

    /// Load existing records verbatim, e.g. fixtures.
    pub fn with_records(tasks: Vec<Task>, categories: Vec<Category>) -> Self {
        Self { tasks, categories }
    }

    fn position(&self, id: TaskId) -> Option<usize> {
        self.tasks.iter().position(|task| task.id == id)
    }

    fn require_category(&self, id: CategoryId) -> Result<()> {
        if self.categories.iter().any(|category| category.id == id) {
            Ok(())
        } else {
            Err(Error::CategoryNotFound(id))
        }
    }
}

impl TaskStore for MemoryStore {
    fn list(&self) -> Result<Vec<Task>> {
        Ok(self.tasks.clone())
    }

    fn get(&self, id: TaskId) -> Result<Task> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .cloned()
            .ok_or(Error::TaskNotFound(id))
    }

    fn create(&mut self, fields: NewTask) -> Result<Task> {
        if let Some(category_id) = fields.category_id {
            self.require_category(category_id)?;
        }
        let id = next_id(self.tasks.iter().map(|task| task.id));
        let task = fields.into_task(id, Utc::now())?;
        self.tasks.push(task.clone());
        tracing::info!(task_id = id, "task created");
        Ok(task)
    }

    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let index = self.position(id).ok_or(Error::TaskNotFound(id))?;
        if let Some(category_id) = patch.category_id {
            self.require_category(category_id)?;
        }
        let task = &mut self.tasks[index];
        task.apply(patch, Utc::now());
        tracing::info!(task_id = id, "task updated");
        Ok(task.clone())
    }

    fn delete(&mut self, id: TaskId) -> Result<bool> {
        match self.position(id) {
            Some(index) => {
                self.tasks.remove(index);
                tracing::info!(task_id = id, "task deleted");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn bulk_delete(&mut self, ids: &[TaskId]) -> Result<Vec<Task>> {
        let mut removed = Vec::new();
        for id in ids {
            if let Some(index) = self.position(*id) {
                removed.push(self.tasks.remove(index));
            }
        }
        tracing::info!(requested = ids.len(), removed = removed.len(), "tasks bulk deleted");
        Ok(removed)
    }
}

impl CategoryStore for MemoryStore {
    fn list_categories(&self) -> Result<Vec<Category>> {
        let mut categories = self.categories.clone();
        refresh_task_counts(&mut categories, &self.tasks);
        Ok(categories)
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        Ok(self
            .categories
            .iter()
            .find(|category| category.id == id)
            .map(|category| Category {
                task_count: open_task_count(&self.tasks, id),
                ..category.clone()
            }))
    }

    fn create_category(&mut self, fields: NewCategory) -> Result<Category> {
        let id = next_id(self.categories.iter().map(|category| category.id));
        let category = fields.into_category(id, Utc::now());
        self.categories.push(category.clone());
        tracing::info!(category_id = id, "category created");
        Ok(category)
    }

    fn update_category(
        &mut self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Option<Category>> {
        let Some(category) = self.categories.iter_mut().find(|category| category.id == id) else {
            return Ok(None);
        };
        category.apply(patch);
        tracing::info!(category_id = id, "category updated");
        let mut updated = category.clone();
        updated.task_count = open_task_count(&self.tasks, id);
        Ok(Some(updated))
    }

    fn delete_category(&mut self, id: CategoryId) -> Result<bool> {
        let Some(index) = self.categories.iter().position(|category| category.id == id) else {
            return Ok(false);
        };
        let referencing = self.tasks.iter().filter(|task| task.category_id == id).count();
        if referencing > 0 {
            return Err(Error::CategoryInUse {
                id,
                tasks: referencing,
            });
        }
        self.categories.remove(index);
        tracing::info!(category_id = id, "category deleted");
        Ok(true)
    }
}
