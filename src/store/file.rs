//! File-backed store.
//!
//! The whole collection lives in one JSON document (see `record`). Each
//! call locks `<path>.lock`, loads the document, and for mutations writes
//! it back atomically before releasing the lock. Reference checks and the
//! writes they guard therefore happen under the same lock.

use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::error::{Error, Result};
use crate::lock::{lock_path_for, FileLock};
use crate::model::{
    next_id, Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};
use crate::stats::{open_task_count, refresh_task_counts};
use crate::storage;
use crate::store::record::{CategoryRow, StoreDocument, TaskRow, SCHEMA_VERSION};
use crate::store::{CategoryStore, TaskStore};

#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
    lock_timeout_ms: u64,
}

impl FileStore {
    pub fn open(path: impl Into<PathBuf>, lock_timeout_ms: u64) -> Result<Self> {
        let path = path.into();
        if path.is_dir() {
            return Err(Error::InvalidConfig(format!(
                "store path {} is a directory",
                path.display()
            )));
        }
        Ok(Self {
            path,
            lock_timeout_ms,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the seed categories when the data file does not exist yet.
    pub fn seed_if_empty(&self, seed: Vec<NewCategory>) -> Result<()> {
        let _lock = self.lock()?;
        if self.path.exists() {
            return Ok(());
        }
        let mut document = StoreDocument::empty();
        let now = Utc::now();
        for fields in seed {
            let id = next_id(document.categories.iter().map(|row| row.id));
            document
                .categories
                .push(CategoryRow::from(&fields.into_category(id, now)));
        }
        tracing::info!(
            path = %self.path.display(),
            categories = document.categories.len(),
            "initialized store"
        );
        storage::write_json(&self.path, &document)
    }

    fn lock(&self) -> Result<FileLock> {
        let lock = FileLock::acquire(lock_path_for(&self.path), self.lock_timeout_ms)?;
        tracing::trace!(lock = %lock.path().display(), "acquired store lock");
        Ok(lock)
    }

    fn load(&self) -> Result<StoreDocument> {
        let document: StoreDocument =
            storage::read_json_if_exists(&self.path)?.unwrap_or_else(StoreDocument::empty);
        if document.schema_version != SCHEMA_VERSION {
            return Err(Error::Transport(format!(
                "unsupported schema '{}' in {}",
                document.schema_version,
                self.path.display()
            )));
        }
        tracing::debug!(
            path = %self.path.display(),
            tasks = document.tasks.len(),
            categories = document.categories.len(),
            "loaded store document"
        );
        Ok(document)
    }

    fn read<T>(&self, f: impl FnOnce(&StoreDocument) -> Result<T>) -> Result<T> {
        let _lock = self.lock()?;
        let document = self.load()?;
        f(&document)
    }

    fn write<T>(&self, f: impl FnOnce(&mut StoreDocument) -> Result<T>) -> Result<T> {
        let _lock = self.lock()?;
        let mut document = self.load()?;
        let output = f(&mut document)?;
        storage::write_json(&self.path, &document)?;
        Ok(output)
    }
}

impl TaskStore for FileStore {
    fn list(&self) -> Result<Vec<Task>> {
        self.read(|document| Ok(document.tasks()))
    }

    fn get(&self, id: TaskId) -> Result<Task> {
        self.read(|document| {
            document
                .tasks
                .iter()
                .find(|row| row.id == id)
                .cloned()
                .map(TaskRow::into_task)
                .ok_or(Error::TaskNotFound(id))
        })
    }

    fn create(&mut self, fields: NewTask) -> Result<Task> {
        let task = self.write(|document| {
            if let Some(category_id) = fields.category_id {
                document.require_category(category_id)?;
            }
            let id = next_id(document.tasks.iter().map(|row| row.id));
            let task = fields.into_task(id, Utc::now())?;
            document.tasks.push(TaskRow::from(&task));
            Ok(task)
        })?;
        tracing::info!(task_id = task.id, "task created");
        Ok(task)
    }

    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task> {
        let task = self.write(|document| {
            let index = document
                .tasks
                .iter()
                .position(|row| row.id == id)
                .ok_or(Error::TaskNotFound(id))?;
            if let Some(category_id) = patch.category_id {
                document.require_category(category_id)?;
            }
            Ok(document.tasks[index].apply(patch, Utc::now()))
        })?;
        tracing::info!(task_id = id, "task updated");
        Ok(task)
    }

    fn delete(&mut self, id: TaskId) -> Result<bool> {
        // Skip the rewrite when there is nothing to remove.
        if !self.read(|document| Ok(document.tasks.iter().any(|row| row.id == id)))? {
            return Ok(false);
        }
        let removed = self.write(|document| {
            let before = document.tasks.len();
            document.tasks.retain(|row| row.id != id);
            Ok(document.tasks.len() != before)
        })?;
        if removed {
            tracing::info!(task_id = id, "task deleted");
        }
        Ok(removed)
    }

    fn bulk_delete(&mut self, ids: &[TaskId]) -> Result<Vec<Task>> {
        let removed = self.write(|document| {
            let mut removed = Vec::new();
            for id in ids {
                if let Some(index) = document.tasks.iter().position(|row| row.id == *id) {
                    removed.push(document.tasks.remove(index).into_task());
                }
            }
            Ok(removed)
        })?;
        tracing::info!(requested = ids.len(), removed = removed.len(), "tasks bulk deleted");
        Ok(removed)
    }
}

impl CategoryStore for FileStore {
    fn list_categories(&self) -> Result<Vec<Category>> {
        self.read(|document| {
            let mut categories = document.categories();
            refresh_task_counts(&mut categories, &document.tasks());
            Ok(categories)
        })
    }

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>> {
        self.read(|document| {
            Ok(document
                .categories
                .iter()
                .find(|row| row.id == id)
                .cloned()
                .map(|row| Category {
                    task_count: open_task_count(&document.tasks(), id),
                    ..row.into_category()
                }))
        })
    }

    fn create_category(&mut self, fields: NewCategory) -> Result<Category> {
        let category = self.write(|document| {
            let id = next_id(document.categories.iter().map(|row| row.id));
            let category = fields.into_category(id, Utc::now());
            document.categories.push(CategoryRow::from(&category));
            Ok(category)
        })?;
        tracing::info!(category_id = category.id, "category created");
        Ok(category)
    }

    fn update_category(
        &mut self,
        id: CategoryId,
        patch: &CategoryPatch,
    ) -> Result<Option<Category>> {
        let updated = self.write(|document| {
            let tasks = document.tasks();
            let Some(row) = document.categories.iter_mut().find(|row| row.id == id) else {
                return Ok(None);
            };
            let mut category = row.clone().into_category();
            category.apply(patch);
            *row = CategoryRow::from(&category);
            category.task_count = open_task_count(&tasks, id);
            Ok(Some(category))
        })?;
        if updated.is_some() {
            tracing::info!(category_id = id, "category updated");
        }
        Ok(updated)
    }

    fn delete_category(&mut self, id: CategoryId) -> Result<bool> {
        let deleted = self.write(|document| {
            let Some(index) = document.categories.iter().position(|row| row.id == id) else {
                return Ok(false);
            };
            let referencing = document
                .tasks
                .iter()
                .filter(|row| row.category_id_c == id)
                .count();
            if referencing > 0 {
                return Err(Error::CategoryInUse {
                    id,
                    tasks: referencing,
                });
            }
            document.categories.remove(index);
            Ok(true)
        })?;
        if deleted {
            tracing::info!(category_id = id, "category deleted");
        }
        Ok(deleted)
    }
}
