//! Persistence boundary for tasks and categories.
//!
//! `TaskStore` and `CategoryStore` are the CRUD contracts the rest of the
//! crate talks to. A backend implements both over one shared collection so
//! category counts and the category-in-use check always see live tasks.
//!
//! Backends:
//! - `memory`: process-local vectors, used by tests and the demo backend
//! - `file`: a locked JSON document on disk

use chrono::NaiveDate;

use crate::config::{Backend, Config};
use crate::error::Result;
use crate::model::{
    Category, CategoryId, CategoryPatch, NewCategory, NewTask, Task, TaskId, TaskPatch,
};
use crate::view::View;

pub mod file;
pub mod memory;
pub mod record;

pub use file::FileStore;
pub use memory::MemoryStore;

pub trait TaskStore {
    fn list(&self) -> Result<Vec<Task>>;

    fn get(&self, id: TaskId) -> Result<Task>;

    /// Persist a new task. The store assigns the id and creation time.
    fn create(&mut self, fields: NewTask) -> Result<Task>;

    /// Merge `patch` into the stored task; fails with `TaskNotFound`.
    fn update(&mut self, id: TaskId, patch: &TaskPatch) -> Result<Task>;

    /// Returns `false` when no task has `id`.
    fn delete(&mut self, id: TaskId) -> Result<bool>;

    /// Remove every existing id; unknown ids are skipped.
    fn bulk_delete(&mut self, ids: &[TaskId]) -> Result<Vec<Task>>;

    fn list_by_category(&self, category_id: CategoryId) -> Result<Vec<Task>> {
        self.list_view(View::Category(category_id), NaiveDate::MIN)
    }

    fn list_today(&self, today: NaiveDate) -> Result<Vec<Task>> {
        self.list_view(View::Today, today)
    }

    fn list_overdue(&self, today: NaiveDate) -> Result<Vec<Task>> {
        self.list_view(View::Overdue, today)
    }

    /// Completed tasks, most recently completed first.
    fn list_completed(&self) -> Result<Vec<Task>> {
        let mut tasks = self.list_view(View::Completed, NaiveDate::MIN)?;
        tasks.sort_by(|a, b| b.completed_at.cmp(&a.completed_at));
        Ok(tasks)
    }

    fn list_view(&self, view: View, today: NaiveDate) -> Result<Vec<Task>> {
        Ok(crate::view::filter_tasks(&self.list()?, view, today))
    }
}

pub trait CategoryStore {
    /// All categories with freshly computed open-task counts.
    fn list_categories(&self) -> Result<Vec<Category>>;

    fn get_category(&self, id: CategoryId) -> Result<Option<Category>>;

    fn create_category(&mut self, fields: NewCategory) -> Result<Category>;

    fn update_category(&mut self, id: CategoryId, patch: &CategoryPatch)
        -> Result<Option<Category>>;

    /// Returns `false` when no category has `id`; fails with
    /// `CategoryInUse` while any task references it.
    fn delete_category(&mut self, id: CategoryId) -> Result<bool>;
}

/// A backend holding both collections.
pub trait Store: TaskStore + CategoryStore {}

impl<T: TaskStore + CategoryStore> Store for T {}

/// Open the backend named in config, seeding default categories into an
/// empty store.
pub fn open_store(config: &Config) -> Result<Box<dyn Store>> {
    let seed = config.categories.seed.clone();
    match config.store.backend {
        Backend::Memory => {
            tracing::debug!("opening in-memory store");
            Ok(Box::new(MemoryStore::seeded(seed)))
        }
        Backend::File => {
            let path = config.store.data_path()?;
            tracing::debug!(path = %path.display(), "opening file store");
            let store = FileStore::open(path, config.store.lock_timeout_ms)?;
            store.seed_if_empty(seed)?;
            Ok(Box::new(store))
        }
    }
}
