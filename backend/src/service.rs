use shared::Task;

use crate::{
    error::ApiError,
    store::{TaskRow, TaskStore},
};

/// Validation and translation layer between the HTTP surface and the store.
/// Holds no state of its own beyond the store handle.
#[derive(Clone)]
pub struct TaskService {
    store: TaskStore,
}

fn to_wire(row: TaskRow) -> Task {
    Task {
        id: row.id,
        title: row.title,
        completed: row.completed,
    }
}

impl TaskService {
    pub fn new(store: TaskStore) -> Self {
        Self { store }
    }

    /// Titles are trimmed before storage; empty or whitespace-only titles are
    /// rejected without touching the store.
    pub async fn create(&self, title: &str) -> Result<Task, ApiError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(ApiError::Validation("title must not be empty".into()));
        }

        let row = self.store.insert(title).await?;
        tracing::debug!(id = row.id, "created task");
        Ok(to_wire(row))
    }

    pub async fn list(&self) -> Result<Vec<Task>, ApiError> {
        let rows = self.store.list_all().await?;
        Ok(rows.into_iter().map(to_wire).collect())
    }

    pub async fn get(&self, id: i64) -> Result<Task, ApiError> {
        Ok(to_wire(self.store.get(id).await?))
    }

    pub async fn set_completed(&self, id: i64, completed: bool) -> Result<Task, ApiError> {
        let row = self.store.update_completed(id, completed).await?;
        tracing::debug!(id, completed, "updated task");
        Ok(to_wire(row))
    }

    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        self.store.delete(id).await?;
        tracing::debug!(id, "deleted task");
        Ok(())
    }
}
