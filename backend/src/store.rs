use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};

use crate::error::ApiError;

/// A task as it exists in the `tasks` table. Ids are allocated by SQLite
/// and never reused within a database file.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TaskRow {
    pub id: i64,
    pub title: String,
    pub completed: bool,
}

#[derive(Clone)]
pub struct TaskStore {
    pool: SqlitePool,
}

impl TaskStore {
    /// Open (or create) the database at `database_url` and ensure the schema
    /// exists.
    pub async fn connect(database_url: &str) -> Result<Self, sqlx::Error> {
        let pool = SqlitePoolOptions::new().connect(database_url).await?;
        Self::with_pool(pool).await
    }

    /// Wrap an existing pool. Tests use this with a single-connection
    /// `sqlite::memory:` pool so each test gets an isolated store.
    pub async fn with_pool(pool: SqlitePool) -> Result<Self, sqlx::Error> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                completed BOOLEAN NOT NULL DEFAULT FALSE
            )",
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    pub async fn insert(&self, title: &str) -> Result<TaskRow, ApiError> {
        let row = sqlx::query_as::<_, TaskRow>(
            "INSERT INTO tasks (title, completed) VALUES (?, FALSE)
             RETURNING id, title, completed",
        )
        .bind(title)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn list_all(&self) -> Result<Vec<TaskRow>, ApiError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            "SELECT id, title, completed FROM tasks ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    pub async fn get(&self, id: i64) -> Result<TaskRow, ApiError> {
        sqlx::query_as::<_, TaskRow>("SELECT id, title, completed FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(ApiError::NotFound(id))
    }

    pub async fn update_completed(&self, id: i64, completed: bool) -> Result<TaskRow, ApiError> {
        sqlx::query_as::<_, TaskRow>(
            "UPDATE tasks SET completed = ? WHERE id = ?
             RETURNING id, title, completed",
        )
        .bind(completed)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(ApiError::NotFound(id))
    }

    /// Deleting an id twice fails the second time; a delete that removed
    /// nothing is reported as `NotFound`, not silent success.
    pub async fn delete(&self, id: i64) -> Result<(), ApiError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::NotFound(id));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> TaskStore {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("failed to open in-memory database");
        TaskStore::with_pool(pool)
            .await
            .expect("failed to create schema")
    }

    #[tokio::test]
    async fn insert_assigns_increasing_ids() {
        let store = memory_store().await;

        let first = store.insert("first").await.unwrap();
        let second = store.insert("second").await.unwrap();

        assert!(second.id > first.id);
        assert_eq!(first.title, "first");
        assert!(!first.completed);
    }

    #[tokio::test]
    async fn list_all_is_ordered_by_id_and_empty_store_yields_empty() {
        let store = memory_store().await;
        assert!(store.list_all().await.unwrap().is_empty());

        store.insert("a").await.unwrap();
        store.insert("b").await.unwrap();
        store.insert("c").await.unwrap();

        let titles: Vec<String> = store
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|t| t.title)
            .collect();
        assert_eq!(titles, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn update_completed_round_trips() {
        let store = memory_store().await;
        let task = store.insert("toggle me").await.unwrap();

        let done = store.update_completed(task.id, true).await.unwrap();
        assert!(done.completed);

        let undone = store.update_completed(task.id, false).await.unwrap();
        assert!(!undone.completed);
        assert_eq!(undone.title, task.title);
    }

    #[tokio::test]
    async fn get_and_update_unknown_id_fail_with_not_found() {
        let store = memory_store().await;

        assert!(matches!(store.get(42).await, Err(ApiError::NotFound(42))));
        assert!(matches!(
            store.update_completed(42, true).await,
            Err(ApiError::NotFound(42))
        ));
    }

    #[tokio::test]
    async fn delete_removes_exactly_one_and_second_delete_fails() {
        let store = memory_store().await;
        let first = store.insert("first").await.unwrap();
        let second = store.insert("second").await.unwrap();

        store.delete(first.id).await.unwrap();

        let remaining = store.list_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);

        assert!(matches!(
            store.delete(first.id).await,
            Err(ApiError::NotFound(_))
        ));
        assert!(matches!(
            store.get(first.id).await,
            Err(ApiError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = memory_store().await;
        let first = store.insert("first").await.unwrap();
        store.delete(first.id).await.unwrap();

        let next = store.insert("second").await.unwrap();
        assert!(next.id > first.id);
    }
}
