// SQLite Repository Implementation

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::SqlitePool;
use std::marker::PhantomData;
use tablewithaccept_core::domain::Record;
use tablewithaccept_core::error::{AppError, Result};
use tablewithaccept_core::port::Repository;
use tracing::debug;
use uuid::Uuid;

// Helper to convert sqlx::Error to AppError with structured information
fn map_sqlx_error(err: sqlx::Error) -> AppError {
    match &err {
        sqlx::Error::Database(db_err) => {
            if let Some(code) = db_err.code() {
                let code_str = code.as_ref();

                // SQLite error codes: https://www.sqlite.org/rescode.html
                match code_str {
                    "2067" | "1555" => AppError::Conflict(format!(
                        "Unique constraint violation: {} ({})",
                        db_err.message(),
                        code_str
                    )),
                    "5" => AppError::Database(format!(
                        "Database locked (SQLITE_BUSY): {}",
                        db_err.message()
                    )),
                    "13" => AppError::Database(format!("Database full: {}", db_err.message())),
                    _ => AppError::Database(format!(
                        "Database error [{}]: {}",
                        code_str,
                        db_err.message()
                    )),
                }
            } else {
                AppError::Database(format!("Database error: {}", db_err.message()))
            }
        }
        sqlx::Error::RowNotFound => AppError::Database("Row not found".to_string()),
        sqlx::Error::ColumnNotFound(col) => {
            AppError::Database(format!("Column not found: {}", col))
        }
        _ => AppError::Database(err.to_string()),
    }
}

/// Stores records of one collection as JSON documents.
///
/// Rows keep their insertion order; `remove` only deletes a record whose
/// stored document still equals the item being removed.
pub struct SqliteRepository<T> {
    pool: SqlitePool,
    collection: String,
    _record: PhantomData<fn() -> T>,
}

impl<T> SqliteRepository<T> {
    pub fn new(pool: SqlitePool, collection: impl Into<String>) -> Self {
        Self {
            pool,
            collection: collection.into(),
            _record: PhantomData,
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    /// Number of records in this collection
    pub async fn count(&self) -> Result<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM records WHERE collection = ?")
            .bind(&self.collection)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }
}

impl<T: DeserializeOwned> SqliteRepository<T> {
    async fn find(&self, id: &Uuid) -> Result<Option<T>> {
        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM records WHERE collection = ? AND id = ?")
                .bind(&self.collection)
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        Ok(body.map(|b| serde_json::from_str(&b)).transpose()?)
    }
}

#[async_trait]
impl<T> Repository<T> for SqliteRepository<T>
where
    T: Record + Serialize + DeserializeOwned + PartialEq + Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>> {
        let bodies: Vec<String> =
            sqlx::query_scalar("SELECT body FROM records WHERE collection = ? ORDER BY seq")
                .bind(&self.collection)
                .fetch_all(&self.pool)
                .await
                .map_err(map_sqlx_error)?;

        bodies
            .iter()
            .map(|body| serde_json::from_str(body).map_err(AppError::from))
            .collect()
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<T>> {
        self.find(id).await
    }

    async fn add(&self, item: &T) -> Result<()> {
        let id = item.id();
        let body = serde_json::to_string(item)?;
        let now = chrono::Utc::now().timestamp_millis();

        sqlx::query(
            r#"
            INSERT INTO records (collection, id, body, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(&self.collection)
        .bind(id.to_string())
        .bind(&body)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(collection = %self.collection, record_id = %id, "Record inserted");
        Ok(())
    }

    async fn remove(&self, item: &T) -> Result<()> {
        let id = item.id();
        let mut tx = self.pool.begin().await.map_err(map_sqlx_error)?;

        let body: Option<String> =
            sqlx::query_scalar("SELECT body FROM records WHERE collection = ? AND id = ?")
                .bind(&self.collection)
                .bind(id.to_string())
                .fetch_optional(&mut *tx)
                .await
                .map_err(map_sqlx_error)?;

        let stored: T = match body {
            Some(body) => serde_json::from_str(&body)?,
            None => {
                return Err(AppError::NotFound(format!(
                    "record {} in {}",
                    id, self.collection
                )))
            }
        };
        if stored != *item {
            return Err(AppError::Conflict(format!(
                "record {} in {} differs from the removed item",
                id, self.collection
            )));
        }

        sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(&self.collection)
            .bind(id.to_string())
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;

        tx.commit().await.map_err(map_sqlx_error)?;

        debug!(collection = %self.collection, record_id = %id, "Record deleted");
        Ok(())
    }

    async fn update(&self, item: &T) -> Result<()> {
        let id = item.id();
        let body = serde_json::to_string(item)?;

        let result = sqlx::query(
            "UPDATE records SET body = ?, updated_at = ? WHERE collection = ? AND id = ?",
        )
        .bind(&body)
        .bind(chrono::Utc::now().timestamp_millis())
        .bind(&self.collection)
        .bind(id.to_string())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!(
                "record {} in {}",
                id, self.collection
            )));
        }

        debug!(collection = %self.collection, record_id = %id, "Record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{create_pool, run_migrations};
    use serde::Deserialize;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Task {
        id: Uuid,
        title: String,
        done: bool,
    }

    impl Record for Task {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn task(n: u128, title: &str) -> Task {
        Task {
            id: Uuid::from_u128(n),
            title: title.to_string(),
            done: false,
        }
    }

    async fn repo(collection: &str) -> SqliteRepository<Task> {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        SqliteRepository::new(pool, collection)
    }

    #[tokio::test]
    async fn test_get_all_keeps_insertion_order() {
        let repo = repo("tasks").await;
        assert_ok!(repo.add(&task(3, "third")).await);
        assert_ok!(repo.add(&task(1, "first")).await);
        assert_ok!(repo.add(&task(2, "second")).await);

        let all = repo.get_all().await.unwrap();
        let titles: Vec<&str> = all.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["third", "first", "second"]);
        assert_eq!(repo.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = repo("tasks").await;
        repo.add(&task(1, "first")).await.unwrap();

        assert_eq!(
            repo.get_by_id(&Uuid::from_u128(1)).await.unwrap(),
            Some(task(1, "first"))
        );
        assert_eq!(repo.get_by_id(&Uuid::from_u128(2)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_add_is_conflict() {
        let repo = repo("tasks").await;
        repo.add(&task(1, "first")).await.unwrap();

        let result = repo.add(&task(1, "again")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_update_replaces_document() {
        let repo = repo("tasks").await;
        repo.add(&task(1, "first")).await.unwrap();

        let mut edited = task(1, "first");
        edited.done = true;
        assert_ok!(repo.update(&edited).await);

        assert_eq!(repo.get_all().await.unwrap(), vec![edited]);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let repo = repo("tasks").await;
        let result = repo.update(&task(7, "ghost")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_remove_matches_by_value() {
        let repo = repo("tasks").await;
        repo.add(&task(1, "first")).await.unwrap();

        let result = repo.remove(&task(1, "renamed")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));

        assert_ok!(repo.remove(&task(1, "first")).await);
        assert_err!(repo.remove(&task(1, "first")).await);
        assert_eq!(repo.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_collections_are_isolated() {
        let pool = create_pool("sqlite::memory:").await.unwrap();
        run_migrations(&pool).await.unwrap();
        let home: SqliteRepository<Task> = SqliteRepository::new(pool.clone(), "home");
        let work: SqliteRepository<Task> = SqliteRepository::new(pool, "work");

        home.add(&task(1, "dishes")).await.unwrap();
        work.add(&task(1, "report")).await.unwrap();

        assert_eq!(home.get_all().await.unwrap(), vec![task(1, "dishes")]);
        assert_eq!(work.get_all().await.unwrap(), vec![task(1, "report")]);
    }
}
