// In-Memory Repository (adapter for demos and tests)

use crate::domain::Record;
use crate::error::{AppError, Result};
use crate::port::Repository;
use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Ordered in-memory store.
///
/// `remove` matches by value equality, `update` by record id.
pub struct InMemoryRepository<T> {
    items: RwLock<Vec<T>>,
}

impl<T> InMemoryRepository<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }
}

impl<T> Default for InMemoryRepository<T> {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

#[async_trait]
impl<T> Repository<T> for InMemoryRepository<T>
where
    T: Record + Clone + PartialEq + Send + Sync + 'static,
{
    async fn get_all(&self) -> Result<Vec<T>> {
        Ok(self.items.read().await.clone())
    }

    async fn get_by_id(&self, id: &Uuid) -> Result<Option<T>> {
        let items = self.items.read().await;
        Ok(items.iter().find(|item| item.id() == *id).cloned())
    }

    async fn add(&self, item: &T) -> Result<()> {
        let mut items = self.items.write().await;
        let id = item.id();
        if items.iter().any(|stored| stored.id() == id) {
            return Err(AppError::Conflict(format!("record {} already exists", id)));
        }
        items.push(item.clone());
        debug!(record_id = %id, "Record added");
        Ok(())
    }

    async fn remove(&self, item: &T) -> Result<()> {
        let mut items = self.items.write().await;
        let index = items
            .iter()
            .position(|stored| stored == item)
            .ok_or_else(|| AppError::NotFound(format!("record {}", item.id())))?;
        items.remove(index);
        debug!(record_id = %item.id(), "Record removed");
        Ok(())
    }

    async fn update(&self, item: &T) -> Result<()> {
        let mut items = self.items.write().await;
        let id = item.id();
        let stored = items
            .iter_mut()
            .find(|stored| stored.id() == id)
            .ok_or_else(|| AppError::NotFound(format!("record {}", id)))?;
        *stored = item.clone();
        debug!(record_id = %id, "Record updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_test::{assert_err, assert_ok};

    #[derive(Debug, Clone, PartialEq)]
    struct Note {
        id: Uuid,
        text: String,
    }

    impl Record for Note {
        fn id(&self) -> Uuid {
            self.id
        }
    }

    fn note(n: u128, text: &str) -> Note {
        Note {
            id: Uuid::from_u128(n),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_add_and_get() {
        let repo = InMemoryRepository::default();
        assert_ok!(repo.add(&note(1, "first")).await);
        assert_ok!(repo.add(&note(2, "second")).await);

        let all = repo.get_all().await.unwrap();
        assert_eq!(all, vec![note(1, "first"), note(2, "second")]);

        let found = repo.get_by_id(&Uuid::from_u128(2)).await.unwrap();
        assert_eq!(found, Some(note(2, "second")));
        assert_eq!(repo.get_by_id(&Uuid::from_u128(9)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_add_conflicts() {
        let repo = InMemoryRepository::new(vec![note(1, "first")]);
        let result = repo.add(&note(1, "again")).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_remove_requires_equal_value() {
        let repo = InMemoryRepository::new(vec![note(1, "first")]);
        assert_err!(repo.remove(&note(1, "stale")).await);
        assert_ok!(repo.remove(&note(1, "first")).await);
        assert!(repo.get_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_by_id() {
        let repo = InMemoryRepository::new(vec![note(1, "first")]);
        assert_ok!(repo.update(&note(1, "edited")).await);
        assert_eq!(repo.get_all().await.unwrap(), vec![note(1, "edited")]);
        assert_err!(repo.update(&note(2, "missing")).await);
    }
}
