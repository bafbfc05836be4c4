// Row Wrapper - per-row editing buffer

use super::error::Result;
use super::validation::Validator;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Bounds every item shown in a table must satisfy
pub trait TableItem: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

impl<T> TableItem for T where T: Clone + PartialEq + fmt::Debug + Send + Sync + 'static {}

/// Process-unique row identity.
///
/// Two rows may hold equal items (e.g. two freshly added default rows); the
/// key tells them apart without touching the item's own equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowKey(u64);

static NEXT_ROW_KEY: AtomicU64 = AtomicU64::new(1);

impl RowKey {
    fn next() -> Self {
        Self(NEXT_ROW_KEY.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row-{}", self.0)
    }
}

/// Wraps one domain item: a live copy being edited plus the last committed
/// snapshot.
///
/// Invariant: `is_changed()` is true iff the live copy differs from the
/// snapshot. The wrapper never talks to a repository.
pub struct RowWrapper<T> {
    key: RowKey,
    item: T,
    committed: T,
    validator: Arc<dyn Validator<T>>,
}

impl<T: Clone + PartialEq> RowWrapper<T> {
    /// Wrap `item`; live copy and snapshot both start as `item`
    pub fn new(item: T, validator: Arc<dyn Validator<T>>) -> Self {
        Self {
            key: RowKey::next(),
            committed: item.clone(),
            item,
            validator,
        }
    }

    pub fn key(&self) -> RowKey {
        self.key
    }

    /// Current live copy
    pub fn item(&self) -> &T {
        &self.item
    }

    /// Mutable access to the live copy for field edits
    pub fn item_mut(&mut self) -> &mut T {
        &mut self.item
    }

    /// Replace the live copy wholesale
    pub fn set_item(&mut self, item: T) {
        self.item = item;
    }

    /// Apply a field edit to the live copy
    pub fn edit(&mut self, f: impl FnOnce(&mut T)) {
        f(&mut self.item);
    }

    /// Last committed snapshot
    pub fn committed(&self) -> &T {
        &self.committed
    }

    /// True if the live copy was changed but not accepted
    pub fn is_changed(&self) -> bool {
        self.item != self.committed
    }

    /// Discard all edits made since the last accept
    pub fn cancel(&mut self) {
        self.item = self.committed.clone();
    }

    /// Validate the live copy without committing it
    pub fn validate(&self) -> Result<()> {
        self.validator.validate(&self.item)
    }

    /// Validate the live copy and, if valid, make it the committed snapshot.
    ///
    /// On validation failure nothing changes and the edit stays pending.
    pub fn accept(&mut self) -> Result<()> {
        self.validate()?;
        self.committed = self.item.clone();
        Ok(())
    }
}

impl<T: fmt::Debug> fmt::Debug for RowWrapper<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowWrapper")
            .field("key", &self.key)
            .field("item", &self.item)
            .field("committed", &self.committed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::validation::{predicate, AcceptAll};
    use crate::domain::DomainError;

    #[derive(Debug, Clone, PartialEq, Default)]
    struct Person {
        name: String,
        age: u32,
    }

    fn person(name: &str, age: u32) -> Person {
        Person {
            name: name.to_string(),
            age,
        }
    }

    fn named_only() -> Arc<dyn Validator<Person>> {
        Arc::new(predicate("name is empty", |p: &Person| !p.name.is_empty()))
    }

    #[test]
    fn test_unchanged_after_construction() {
        let row = RowWrapper::new(person("Ada", 36), Arc::new(AcceptAll));
        assert!(!row.is_changed());
        assert_eq!(row.item(), row.committed());
    }

    #[test]
    fn test_edit_marks_changed() {
        let mut row = RowWrapper::new(person("Ada", 36), Arc::new(AcceptAll));
        row.edit(|p| p.age = 37);
        assert!(row.is_changed());
        assert_eq!(row.committed().age, 36);
    }

    #[test]
    fn test_edit_back_to_snapshot_is_unchanged() {
        let mut row = RowWrapper::new(person("Ada", 36), Arc::new(AcceptAll));
        row.item_mut().age = 40;
        row.item_mut().age = 36;
        assert!(!row.is_changed());
    }

    #[test]
    fn test_cancel_restores_original() {
        let original = person("Ada", 36);
        let mut row = RowWrapper::new(original.clone(), Arc::new(AcceptAll));
        row.edit(|p| {
            p.name = "Grace".to_string();
            p.age = 85;
        });

        row.cancel();

        assert_eq!(row.item(), &original);
        assert!(!row.is_changed());
    }

    #[test]
    fn test_accept_commits_valid_edit() {
        let mut row = RowWrapper::new(person("Ada", 36), named_only());
        row.set_item(person("Grace", 85));

        assert!(row.accept().is_ok());
        assert!(!row.is_changed());
        assert_eq!(row.committed(), &person("Grace", 85));
    }

    #[test]
    fn test_accept_rejects_invalid_edit_without_state_change() {
        let mut row = RowWrapper::new(person("Ada", 36), named_only());
        row.edit(|p| p.name.clear());

        let result = row.accept();

        assert_eq!(
            result,
            Err(DomainError::ValidationError("name is empty".to_string()))
        );
        assert!(row.is_changed());
        assert_eq!(row.committed(), &person("Ada", 36));
        assert_eq!(row.item().name, "");
    }

    #[test]
    fn test_keys_are_unique() {
        let a = RowWrapper::new(Person::default(), Arc::new(AcceptAll));
        let b = RowWrapper::new(Person::default(), Arc::new(AcceptAll));
        assert_eq!(a.item(), b.item());
        assert_ne!(a.key(), b.key());
    }
}
