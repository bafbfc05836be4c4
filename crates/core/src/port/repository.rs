// Repository Port (Interface)

use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

/// Backing-store capability a table commits its pending changes against.
///
/// Mutations report failure through `Err`; the transaction manager turns
/// any error into a reported commit failure rather than propagating it.
#[async_trait]
pub trait Repository<T: Send + Sync>: Send + Sync {
    /// Snapshot of all items, in a stable iteration order
    async fn get_all(&self) -> Result<Vec<T>>;

    /// Find item by ID (not used by the transaction core)
    async fn get_by_id(&self, id: &Uuid) -> Result<Option<T>>;

    /// Add a new item
    async fn add(&self, item: &T) -> Result<()>;

    /// Remove the stored item equal to `item`
    async fn remove(&self, item: &T) -> Result<()>;

    /// Update an existing item
    async fn update(&self, item: &T) -> Result<()>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use crate::error::AppError;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    /// A recorded repository call
    #[derive(Debug, Clone, PartialEq)]
    pub enum RepositoryCall<T> {
        GetAll,
        GetById(Uuid),
        Add(T),
        Remove(T),
        Update(T),
    }

    impl<T> RepositoryCall<T> {
        pub fn is_mutation(&self) -> bool {
            matches!(
                self,
                RepositoryCall::Add(_) | RepositoryCall::Remove(_) | RepositoryCall::Update(_)
            )
        }
    }

    type SameRecord<T> = Box<dyn Fn(&T, &T) -> bool + Send + Sync>;

    /// Mock repository recording every call, with per-call failure injection
    pub struct MockRepository<T> {
        items: Mutex<Vec<T>>,
        calls: Mutex<Vec<RepositoryCall<T>>>,
        failing: Mutex<Vec<RepositoryCall<T>>>,
        fail_get_all: AtomicBool,
        same_record: Option<SameRecord<T>>,
    }

    impl<T: Clone + PartialEq> MockRepository<T> {
        pub fn new(items: Vec<T>) -> Self {
            Self {
                items: Mutex::new(items),
                calls: Mutex::new(Vec::new()),
                failing: Mutex::new(Vec::new()),
                fail_get_all: AtomicBool::new(false),
                same_record: None,
            }
        }

        /// Let `update` replace the stored item for which `same` holds.
        /// Without it, updates are recorded but change nothing.
        pub fn with_identity(
            mut self,
            same: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
        ) -> Self {
            self.same_record = Some(Box::new(same));
            self
        }

        /// Make the given call fail every time it is made
        pub fn fail_on(&self, call: RepositoryCall<T>) {
            self.failing.lock().unwrap().push(call);
        }

        pub fn fail_get_all(&self, fail: bool) {
            self.fail_get_all.store(fail, Ordering::SeqCst);
        }

        pub fn clear_failures(&self) {
            self.failing.lock().unwrap().clear();
            self.fail_get_all.store(false, Ordering::SeqCst);
        }

        pub fn items(&self) -> Vec<T> {
            self.items.lock().unwrap().clone()
        }

        pub fn calls(&self) -> Vec<RepositoryCall<T>> {
            self.calls.lock().unwrap().clone()
        }

        /// Recorded add/remove/update calls, in order
        pub fn mutation_calls(&self) -> Vec<RepositoryCall<T>> {
            self.calls()
                .into_iter()
                .filter(RepositoryCall::is_mutation)
                .collect()
        }

        pub fn clear_calls(&self) {
            self.calls.lock().unwrap().clear();
        }

        fn record(&self, call: RepositoryCall<T>) -> Result<()> {
            let fails = self.failing.lock().unwrap().contains(&call);
            self.calls.lock().unwrap().push(call.clone());
            if fails {
                return Err(AppError::Internal(format!("mock failure: {:?}", variant(&call))));
            }
            Ok(())
        }
    }

    fn variant<T>(call: &RepositoryCall<T>) -> &'static str {
        match call {
            RepositoryCall::GetAll => "get_all",
            RepositoryCall::GetById(_) => "get_by_id",
            RepositoryCall::Add(_) => "add",
            RepositoryCall::Remove(_) => "remove",
            RepositoryCall::Update(_) => "update",
        }
    }

    #[async_trait]
    impl<T> Repository<T> for MockRepository<T>
    where
        T: Clone + PartialEq + Send + Sync + 'static,
    {
        async fn get_all(&self) -> Result<Vec<T>> {
            self.calls.lock().unwrap().push(RepositoryCall::GetAll);
            if self.fail_get_all.load(Ordering::SeqCst) {
                return Err(AppError::Database("mock failure: get_all".to_string()));
            }
            Ok(self.items())
        }

        async fn get_by_id(&self, id: &Uuid) -> Result<Option<T>> {
            // Mock items carry no identifier
            self.record(RepositoryCall::GetById(*id))?;
            Ok(None)
        }

        async fn add(&self, item: &T) -> Result<()> {
            self.record(RepositoryCall::Add(item.clone()))?;
            self.items.lock().unwrap().push(item.clone());
            Ok(())
        }

        async fn remove(&self, item: &T) -> Result<()> {
            self.record(RepositoryCall::Remove(item.clone()))?;
            let mut items = self.items.lock().unwrap();
            match items.iter().position(|stored| stored == item) {
                Some(index) => {
                    items.remove(index);
                    Ok(())
                }
                None => Err(AppError::NotFound("item".to_string())),
            }
        }

        async fn update(&self, item: &T) -> Result<()> {
            self.record(RepositoryCall::Update(item.clone()))?;
            if let Some(same) = &self.same_record {
                let mut items = self.items.lock().unwrap();
                match items.iter_mut().find(|stored| same(stored, item)) {
                    Some(stored) => *stored = item.clone(),
                    None => return Err(AppError::NotFound("item".to_string())),
                }
            }
            Ok(())
        }
    }
}
