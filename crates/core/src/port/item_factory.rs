// Item Factory Port - constructs the item behind a newly added row

use crate::error::Result;

/// Creates a new, default-initialized domain item for `add()`.
///
/// Failure is a configuration error and propagates out of `add()` as
/// `AppError::Construction`.
pub trait ItemFactory<T>: Send + Sync {
    fn create(&self) -> Result<T>;
}

/// Factory for items implementing `Default`
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultItemFactory;

impl<T: Default> ItemFactory<T> for DefaultItemFactory {
    fn create(&self) -> Result<T> {
        Ok(T::default())
    }
}

/// Factory backed by a closure
pub struct FnItemFactory<F> {
    make: F,
}

impl<F> FnItemFactory<F> {
    pub fn new(make: F) -> Self {
        Self { make }
    }
}

impl<T, F> ItemFactory<T> for FnItemFactory<F>
where
    F: Fn() -> Result<T> + Send + Sync,
{
    fn create(&self) -> Result<T> {
        (self.make)()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    #[test]
    fn test_default_factory() {
        let value: String = DefaultItemFactory.create().unwrap();
        assert_eq!(value, "");
    }

    #[test]
    fn test_fn_factory_propagates_failure() {
        let factory = FnItemFactory::new(|| -> Result<u32> {
            Err(AppError::Construction("no default".to_string()))
        });
        assert!(matches!(factory.create(), Err(AppError::Construction(_))));
    }
}
