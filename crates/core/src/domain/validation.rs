// Row validation strategies

use super::error::{DomainError, Result};

/// Validates the field values of a row's live item.
///
/// Supplied per domain type when a table is built; every row of that table
/// shares the same validator.
pub trait Validator<T>: Send + Sync {
    /// Returns `Ok(())` if the item may be committed, otherwise a
    /// `DomainError::ValidationError` describing the rejected field.
    fn validate(&self, item: &T) -> Result<()>;
}

/// Validator that accepts every item
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl<T> Validator<T> for AcceptAll {
    fn validate(&self, _item: &T) -> Result<()> {
        Ok(())
    }
}

/// Validator backed by a closure
///
/// # Example
/// ```
/// use tablewithaccept_core::domain::{DomainError, FnValidator, Validator};
///
/// let non_empty = FnValidator::new(|name: &String| {
///     if name.trim().is_empty() {
///         Err(DomainError::ValidationError("name is empty".to_string()))
///     } else {
///         Ok(())
///     }
/// });
/// assert!(non_empty.validate(&"Ada".to_string()).is_ok());
/// assert!(non_empty.validate(&"  ".to_string()).is_err());
/// ```
pub struct FnValidator<F> {
    check: F,
}

impl<F> FnValidator<F> {
    pub fn new(check: F) -> Self {
        Self { check }
    }
}

impl<T, F> Validator<T> for FnValidator<F>
where
    F: Fn(&T) -> Result<()> + Send + Sync,
{
    fn validate(&self, item: &T) -> Result<()> {
        (self.check)(item)
    }
}

/// Build a validator from a plain predicate, rejecting with `message`
pub fn predicate<T, P>(
    message: impl Into<String>,
    accept: P,
) -> FnValidator<impl Fn(&T) -> Result<()> + Send + Sync>
where
    P: Fn(&T) -> bool + Send + Sync,
{
    let message = message.into();
    FnValidator::new(move |item: &T| {
        if accept(item) {
            Ok(())
        } else {
            Err(DomainError::ValidationError(message.clone()))
        }
    })
}
