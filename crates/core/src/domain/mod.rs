// Domain Layer - Rows, validation and record identity

pub mod error;
pub mod record;
pub mod row;
pub mod validation;

// Re-exports
pub use error::DomainError;
pub use record::Record;
pub use row::{RowKey, RowWrapper, TableItem};
pub use validation::{predicate, AcceptAll, FnValidator, Validator};
