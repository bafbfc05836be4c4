// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("No row selected")]
    NoSelection,

    #[error("Row index out of range: {index} (rows: {len})")]
    RowOutOfRange { index: usize, len: usize },
}

pub type Result<T> = std::result::Result<T, DomainError>;
