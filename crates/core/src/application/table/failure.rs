// Commit failures and the error alert surfaced to the presentation layer

use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository operation that stopped an accept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailedOperation {
    Remove,
    Add,
    Update,
}

impl FailedOperation {
    fn verb(&self) -> &'static str {
        match self {
            FailedOperation::Remove => "removing",
            FailedOperation::Add => "adding",
            FailedOperation::Update => "updating",
        }
    }
}

impl fmt::Display for FailedOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailedOperation::Remove => write!(f, "REMOVE"),
            FailedOperation::Add => write!(f, "ADD"),
            FailedOperation::Update => write!(f, "UPDATE"),
        }
    }
}

/// Why the operation failed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureCause {
    /// The row's field values were rejected; the edit stays pending
    Validation(String),
    /// The repository refused the operation
    Repository(String),
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Validation(reason) => write!(f, "validation failed: {}", reason),
            FailureCause::Repository(reason) => write!(f, "repository error: {}", reason),
        }
    }
}

/// The first failure of an accept, naming the offending item
#[derive(Debug, Clone, PartialEq)]
pub struct CommitFailure<T> {
    pub operation: FailedOperation,
    pub item: T,
    pub cause: FailureCause,
}

impl<T: fmt::Debug> CommitFailure<T> {
    pub fn new(operation: FailedOperation, item: T, cause: FailureCause) -> Self {
        Self {
            operation,
            item,
            cause,
        }
    }

    /// Human-readable alert text
    pub fn message(&self) -> String {
        format!(
            "Error occurred while {} item: {:?}",
            self.operation.verb(),
            self.item
        )
    }
}

impl<T: fmt::Debug> fmt::Display for CommitFailure<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.message(), self.cause)
    }
}

/// Counts of repository mutations applied by a successful accept
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptStats {
    pub removed: usize,
    pub added: usize,
    pub updated: usize,
}

impl AcceptStats {
    pub fn total(&self) -> usize {
        self.removed + self.added + self.updated
    }
}

/// Result of `TransactionManager::accept`
#[derive(Debug, Clone, PartialEq)]
pub enum AcceptOutcome<T> {
    /// Every pending change was applied and the list was reloaded
    Committed(AcceptStats),
    /// The batch stopped at this failure; earlier mutations stay applied
    Failed(CommitFailure<T>),
}

impl<T> AcceptOutcome<T> {
    pub fn is_committed(&self) -> bool {
        matches!(self, AcceptOutcome::Committed(_))
    }

    pub fn failure(&self) -> Option<&CommitFailure<T>> {
        match self {
            AcceptOutcome::Failed(failure) => Some(failure),
            AcceptOutcome::Committed(_) => None,
        }
    }
}

/// Error alert flag and text.
///
/// Set when an accept fails; the presentation layer shows `text()` and
/// calls `dismiss()` afterwards. The text of the last alert is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorAlert {
    triggered: bool,
    operation: Option<FailedOperation>,
    text: Option<String>,
}

impl ErrorAlert {
    pub fn is_triggered(&self) -> bool {
        self.triggered
    }

    /// Remove/add/update error flag
    pub fn is_triggered_for(&self, operation: FailedOperation) -> bool {
        self.triggered && self.operation == Some(operation)
    }

    pub fn operation(&self) -> Option<FailedOperation> {
        self.operation
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    pub(crate) fn trigger<T: fmt::Debug>(&mut self, failure: &CommitFailure<T>) {
        self.triggered = true;
        self.operation = Some(failure.operation);
        self.text = Some(failure.message());
    }

    pub fn dismiss(&mut self) {
        self.triggered = false;
        self.operation = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_names_operation_and_item() {
        let failure = CommitFailure::new(
            FailedOperation::Remove,
            "B".to_string(),
            FailureCause::Repository("locked".to_string()),
        );
        assert_eq!(failure.message(), "Error occurred while removing item: \"B\"");
        assert_eq!(
            failure.to_string(),
            "Error occurred while removing item: \"B\" (repository error: locked)"
        );
    }

    #[test]
    fn test_alert_flags() {
        let mut alert = ErrorAlert::default();
        assert!(!alert.is_triggered());

        alert.trigger(&CommitFailure::new(
            FailedOperation::Update,
            7,
            FailureCause::Validation("too big".to_string()),
        ));
        assert!(alert.is_triggered_for(FailedOperation::Update));
        assert!(!alert.is_triggered_for(FailedOperation::Add));
        assert_eq!(alert.text(), Some("Error occurred while updating item: 7"));

        alert.dismiss();
        assert!(!alert.is_triggered());
        assert_eq!(alert.text(), Some("Error occurred while updating item: 7"));
    }

    #[test]
    fn test_operation_serializes_screaming_case() {
        let json = serde_json::to_string(&FailedOperation::Remove).unwrap();
        assert_eq!(json, "\"REMOVE\"");
    }
}
