// Table state machine

use serde::{Deserialize, Serialize};
use std::fmt;

/// Clean -> Dirty -> (accept) -> Clean | Error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableState {
    /// Display list mirrors the repository, nothing pending
    Clean,
    /// At least one pending add, remove or row edit
    Dirty,
    /// The last accept stopped at a failure
    Error,
}

impl fmt::Display for TableState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableState::Clean => write!(f, "CLEAN"),
            TableState::Dirty => write!(f, "DIRTY"),
            TableState::Error => write!(f, "ERROR"),
        }
    }
}

/// Point-in-time overview of a table, for status output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub state: TableState,
    pub rows: usize,
    pub changed_rows: usize,
    pub pending_add: usize,
    pub pending_remove: usize,
    pub selected: Option<usize>,
}
