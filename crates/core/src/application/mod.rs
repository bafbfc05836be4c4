// Application Layer - Use Cases and Business Logic

pub mod table;

// Re-exports
pub use table::{
    AcceptOutcome, AcceptStats, CommitFailure, ErrorAlert, FailedOperation, FailureCause,
    SharedTransactionManager, TableState, TableSummary, TransactionManager,
};
