// Table Transaction Manager - buffers row changes, commits them as a batch

pub mod failure;
mod state;

pub use failure::{
    AcceptOutcome, AcceptStats, CommitFailure, ErrorAlert, FailedOperation, FailureCause,
};
pub use state::{TableState, TableSummary};

use crate::domain::{DomainError, RowKey, RowWrapper, TableItem, Validator};
use crate::error::{AppError, Result};
use crate::port::{ItemFactory, Repository};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Label used in logs when a table is not given a name
pub const DEFAULT_TABLE_NAME: &str = "table";

/// Manager guarded by one lock, for hosts that share it across tasks
pub type SharedTransactionManager<T> = Arc<Mutex<TransactionManager<T>>>;

/// Mediates between the displayed rows and a repository.
///
/// Adds and removes are staged client-side, row edits live in each
/// `RowWrapper`, and `accept()` replays everything against the repository in
/// a fixed order, stopping at the first failure. Already-applied mutations
/// are not undone when a later one fails.
///
/// All operations take `&mut self`, so two accepts can never interleave.
pub struct TransactionManager<T: TableItem> {
    name: String,
    repository: Arc<dyn Repository<T>>,
    factory: Arc<dyn ItemFactory<T>>,
    validator: Arc<dyn Validator<T>>,
    rows: Vec<RowWrapper<T>>,
    /// Rows created by `add()` and not yet stored
    pending_add: Vec<RowKey>,
    /// Committed items scheduled for deletion, in staging order
    pending_remove: Vec<T>,
    selected: Option<RowKey>,
    failure: Option<CommitFailure<T>>,
    alert: ErrorAlert,
}

impl<T: TableItem> TransactionManager<T> {
    /// Create an empty manager; call `update_list()` to load rows
    ///
    /// # Arguments
    /// * `repository` - Backing store changes are committed to
    /// * `factory` - Builds the item behind each added row
    /// * `validator` - Checks row values before they are stored
    pub fn new(
        repository: Arc<dyn Repository<T>>,
        factory: Arc<dyn ItemFactory<T>>,
        validator: Arc<dyn Validator<T>>,
    ) -> Self {
        Self {
            name: DEFAULT_TABLE_NAME.to_string(),
            repository,
            factory,
            validator,
            rows: Vec::new(),
            pending_add: Vec::new(),
            pending_remove: Vec::new(),
            selected: None,
            failure: None,
            alert: ErrorAlert::default(),
        }
    }

    /// Set the table label used in logs
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn into_shared(self) -> SharedTransactionManager<T> {
        Arc::new(Mutex::new(self))
    }

    // ------------------------------------------------------------------
    // Rows
    // ------------------------------------------------------------------

    /// Display list, in display order
    pub fn rows(&self) -> &[RowWrapper<T>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&RowWrapper<T>> {
        self.rows.get(index)
    }

    /// Mutable row access for in-place edits
    pub fn row_mut(&mut self, index: usize) -> Option<&mut RowWrapper<T>> {
        self.rows.get_mut(index)
    }

    /// Apply a field edit to the live item of row `index`
    pub fn edit_row(&mut self, index: usize, f: impl FnOnce(&mut T)) -> Result<()> {
        let len = self.rows.len();
        let row = self
            .rows
            .get_mut(index)
            .ok_or(DomainError::RowOutOfRange { index, len })?;
        row.edit(f);
        Ok(())
    }

    /// Live items, in display order
    pub fn items(&self) -> Vec<T> {
        self.rows.iter().map(|row| row.item().clone()).collect()
    }

    /// Items of rows staged for addition, in display order
    pub fn pending_adds(&self) -> Vec<&T> {
        self.rows
            .iter()
            .filter(|row| self.pending_add.contains(&row.key()))
            .map(|row| row.item())
            .collect()
    }

    /// Items staged for removal, in staging order
    pub fn pending_removes(&self) -> &[T] {
        &self.pending_remove
    }

    pub fn is_pending_add(&self, index: usize) -> bool {
        self.rows
            .get(index)
            .is_some_and(|row| self.pending_add.contains(&row.key()))
    }

    // ------------------------------------------------------------------
    // Selection
    // ------------------------------------------------------------------

    pub fn select(&mut self, index: usize) -> Result<()> {
        let row = self.rows.get(index).ok_or(DomainError::RowOutOfRange {
            index,
            len: self.rows.len(),
        })?;
        self.selected = Some(row.key());
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected.and_then(|key| self.index_of(key))
    }

    pub fn selected_row(&self) -> Option<&RowWrapper<T>> {
        self.selected_index().map(|index| &self.rows[index])
    }

    fn index_of(&self, key: RowKey) -> Option<usize> {
        self.rows.iter().position(|row| row.key() == key)
    }

    // ------------------------------------------------------------------
    // State
    // ------------------------------------------------------------------

    pub fn state(&self) -> TableState {
        if self.failure.is_some() {
            TableState::Error
        } else if !self.pending_add.is_empty()
            || !self.pending_remove.is_empty()
            || self.rows.iter().any(RowWrapper::is_changed)
        {
            TableState::Dirty
        } else {
            TableState::Clean
        }
    }

    pub fn summary(&self) -> TableSummary {
        TableSummary {
            name: self.name.clone(),
            state: self.state(),
            rows: self.rows.len(),
            changed_rows: self.rows.iter().filter(|row| row.is_changed()).count(),
            pending_add: self.pending_add.len(),
            pending_remove: self.pending_remove.len(),
            selected: self.selected_index(),
        }
    }

    /// Failure that stopped the last accept, until the next reload
    pub fn last_failure(&self) -> Option<&CommitFailure<T>> {
        self.failure.as_ref()
    }

    pub fn error_alert(&self) -> &ErrorAlert {
        &self.alert
    }

    /// Reset the alert flag once the presentation layer has shown it
    pub fn dismiss_error(&mut self) {
        self.alert.dismiss();
    }

    // ------------------------------------------------------------------
    // Operations
    // ------------------------------------------------------------------

    /// Reload the display list from the repository.
    ///
    /// Clears pending adds and removes, and drops unaccepted row edits. A
    /// previously selected row is re-selected if its live item, edits
    /// included, equals a reloaded item.
    ///
    /// # Returns
    /// Index of the selected row after the reload, if any
    pub async fn update_list(&mut self) -> Result<Option<usize>> {
        let items = self.repository.get_all().await?;
        let previous = self.selected_row().map(|row| row.item().clone());

        self.pending_add.clear();
        self.pending_remove.clear();
        self.failure = None;

        let validator = Arc::clone(&self.validator);
        self.rows = items
            .into_iter()
            .map(|item| RowWrapper::new(item, Arc::clone(&validator)))
            .collect();

        let selection =
            previous.and_then(|item| self.rows.iter().position(|row| row.item() == &item));
        self.selected = selection.map(|index| self.rows[index].key());

        debug!(
            table = %self.name,
            rows = self.rows.len(),
            selected = ?selection,
            "Table reloaded"
        );
        Ok(selection)
    }

    /// Append a new row built by the item factory and select it.
    ///
    /// # Returns
    /// Index of the new row
    ///
    /// # Errors
    /// `AppError::Construction` if the factory cannot build an item
    pub fn add(&mut self) -> Result<usize> {
        let item = self.factory.create().map_err(|e| match e {
            AppError::Construction(_) => e,
            other => AppError::Construction(other.to_string()),
        })?;

        let row = RowWrapper::new(item, Arc::clone(&self.validator));
        let key = row.key();
        self.pending_add.push(key);
        self.rows.push(row);
        self.selected = Some(key);

        let index = self.rows.len() - 1;
        debug!(table = %self.name, row = %key, index, "Row staged for addition");
        Ok(index)
    }

    /// Remove the selected row.
    ///
    /// A row that was itself staged by `add()` is simply dropped; any other
    /// row's committed item is scheduled for deletion.
    ///
    /// # Errors
    /// `DomainError::NoSelection` if no row is selected
    pub fn remove(&mut self) -> Result<()> {
        let index = self.selected_index().ok_or(DomainError::NoSelection)?;
        let row = self.rows.remove(index);
        self.selected = None;

        let key = row.key();
        if let Some(position) = self.pending_add.iter().position(|k| *k == key) {
            self.pending_add.remove(position);
            debug!(table = %self.name, row = %key, "Pending addition cancelled");
        } else {
            debug!(table = %self.name, row = %key, item = ?row.committed(), "Row staged for removal");
            self.pending_remove.push(row.committed().clone());
        }
        Ok(())
    }

    /// Apply all pending changes to the repository.
    ///
    /// Order:
    /// 1. Staged removals, in staging order
    /// 2. Rows in display order: staged additions are validated and added,
    ///    other changed rows are validated and updated
    /// 3. Reload from the repository
    ///
    /// The first validation or repository failure stops the batch, is
    /// reported through the returned outcome and the error alert, and leaves
    /// the table in `TableState::Error`. Mutations applied before it stay
    /// applied and are not replayed by a later accept. A row is accepted
    /// locally before its repository call, so a row whose update failed is
    /// no longer changed; a failed addition stays staged.
    ///
    /// # Errors
    /// Only the final reload can fail with `Err`
    pub async fn accept(&mut self) -> Result<AcceptOutcome<T>> {
        let repository = Arc::clone(&self.repository);
        let mut stats = AcceptStats::default();
        self.failure = None;

        info!(
            table = %self.name,
            pending_add = self.pending_add.len(),
            pending_remove = self.pending_remove.len(),
            "Accepting table changes"
        );

        while let Some(item) = self.pending_remove.first().cloned() {
            if let Err(e) = repository.remove(&item).await {
                let cause = FailureCause::Repository(e.to_string());
                return Ok(self.report(FailedOperation::Remove, item, cause));
            }
            self.pending_remove.remove(0);
            stats.removed += 1;
        }

        for index in 0..self.rows.len() {
            let key = self.rows[index].key();
            let is_add = self.pending_add.contains(&key);
            if !is_add && !self.rows[index].is_changed() {
                continue;
            }

            let operation = if is_add {
                FailedOperation::Add
            } else {
                FailedOperation::Update
            };
            let item = self.rows[index].item().clone();

            // Commits locally before the store call; a failed update is not retried
            if let Err(e) = self.rows[index].accept() {
                let cause = FailureCause::Validation(validation_reason(e));
                return Ok(self.report(operation, item, cause));
            }

            let stored = if is_add {
                repository.add(&item).await
            } else {
                repository.update(&item).await
            };
            if let Err(e) = stored {
                let cause = FailureCause::Repository(e.to_string());
                return Ok(self.report(operation, item, cause));
            }

            if is_add {
                self.pending_add.retain(|k| *k != key);
                stats.added += 1;
            } else {
                stats.updated += 1;
            }
        }

        self.update_list().await?;

        info!(
            table = %self.name,
            removed = stats.removed,
            added = stats.added,
            updated = stats.updated,
            "Table changes accepted"
        );
        Ok(AcceptOutcome::Committed(stats))
    }

    /// Discard all pending adds, removes and row edits by reloading.
    pub async fn cancel(&mut self) -> Result<Option<usize>> {
        let selection = self.update_list().await?;
        info!(table = %self.name, rows = self.rows.len(), "Table changes cancelled");
        Ok(selection)
    }

    fn report(
        &mut self,
        operation: FailedOperation,
        item: T,
        cause: FailureCause,
    ) -> AcceptOutcome<T> {
        let failure = CommitFailure::new(operation, item, cause);
        warn!(
            table = %self.name,
            operation = %failure.operation,
            item = ?failure.item,
            cause = %failure.cause,
            "Accept stopped at first failure"
        );
        self.alert.trigger(&failure);
        self.failure = Some(failure.clone());
        AcceptOutcome::Failed(failure)
    }
}

fn validation_reason(err: DomainError) -> String {
    match err {
        DomainError::ValidationError(reason) => reason,
        other => other.to_string(),
    }
}
