//! Interactive session: forwards commands to the transaction manager and
//! renders the table

use crate::command::{Command, HELP};
use crate::contact::{self, Contact};
use anyhow::{Context, Result};
use colored::Colorize;
use tablewithaccept_core::application::{AcceptOutcome, TableState, TransactionManager};
use tablewithaccept_core::domain::DomainError;
use tabled::{Table, Tabled};

/// What the caller should do after a command
#[derive(Debug, PartialEq, Eq)]
pub enum Flow {
    Continue(String),
    Quit,
}

#[derive(Tabled)]
struct ContactRow {
    #[tabled(rename = "#")]
    number: String,
    #[tabled(rename = "")]
    status: String,
    name: String,
    email: String,
    phone: String,
}

pub struct Session {
    table: TransactionManager<Contact>,
}

impl Session {
    pub fn new(table: TransactionManager<Contact>) -> Self {
        Self { table }
    }

    pub fn table(&self) -> &TransactionManager<Contact> {
        &self.table
    }

    /// Load rows from the repository
    pub async fn load(&mut self) -> Result<()> {
        self.table
            .update_list()
            .await
            .context("Failed to load table")?;
        Ok(())
    }

    pub async fn execute(&mut self, command: Command) -> Result<Flow> {
        let output = match command {
            Command::List => self.render(),
            Command::Select(index) => {
                self.table.select(index)?;
                self.render()
            }
            Command::Add => {
                let index = self.table.add()?;
                format!(
                    "{}\n{}",
                    format!("Row {} added, fill it in with 'set'", index + 1).green(),
                    self.render()
                )
            }
            Command::Set { field, value } => {
                let index = self.table.selected_index().ok_or(DomainError::NoSelection)?;
                let row = self
                    .table
                    .row_mut(index)
                    .ok_or(DomainError::NoSelection)?;
                contact::set_field(row.item_mut(), &field, &value)?;
                self.render()
            }
            Command::Revert => {
                let index = self.table.selected_index().ok_or(DomainError::NoSelection)?;
                if let Some(row) = self.table.row_mut(index) {
                    row.cancel();
                }
                self.render()
            }
            Command::Remove => {
                self.table.remove()?;
                self.render()
            }
            Command::Accept => {
                let outcome = self.table.accept().await?;
                match outcome {
                    AcceptOutcome::Committed(stats) => format!(
                        "{}\n{}",
                        format!(
                            "✓ Changes accepted ({} removed, {} added, {} updated)",
                            stats.removed, stats.added, stats.updated
                        )
                        .green()
                        .bold(),
                        self.render()
                    ),
                    AcceptOutcome::Failed(failure) => {
                        let alert = self.take_alert().unwrap_or_else(|| failure.message());
                        format!(
                            "{} {}\n  {}\n{}",
                            "✗".red().bold(),
                            alert.red(),
                            failure.cause,
                            self.render()
                        )
                    }
                }
            }
            Command::Cancel => {
                self.table.cancel().await?;
                format!("{}\n{}", "Changes discarded".yellow(), self.render())
            }
            Command::State => serde_json::to_string_pretty(&self.table.summary())?,
            Command::Help => HELP.to_string(),
            Command::Quit => return Ok(Flow::Quit),
        };
        Ok(Flow::Continue(output))
    }

    /// Alert text, if one is showing; showing it resets the flag
    fn take_alert(&mut self) -> Option<String> {
        let alert = self.table.error_alert();
        if !alert.is_triggered() {
            return None;
        }
        let text = alert.text().map(str::to_string);
        self.table.dismiss_error();
        text
    }

    pub fn render(&self) -> String {
        let selected = self.table.selected_index();
        let rows: Vec<ContactRow> = self
            .table
            .rows()
            .iter()
            .enumerate()
            .map(|(index, row)| {
                let item = row.item();
                let status = if self.table.is_pending_add(index) {
                    "+"
                } else if row.is_changed() {
                    "*"
                } else {
                    ""
                };
                let marker = if selected == Some(index) { ">" } else { " " };
                ContactRow {
                    number: format!("{}{}", marker, index + 1),
                    status: status.to_string(),
                    name: item.name.clone(),
                    email: item.email.clone(),
                    phone: item.phone.clone(),
                }
            })
            .collect();

        let mut output = if rows.is_empty() {
            "(no rows)".dimmed().to_string()
        } else {
            Table::new(rows).to_string()
        };

        let summary = self.table.summary();
        let state = match summary.state {
            TableState::Clean => summary.state.to_string().green(),
            TableState::Dirty => summary.state.to_string().yellow(),
            TableState::Error => summary.state.to_string().red(),
        };
        output.push_str(&format!(
            "\n{} {}  pending: +{} -{}  changed: {}",
            "State:".bold(),
            state,
            summary.pending_add,
            summary.pending_remove,
            summary.changed_rows
        ));
        output
    }
}
