//! Session commands read from stdin

use anyhow::{anyhow, bail, Context, Result};
use std::str::FromStr;

pub const HELP: &str = "\
Commands:
  list                 show the table
  select N             select row N (1-based)
  add                  append a blank row and select it
  set FIELD VALUE      edit a field of the selected row (name, email, phone)
  revert               discard edits of the selected row
  remove               remove the selected row
  accept               validate and store all pending changes
  cancel               discard all pending changes and reload
  state                show table state as JSON
  help                 show this help
  quit                 leave (unaccepted changes are lost)";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    List,
    /// Zero-based row index
    Select(usize),
    Add,
    Set { field: String, value: String },
    Revert,
    Remove,
    Accept,
    Cancel,
    State,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_ascii_lowercase().as_str() {
            "list" | "ls" => Command::List,
            "select" | "sel" => {
                let number: usize = rest
                    .parse()
                    .with_context(|| format!("Expected a row number, got '{}'", rest))?;
                let index = number
                    .checked_sub(1)
                    .ok_or_else(|| anyhow!("Row numbers start at 1"))?;
                Command::Select(index)
            }
            "add" => Command::Add,
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None if !rest.is_empty() => (rest, ""),
                    None => bail!("Usage: set FIELD VALUE"),
                };
                Command::Set {
                    field: field.to_ascii_lowercase(),
                    value: value.to_string(),
                }
            }
            "revert" => Command::Revert,
            "remove" | "rm" => Command::Remove,
            "accept" => Command::Accept,
            "cancel" => Command::Cancel,
            "state" => Command::State,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => bail!("Unknown command '{}' (try 'help')", other),
        };
        Ok(command)
    }
}
