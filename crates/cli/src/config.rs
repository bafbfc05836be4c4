//! Command-line and environment configuration

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_DB_PATH: &str = "~/.tablewithaccept/table.db";
pub const DEFAULT_COLLECTION: &str = "contacts";
pub const DEFAULT_LOG_FILTER: &str = "tablewithaccept=info";

#[derive(Parser, Debug)]
#[command(name = "tablewithaccept")]
#[command(about = "Edit a table of contacts, then accept or cancel the changes", long_about = None)]
#[command(version)]
pub struct Cli {
    /// SQLite database path or sqlite: URL
    #[arg(long, env = "TABLEWITHACCEPT_DB_PATH", default_value = DEFAULT_DB_PATH)]
    pub db: String,

    /// Keep the table in memory instead of SQLite
    #[arg(long)]
    pub memory: bool,

    /// Collection (table) name inside the database
    #[arg(long, env = "TABLEWITHACCEPT_COLLECTION", default_value = DEFAULT_COLLECTION)]
    pub collection: String,

    /// Log output format (logs go to stderr)
    #[arg(
        long,
        env = "TABLEWITHACCEPT_LOG_FORMAT",
        value_enum,
        default_value_t = LogFormat::Pretty
    )]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    /// Development: pretty formatting with colors
    Pretty,
    /// Production: JSON structured logging
    Json,
}

/// Where rows are stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Memory,
    Sqlite { url: String, path: Option<PathBuf> },
}

/// Resolved settings
#[derive(Debug, Clone)]
pub struct Settings {
    pub storage: Storage,
    pub collection: String,
    pub log_format: LogFormat,
}

impl Settings {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let collection = cli.collection.trim();
        if collection.is_empty() {
            anyhow::bail!("Collection name must not be empty");
        }

        let storage = if cli.memory {
            Storage::Memory
        } else {
            sqlite_storage(&cli.db)
        };

        Ok(Self {
            storage,
            collection: collection.to_string(),
            log_format: cli.log_format,
        })
    }

    /// Create the database directory if it does not exist yet
    pub fn prepare_storage(&self) -> Result<()> {
        if let Storage::Sqlite {
            path: Some(path), ..
        } = &self.storage
        {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
        }
        Ok(())
    }
}

fn sqlite_storage(db: &str) -> Storage {
    if db.starts_with("sqlite:") {
        return Storage::Sqlite {
            url: db.to_string(),
            path: None,
        };
    }

    let path = PathBuf::from(shellexpand::tilde(db).into_owned());
    Storage::Sqlite {
        url: format!("sqlite://{}", path.display()),
        path: Some(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        let mut argv = vec!["tablewithaccept"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_memory_storage() {
        let settings = Settings::from_cli(&parse(&["--memory", "--collection", "people"])).unwrap();
        assert_eq!(settings.storage, Storage::Memory);
        assert_eq!(settings.collection, "people");
    }

    #[test]
    fn test_sqlite_url_passes_through() {
        let settings = Settings::from_cli(&parse(&["--db", "sqlite::memory:"])).unwrap();
        assert_eq!(
            settings.storage,
            Storage::Sqlite {
                url: "sqlite::memory:".to_string(),
                path: None
            }
        );
    }

    #[test]
    fn test_plain_path_becomes_url() {
        let settings = Settings::from_cli(&parse(&["--db", "/tmp/twa/table.db"])).unwrap();
        assert_eq!(
            settings.storage,
            Storage::Sqlite {
                url: "sqlite:///tmp/twa/table.db".to_string(),
                path: Some(PathBuf::from("/tmp/twa/table.db"))
            }
        );
    }

    #[test]
    fn test_blank_collection_rejected() {
        let result = Settings::from_cli(&parse(&["--memory", "--collection", "  "]));
        assert!(result.is_err());
    }

    #[test]
    fn test_log_format_flag() {
        let cli = parse(&["--memory", "--log-format", "json"]);
        assert_eq!(cli.log_format, LogFormat::Json);
    }
}
