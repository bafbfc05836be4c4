//! Table With Accept - interactive table editor
//! Edits a contact table, then accepts or cancels the changes as a batch

mod command;
mod config;
mod contact;
mod session;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use tablewithaccept_core::application::{TableState, TransactionManager};
use tablewithaccept_core::port::{InMemoryRepository, Repository, UuidProvider};
use tablewithaccept_infra_sqlite::{create_pool, run_migrations, SqliteRepository};

use crate::command::Command;
use crate::config::{Cli, LogFormat, Settings, Storage, DEFAULT_LOG_FILTER};
use crate::contact::{Contact, ContactFactory};
use crate::session::{Flow, Session};

const PROMPT: &str = "table> ";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Logging (stderr, so it does not mix with the table on stdout)
    init_logging(cli.log_format)?;

    // 2. Configuration
    let settings = Settings::from_cli(&cli)?;
    settings.prepare_storage()?;
    info!(
        version = tablewithaccept_core::VERSION,
        collection = %settings.collection,
        "Table With Accept starting"
    );

    // 3. Repository
    let repository = build_repository(&settings).await?;

    // 4. Transaction manager
    let table = TransactionManager::new(
        repository,
        Arc::new(ContactFactory::new(Arc::new(UuidProvider))),
        contact::validator(),
    )
    .with_name(settings.collection.clone());

    let mut session = Session::new(table);
    session.load().await?;

    // 5. Read commands until quit or EOF
    run(&mut session).await?;

    if session.table().state() != TableState::Clean {
        warn!(
            state = %session.table().state(),
            "Exiting with unaccepted changes; they were discarded"
        );
    }
    info!("Bye");
    Ok(())
}

fn init_logging(format: LogFormat) -> Result<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_LOG_FILTER))
        .context("Failed to create env filter")?;

    let registry = tracing_subscriber::registry().with(env_filter);
    match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
    }
    .context("Failed to install tracing subscriber")
}

async fn build_repository(settings: &Settings) -> Result<Arc<dyn Repository<Contact>>> {
    match &settings.storage {
        Storage::Memory => {
            info!("Using in-memory storage");
            Ok(Arc::new(InMemoryRepository::<Contact>::default()))
        }
        Storage::Sqlite { url, .. } => {
            info!(url = %url, "Opening SQLite storage");
            let pool = create_pool(url)
                .await
                .with_context(|| format!("Failed to open {}", url))?;
            run_migrations(&pool)
                .await
                .context("Failed to run migrations")?;
            Ok(Arc::new(SqliteRepository::<Contact>::new(
                pool,
                settings.collection.clone(),
            )))
        }
    }
}

async fn run(session: &mut Session) -> Result<()> {
    let mut stdout = tokio::io::stdout();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    stdout
        .write_all(format!("{}\n{}\n", session.render(), "Type 'help' for commands".dimmed()).as_bytes())
        .await?;

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let output = match line.parse::<Command>() {
            Ok(command) => match session.execute(command).await {
                Ok(Flow::Continue(output)) => output,
                Ok(Flow::Quit) => break,
                Err(e) => format!("{} {:#}", "Error:".red().bold(), e),
            },
            Err(e) => format!("{} {:#}", "Error:".red().bold(), e),
        };
        stdout.write_all(format!("{}\n", output).as_bytes()).await?;
    }
    Ok(())
}
