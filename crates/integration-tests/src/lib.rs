//! Shared fixtures for the end-to-end tests

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tablewithaccept_core::application::TransactionManager;
use tablewithaccept_core::domain::{predicate, Record, Validator};
use tablewithaccept_core::port::id_provider::SequentialIdProvider;
use tablewithaccept_core::port::{FnItemFactory, IdProvider, Repository};
use tablewithaccept_infra_sqlite::{create_pool, run_migrations, SqliteRepository};
use uuid::Uuid;

pub const COLLECTION: &str = "books";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub copies: u32,
}

impl Book {
    pub fn new(id: u128, title: &str, copies: u32) -> Self {
        Self {
            id: Uuid::from_u128(id),
            title: title.to_string(),
            copies,
        }
    }
}

impl Record for Book {
    fn id(&self) -> Uuid {
        self.id
    }
}

pub fn title_required() -> Arc<dyn Validator<Book>> {
    Arc::new(predicate("title is required", |book: &Book| {
        !book.title.trim().is_empty()
    }))
}

/// Open a migrated SQLite repository at `url`
pub async fn open_repository(url: &str) -> Arc<SqliteRepository<Book>> {
    let pool = create_pool(url).await.expect("open pool");
    run_migrations(&pool).await.expect("migrate");
    Arc::new(SqliteRepository::new(pool, COLLECTION))
}

/// Seed `books` directly through the repository
pub async fn seed(repo: &SqliteRepository<Book>, books: &[Book]) {
    for book in books {
        repo.add(book).await.expect("seed");
    }
}

/// Table over `repo` whose new rows get ids 1000, 1001, ...
pub fn book_table(repo: Arc<SqliteRepository<Book>>) -> TransactionManager<Book> {
    let ids = SequentialIdProvider::starting_at(1000);
    let factory = FnItemFactory::new(move || -> tablewithaccept_core::Result<Book> {
        Ok(Book {
            id: ids.generate_id(),
            title: String::new(),
            copies: 1,
        })
    });
    TransactionManager::new(repo, Arc::new(factory), title_required()).with_name(COLLECTION)
}
