// Table With Accept Infrastructure - SQLite Adapter
// Implements: Repository<T> for any serde-serializable Record

mod connection;
mod migration;
mod repository;

pub use connection::{create_pool, DEFAULT_BUSY_TIMEOUT, DEFAULT_MAX_CONNECTIONS};
pub use migration::run_migrations;
pub use repository::SqliteRepository;

// Note: sqlx::Error conversion is handled by wrapping in helper functions
// due to Rust's orphan rules (cannot implement From<sqlx::Error> for AppError here)
