// Port Layer - Interfaces for external dependencies

pub mod id_provider; // For deterministic testing
pub mod item_factory;
pub mod memory_repository;
pub mod repository;

// Re-exports
pub use id_provider::{IdProvider, UuidProvider};
pub use item_factory::{DefaultItemFactory, FnItemFactory, ItemFactory};
pub use memory_repository::InMemoryRepository;
pub use repository::Repository;
