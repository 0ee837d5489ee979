//! Infrastructure layer: keyed storage, inventory persistence, configuration.

pub mod config;
pub mod repository;
pub mod session;
pub mod store;

pub use config::StoreConfig;
pub use repository::{InventoryRepository, LoadOutcome, PersistenceError};
pub use session::InventorySession;
pub use store::{FileStore, InMemoryStore, KeyedStore, StoreError};
