pub mod manager;
pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use manager::{DatabaseError, DatabaseManager};
pub use memory::MemoryCatalogueStore;
pub use postgres::PgCatalogueStore;
pub use store::{CatalogueStore, StoreError, StoreResult};
