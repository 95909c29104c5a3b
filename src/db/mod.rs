pub mod memory;
pub mod postgres;
pub mod store;

pub use memory::MemoryCatalogStore;
pub use postgres::{create_pool, PgCatalogStore};
pub use store::CatalogStore;
