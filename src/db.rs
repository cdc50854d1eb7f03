pub mod memory;
pub mod postgres;
pub mod store;

pub mod brand_repo;
pub mod product_repo;
pub mod stock_output_repo;
pub mod stock_repo;
pub mod supplier_configuration_repo;
pub mod supplier_repo;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use store::{Store, StoreTx};
