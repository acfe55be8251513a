pub mod enums;
pub mod error;
pub mod sku;
pub mod structs;

// Re-export the core types to provide a clean public API.
pub use enums::EventKind;
pub use error::CoreError;
pub use sku::Sku;
pub use structs::{HistoryRecord, InventoryTables, SaleRecord, StockItem};
