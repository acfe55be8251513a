//! # Ingestion
//!
//! Turns the three uploaded CSV files (stock, sales, history) into typed tables.
//! Each file must carry exactly the expected columns, in order; anything else is
//! rejected with an error naming the expected layout.

pub mod error;
pub mod reader;

pub use error::IngestionError;
pub use reader::{
    HISTORY_SCHEMA, SALES_SCHEMA, STOCK_SCHEMA, TableSchema, load_tables, load_tables_from_files,
    read_history_csv, read_history_file, read_sales_csv, read_sales_file, read_stock_csv,
    read_stock_file,
};
