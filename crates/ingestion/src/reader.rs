use crate::error::IngestionError;
use core_types::{HistoryRecord, InventoryTables, SaleRecord, StockItem};
use serde::de::DeserializeOwned;
use std::io::Read;
use std::path::Path;

/// The name and exact column layout of one of the three input files.
#[derive(Debug, Clone, Copy)]
pub struct TableSchema {
    pub file: &'static str,
    pub columns: &'static [&'static str],
}

pub const STOCK_SCHEMA: TableSchema = TableSchema {
    file: "stock.csv",
    columns: &[
        "SKU",
        "Producto",
        "Categoría",
        "Talla",
        "Color",
        "Stock",
        "Precio_Unitario",
        "Umbral",
    ],
};

pub const SALES_SCHEMA: TableSchema = TableSchema {
    file: "ventas.csv",
    columns: &["Fecha", "SKU", "Unidades_Vendidas"],
};

pub const HISTORY_SCHEMA: TableSchema = TableSchema {
    file: "historico_stock_ventas.csv",
    columns: &[
        "Fecha",
        "SKU",
        "Stock",
        "Unidades_Vendidas",
        "Reposicion",
        "Precio_Unitario",
        "Ingresos_Brutos",
    ],
};

/// Reads and validates the stock file.
pub fn read_stock_csv(content: &[u8]) -> Result<Vec<StockItem>, IngestionError> {
    read_table(content, &STOCK_SCHEMA)
}

/// Reads and validates the sales file.
pub fn read_sales_csv(content: &[u8]) -> Result<Vec<SaleRecord>, IngestionError> {
    read_table(content, &SALES_SCHEMA)
}

/// Reads and validates the stock/sales history file.
pub fn read_history_csv(content: &[u8]) -> Result<Vec<HistoryRecord>, IngestionError> {
    read_table(content, &HISTORY_SCHEMA)
}

/// Parses all three uploads into one set of tables, failing on the first invalid file.
pub fn load_tables(
    stock: &[u8],
    sales: &[u8],
    history: &[u8],
) -> Result<InventoryTables, IngestionError> {
    Ok(InventoryTables::new(
        read_stock_csv(stock)?,
        read_sales_csv(sales)?,
        read_history_csv(history)?,
    ))
}

pub fn read_stock_file(path: &Path) -> Result<Vec<StockItem>, IngestionError> {
    read_stock_csv(&read_file(path)?)
}

pub fn read_sales_file(path: &Path) -> Result<Vec<SaleRecord>, IngestionError> {
    read_sales_csv(&read_file(path)?)
}

pub fn read_history_file(path: &Path) -> Result<Vec<HistoryRecord>, IngestionError> {
    read_history_csv(&read_file(path)?)
}

/// Loads the three tables from files on disk.
pub fn load_tables_from_files(
    stock: &Path,
    sales: &Path,
    history: &Path,
) -> Result<InventoryTables, IngestionError> {
    load_tables(&read_file(stock)?, &read_file(sales)?, &read_file(history)?)
}

fn read_file(path: &Path) -> Result<Vec<u8>, IngestionError> {
    let io_err = |source| IngestionError::Io {
        path: path.display().to_string(),
        source,
    };
    let mut file = std::fs::File::open(path).map_err(io_err)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content).map_err(io_err)?;
    Ok(content)
}

/// Checks the header row against `schema` and deserializes every data row.
fn read_table<T: DeserializeOwned>(
    content: &[u8],
    schema: &TableSchema,
) -> Result<Vec<T>, IngestionError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(content);

    let headers = reader.headers().map_err(|source| IngestionError::Csv {
        file: schema.file,
        source,
    })?;
    let found: Vec<String> = headers
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();
    if found != schema.columns {
        return Err(IngestionError::Schema {
            file: schema.file,
            expected: schema.columns,
            found,
        });
    }

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        let row = result.map_err(|e| row_error(schema.file, index, e))?;
        rows.push(row);
    }

    tracing::info!(file = schema.file, rows = rows.len(), "Parsed input table.");
    Ok(rows)
}

fn row_error(file: &'static str, index: usize, error: csv::Error) -> IngestionError {
    // Line 1 is the header.
    let line = error
        .position()
        .map(|p| p.line())
        .unwrap_or(index as u64 + 2);
    if let csv::ErrorKind::Deserialize { err, .. } = error.kind() {
        return IngestionError::Row {
            file,
            line,
            message: err.to_string(),
        };
    }
    IngestionError::Csv { file, source: error }
}
