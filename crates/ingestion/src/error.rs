use thiserror::Error;

#[derive(Error, Debug)]
pub enum IngestionError {
    #[error("{file} must have columns: {expected:?} (found {found:?})")]
    Schema {
        file: &'static str,
        expected: &'static [&'static str],
        found: Vec<String>,
    },

    #[error("{file}: invalid row at line {line}: {message}")]
    Row {
        file: &'static str,
        line: u64,
        message: String,
    },

    #[error("{file}: failed to read CSV: {source}")]
    Csv {
        file: &'static str,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to open '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
