use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid SKU: {0}")]
    InvalidSku(String),
}
