use serde::{Deserialize, Serialize};

/// The kind of a discrete event read off the history table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    /// The product had zero units on hand that day.
    #[serde(rename = "rotura_stock")]
    Stockout,
    /// The product was replenished that day.
    #[serde(rename = "reposicion")]
    Restock,
}
