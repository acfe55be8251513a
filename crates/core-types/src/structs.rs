use crate::sku::Sku;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;

/// A single product line from the stock file.
///
/// Field names on the wire are the column headers of the stock file, so a row read from
/// CSV goes back out to JSON with the same keys.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(rename = "SKU")]
    pub sku: Sku,
    #[serde(rename = "Producto")]
    pub name: String,
    #[serde(rename = "Categoría")]
    pub category: String,
    #[serde(rename = "Talla")]
    pub size: String,
    #[serde(rename = "Color")]
    pub color: String,
    /// Units currently on hand.
    #[serde(rename = "Stock")]
    pub stock: i64,
    #[serde(rename = "Precio_Unitario", deserialize_with = "deserialize_decimal")]
    pub unit_price: Decimal,
    /// Reorder threshold. At or below this level the product needs replenishing.
    #[serde(rename = "Umbral")]
    pub threshold: i64,
}

impl StockItem {
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.threshold
    }
}

/// One sales observation: units of a SKU sold on a given day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaleRecord {
    #[serde(rename = "Fecha", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "SKU")]
    pub sku: Sku,
    #[serde(rename = "Unidades_Vendidas", deserialize_with = "deserialize_units")]
    pub units_sold: i64,
}

/// One day of stock, sales and replenishment history for a SKU.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    #[serde(rename = "Fecha", deserialize_with = "deserialize_date")]
    pub date: NaiveDate,
    #[serde(rename = "SKU")]
    pub sku: Sku,
    #[serde(rename = "Stock")]
    pub stock: i64,
    #[serde(rename = "Unidades_Vendidas", deserialize_with = "deserialize_units")]
    pub units_sold: i64,
    #[serde(rename = "Reposicion", deserialize_with = "deserialize_flag")]
    pub restocked: bool,
    #[serde(rename = "Precio_Unitario", deserialize_with = "deserialize_decimal")]
    pub unit_price: Decimal,
    #[serde(rename = "Ingresos_Brutos", deserialize_with = "deserialize_decimal")]
    pub gross_revenue: Decimal,
}

impl HistoryRecord {
    pub fn is_stockout(&self) -> bool {
        self.stock == 0
    }
}

/// The three input tables of one analysis run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryTables {
    pub stock: Vec<StockItem>,
    pub sales: Vec<SaleRecord>,
    pub history: Vec<HistoryRecord>,
}

impl InventoryTables {
    pub fn new(stock: Vec<StockItem>, sales: Vec<SaleRecord>, history: Vec<HistoryRecord>) -> Self {
        Self { stock, sales, history }
    }
}

/// Parses a decimal from its text form, accepting scientific notation as a fallback.
fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .map_err(|_| serde::de::Error::custom(format!("expected decimal value, got '{}'", s)))
}

/// Unit counts are whole and never negative.
fn deserialize_units<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    match s.parse::<i64>() {
        Ok(units) if units >= 0 => Ok(units),
        _ => Err(serde::de::Error::custom(format!(
            "expected a non-negative unit count, got '{}'",
            s
        ))),
    }
}

/// Accepts a plain date (`2024-03-01`) or a date-time, keeping only the calendar day.
fn deserialize_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").map(|dt| dt.date()))
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").map(|dt| dt.date()))
        .map_err(|_| serde::de::Error::custom(format!("expected date (YYYY-MM-DD), got '{}'", s)))
}

/// Flexible flag deserializer: handles "1"/"0", "true"/"false", "yes"/"no", "1.0".
fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    match s.to_lowercase().trim() {
        "1" | "1.0" | "true" | "yes" | "y" => Ok(true),
        "0" | "0.0" | "false" | "no" | "n" | "" => Ok(false),
        other => Err(serde::de::Error::custom(format!(
            "expected flag value, got '{}'",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn item(stock: i64, threshold: i64) -> StockItem {
        StockItem {
            sku: Sku::from("1"),
            name: "Camiseta".to_string(),
            category: "Ropa".to_string(),
            size: "M".to_string(),
            color: "Rojo".to_string(),
            stock,
            unit_price: dec!(12.50),
            threshold,
        }
    }

    #[test]
    fn low_stock_is_inclusive_of_threshold() {
        assert!(item(10, 10).is_low_stock());
        assert!(item(3, 10).is_low_stock());
        assert!(!item(11, 10).is_low_stock());
    }

    #[test]
    fn stock_item_serializes_with_column_names() {
        let json = serde_json::to_value(item(5, 10)).unwrap();
        assert_eq!(json["SKU"], 1);
        assert_eq!(json["Producto"], "Camiseta");
        assert_eq!(json["Categoría"], "Ropa");
        assert_eq!(json["Precio_Unitario"], 12.5);
        assert_eq!(json["Umbral"], 10);
    }

    #[test]
    fn sale_date_serializes_as_calendar_day() {
        let sale = SaleRecord {
            date: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            sku: Sku::from("9"),
            units_sold: 4,
        };
        let json = serde_json::to_value(sale).unwrap();
        assert_eq!(json["Fecha"], "2024-01-31");
    }
}
