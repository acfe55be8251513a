use chrono::NaiveDate;
use core_types::{EventKind, Sku, StockItem};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

/// Units-per-day figures keyed by SKU. Keys go out as JSON strings.
pub type SkuRates = BTreeMap<Sku, Decimal>;

/// A stock row flagged as slow-moving, with the daily average that flagged it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SlowMover {
    #[serde(flatten)]
    pub item: StockItem,
    #[serde(rename = "media_diaria")]
    pub daily_average: Decimal,
}

/// A best seller of the latest month of sales.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTopSeller {
    #[serde(flatten)]
    pub item: StockItem,
    #[serde(rename = "total_vendido_mes")]
    pub units_sold_in_month: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GlobalMetrics {
    #[serde(rename = "total_stock")]
    pub total_stock: i64,
    #[serde(rename = "total_vendido")]
    pub total_units_sold: i64,
    #[serde(rename = "num_productos")]
    pub product_count: usize,
    /// History rows with nothing on hand.
    #[serde(rename = "num_roturas_detectadas")]
    pub stockout_observations: usize,
    /// History rows flagged as a restock.
    #[serde(rename = "num_reposiciones_detectadas")]
    pub restock_observations: usize,
    #[serde(rename = "media_rotacion_por_producto")]
    pub mean_rotation: Decimal,
}

/// A dated stockout or restock taken from the history table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryEvent {
    #[serde(rename = "tipo")]
    pub kind: EventKind,
    #[serde(rename = "SKU")]
    pub sku: Sku,
    #[serde(rename = "fecha")]
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LowStockAlert {
    #[serde(rename = "nombre")]
    pub name: String,
    pub sku: Sku,
    #[serde(rename = "stock_restante")]
    pub stock_remaining: i64,
}

impl From<&StockItem> for LowStockAlert {
    fn from(item: &StockItem) -> Self {
        Self {
            name: item.name.clone(),
            sku: item.sku.clone(),
            stock_remaining: item.stock,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    #[serde(rename = "total_productos")]
    pub product_count: usize,
    #[serde(rename = "total_vendido")]
    pub total_units_sold: i64,
    #[serde(rename = "promedio_rotacion")]
    pub rotation_average: Decimal,
}

/// An all-time best seller, reduced to what the dashboard shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopSeller {
    #[serde(rename = "nombre")]
    pub name: String,
    pub sku: Sku,
    #[serde(rename = "total_vendido")]
    pub units_sold: i64,
}

/// The full analysis, meant for an automated downstream consumer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailedReport {
    #[serde(rename = "productos_bajo_stock")]
    pub low_stock: Vec<StockItem>,
    #[serde(rename = "productos_rotacion_lenta")]
    pub slow_rotation: Vec<SlowMover>,
    #[serde(rename = "productos_muertos")]
    pub dead_stock: Vec<StockItem>,
    #[serde(rename = "top_5_mas_vendidos_mes")]
    pub top_sellers_month: Vec<MonthlyTopSeller>,
    #[serde(rename = "estimaciones_velocidad_venta")]
    pub sales_velocity: SkuRates,
    #[serde(rename = "promedios_unidades_vendidas")]
    pub average_units_sold: SkuRates,
    #[serde(rename = "metricas_globales")]
    pub global_metrics: GlobalMetrics,
    #[serde(rename = "eventos_detectados")]
    pub events: Vec<InventoryEvent>,
}

/// The condensed view fed to the dashboard frontend.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardReport {
    #[serde(rename = "alerta_stock_bajo")]
    pub low_stock_alerts: Vec<LowStockAlert>,
    #[serde(rename = "resumen_global")]
    pub summary: DashboardSummary,
    #[serde(rename = "top_3_mas_vendidos")]
    pub top_sellers: Vec<TopSeller>,
    #[serde(rename = "fecha_ultimo_analisis", serialize_with = "serialize_optional_date")]
    pub last_analysis_date: Option<NaiveDate>,
}

/// The response envelope: both views of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisResponse {
    pub openai: DetailedReport,
    pub dashboard: DashboardReport,
}

/// Writes a missing date as an empty string, which is what the dashboard expects.
fn serialize_optional_date<S: Serializer>(
    date: &Option<NaiveDate>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match date {
        Some(d) => serializer.collect_str(&d.format("%Y-%m-%d")),
        None => serializer.serialize_str(""),
    }
}
