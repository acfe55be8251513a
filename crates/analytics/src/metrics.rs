//! The individual inventory metrics.
//!
//! Every function here is a pure reduction over borrowed input tables. None of them
//! fail: empty tables, a zero-day sales window, or a SKU missing from the stock table
//! all degrade to empty or zero results. A sold SKU with no stock row is skipped
//! wherever a stock row would be needed to report it.
//!
//! The table-level functions build their own SKU index and sales summary. The `*_in`
//! variants take a prepared [`AnalysisContext`] so a whole report shares one of each.

use crate::index::{AnalysisContext, SalesSummary, SkuIndex, rank_by_units};
use crate::report::{
    DashboardSummary, GlobalMetrics, InventoryEvent, LowStockAlert, MonthlyTopSeller, SkuRates,
    SlowMover, TopSeller,
};
use chrono::{Datelike, NaiveDate};
use core_types::{EventKind, HistoryRecord, SaleRecord, StockItem};
use rust_decimal::{Decimal, RoundingStrategy};

/// Every stock row at or below its reorder threshold, in input order.
pub fn low_stock(stock: &[StockItem]) -> Vec<StockItem> {
    stock.iter().filter(|item| item.is_low_stock()).cloned().collect()
}

/// Low-stock rows reduced to name, SKU and units remaining.
pub fn low_stock_alerts(stock: &[StockItem]) -> Vec<LowStockAlert> {
    stock
        .iter()
        .filter(|item| item.is_low_stock())
        .map(LowStockAlert::from)
        .collect()
}

/// SKUs whose daily sales average falls below `threshold_ratio` times the
/// catalogue-wide average.
///
/// The catalogue-wide average is total units over (distinct sold SKUs × day span),
/// so a SKU is compared against what an average seller moves per day.
pub fn slow_rotation(
    sales: &[SaleRecord],
    stock: &[StockItem],
    threshold_ratio: Decimal,
) -> Vec<SlowMover> {
    slow_rotation_in(&SalesSummary::build(sales), &SkuIndex::build(stock), threshold_ratio)
}

pub fn slow_rotation_in(
    summary: &SalesSummary<'_>,
    index: &SkuIndex<'_>,
    threshold_ratio: Decimal,
) -> Vec<SlowMover> {
    let day_span = summary.day_span();
    let sku_days = day_span.saturating_mul(summary.totals.len() as i64);
    let cutoff = threshold_ratio * per_day(summary.total_units, sku_days);

    summary
        .totals
        .iter()
        .filter_map(|(sku, units)| {
            let daily_average = per_day(*units, day_span);
            if daily_average >= cutoff {
                return None;
            }
            let Some(item) = index.get(sku) else {
                tracing::debug!(sku = %sku, "Slow-moving SKU has no stock row; skipped.");
                return None;
            };
            Some(SlowMover {
                item: item.clone(),
                daily_average,
            })
        })
        .collect()
}

/// Stock SKUs that never sold, or whose last sale is at least `idle_days` before the
/// latest sale date in the table.
pub fn dead_stock(sales: &[SaleRecord], stock: &[StockItem], idle_days: i64) -> Vec<StockItem> {
    dead_stock_in(&SalesSummary::build(sales), &SkuIndex::build(stock), idle_days)
}

pub fn dead_stock_in(
    summary: &SalesSummary<'_>,
    index: &SkuIndex<'_>,
    idle_days: i64,
) -> Vec<StockItem> {
    index
        .items()
        .filter(|item| match (summary.last_sale.get(&item.sku), summary.last_date) {
            (Some(last), Some(latest)) => (latest - *last).num_days() >= idle_days,
            _ => true,
        })
        .cloned()
        .collect()
}

/// The `n` best-selling SKUs in the calendar month of the latest sale.
///
/// The month comes from the data, not from the wall clock. Equal totals keep SKU order.
pub fn top_sellers_for_month(
    sales: &[SaleRecord],
    stock: &[StockItem],
    n: usize,
) -> Vec<MonthlyTopSeller> {
    top_sellers_for_month_in(sales, &SkuIndex::build(stock), n)
}

pub fn top_sellers_for_month_in(
    sales: &[SaleRecord],
    index: &SkuIndex<'_>,
    n: usize,
) -> Vec<MonthlyTopSeller> {
    let Some(latest) = sales.iter().map(|s| s.date).max() else {
        return Vec::new();
    };

    rank_by_units(sales, |s| s.date.year() == latest.year() && s.date.month() == latest.month())
        .into_iter()
        .filter_map(|(sku, units)| {
            index.get(sku).map(|item| MonthlyTopSeller {
                item: item.clone(),
                units_sold_in_month: units,
            })
        })
        .take(n)
        .collect()
}

/// Estimated units sold per day for every stock SKU, rounded to two decimals.
/// SKUs without sales get zero.
pub fn sales_velocity(sales: &[SaleRecord], stock: &[StockItem]) -> SkuRates {
    sales_velocity_in(&SalesSummary::build(sales), &SkuIndex::build(stock))
}

pub fn sales_velocity_in(summary: &SalesSummary<'_>, index: &SkuIndex<'_>) -> SkuRates {
    let day_span = summary.day_span();
    index
        .items()
        .map(|item| {
            let rate = round2(per_day(summary.units_for(&item.sku), day_span));
            (item.sku.clone(), rate)
        })
        .collect()
}

/// Average units sold per day for every SKU that appears in the sales table.
pub fn average_units_sold(sales: &[SaleRecord]) -> SkuRates {
    average_units_sold_in(&SalesSummary::build(sales))
}

pub fn average_units_sold_in(summary: &SalesSummary<'_>) -> SkuRates {
    let day_span = summary.day_span();
    summary
        .totals
        .iter()
        .map(|(sku, units)| ((*sku).clone(), round2(per_day(*units, day_span))))
        .collect()
}

pub fn global_metrics(
    stock: &[StockItem],
    sales: &[SaleRecord],
    history: &[HistoryRecord],
) -> GlobalMetrics {
    global_metrics_in(&AnalysisContext::build(stock, sales, history))
}

pub fn global_metrics_in(ctx: &AnalysisContext<'_>) -> GlobalMetrics {
    let total_units_sold = ctx.summary.total_units;
    let product_count = ctx.index.len();

    GlobalMetrics {
        total_stock: ctx.stock.iter().fold(0i64, |acc, item| acc.saturating_add(item.stock)),
        total_units_sold,
        product_count,
        stockout_observations: ctx.history.iter().filter(|h| h.is_stockout()).count(),
        restock_observations: ctx.history.iter().filter(|h| h.restocked).count(),
        mean_rotation: round2(per_day(total_units_sold, product_count as i64)),
    }
}

/// Stockout and restock events in history order. A row that is both a stockout and a
/// restock yields two events, stockout first.
pub fn detect_events(history: &[HistoryRecord]) -> Vec<InventoryEvent> {
    let mut events = Vec::new();
    for row in history {
        if row.is_stockout() {
            events.push(InventoryEvent {
                kind: EventKind::Stockout,
                sku: row.sku.clone(),
                date: row.date,
            });
        }
        if row.restocked {
            events.push(InventoryEvent {
                kind: EventKind::Restock,
                sku: row.sku.clone(),
                date: row.date,
            });
        }
    }
    events
}

pub fn dashboard_summary(stock: &[StockItem], sales: &[SaleRecord]) -> DashboardSummary {
    dashboard_summary_in(&SalesSummary::build(sales), &SkuIndex::build(stock))
}

pub fn dashboard_summary_in(summary: &SalesSummary<'_>, index: &SkuIndex<'_>) -> DashboardSummary {
    let product_count = index.len();
    DashboardSummary {
        product_count,
        total_units_sold: summary.total_units,
        rotation_average: round2(per_day(summary.total_units, product_count as i64)),
    }
}

/// The `n` best sellers over the whole sales table.
pub fn dashboard_top_sellers(
    sales: &[SaleRecord],
    stock: &[StockItem],
    n: usize,
) -> Vec<TopSeller> {
    dashboard_top_sellers_in(&SalesSummary::build(sales), &SkuIndex::build(stock), n)
}

pub fn dashboard_top_sellers_in(
    summary: &SalesSummary<'_>,
    index: &SkuIndex<'_>,
    n: usize,
) -> Vec<TopSeller> {
    summary
        .ranking()
        .into_iter()
        .filter_map(|(sku, units)| {
            index.get(sku).map(|item| TopSeller {
                name: item.name.clone(),
                sku: sku.clone(),
                units_sold: units,
            })
        })
        .take(n)
        .collect()
}

/// The latest date seen in either sales or history; `None` when both are empty.
pub fn last_analysis_date(sales: &[SaleRecord], history: &[HistoryRecord]) -> Option<NaiveDate> {
    let latest_sale = sales.iter().map(|s| s.date).max();
    let latest_history = history.iter().map(|h| h.date).max();
    latest_sale.max(latest_history)
}

/// `units / days`, or zero when there are no days to spread over.
fn per_day(units: i64, days: i64) -> Decimal {
    if days <= 0 {
        return Decimal::ZERO;
    }
    Decimal::from(units) / Decimal::from(days)
}

fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}
