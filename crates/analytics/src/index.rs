use chrono::NaiveDate;
use core_types::{HistoryRecord, InventoryTables, SaleRecord, Sku, StockItem};
use std::collections::{BTreeMap, HashMap};

/// Lookup from SKU to its stock row, built once per computation.
///
/// When the stock file repeats a SKU, the first row in input order wins.
#[derive(Debug, Default)]
pub struct SkuIndex<'a> {
    by_sku: HashMap<&'a Sku, &'a StockItem>,
    // Distinct SKUs in first-appearance order.
    order: Vec<&'a Sku>,
}

impl<'a> SkuIndex<'a> {
    pub fn build(stock: &'a [StockItem]) -> Self {
        let mut index = Self::default();
        for item in stock {
            if !index.by_sku.contains_key(&item.sku) {
                index.by_sku.insert(&item.sku, item);
                index.order.push(&item.sku);
            }
        }
        index
    }

    pub fn get(&self, sku: &Sku) -> Option<&'a StockItem> {
        self.by_sku.get(sku).copied()
    }

    /// Number of distinct SKUs in the stock table.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// The stock row of every distinct SKU, in input order.
    pub fn items(&self) -> impl Iterator<Item = &'a StockItem> + '_ {
        self.order.iter().filter_map(|sku| self.by_sku.get(sku).copied())
    }
}

/// Per-SKU aggregates of a sales table.
#[derive(Debug, Default)]
pub struct SalesSummary<'a> {
    /// Units sold per SKU, in SKU order.
    pub totals: BTreeMap<&'a Sku, i64>,
    /// Date of the most recent sale per SKU.
    pub last_sale: HashMap<&'a Sku, NaiveDate>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub total_units: i64,
}

impl<'a> SalesSummary<'a> {
    pub fn build(sales: &'a [SaleRecord]) -> Self {
        let mut summary = Self::default();
        for sale in sales {
            let total = summary.totals.entry(&sale.sku).or_insert(0);
            *total = total.saturating_add(sale.units_sold);
            summary
                .last_sale
                .entry(&sale.sku)
                .and_modify(|d| *d = (*d).max(sale.date))
                .or_insert(sale.date);
            summary.first_date = Some(summary.first_date.map_or(sale.date, |d| d.min(sale.date)));
            summary.last_date = Some(summary.last_date.map_or(sale.date, |d| d.max(sale.date)));
            summary.total_units = summary.total_units.saturating_add(sale.units_sold);
        }
        summary
    }

    /// Inclusive number of days between the first and last sale; zero without sales.
    pub fn day_span(&self) -> i64 {
        match (self.first_date, self.last_date) {
            (Some(first), Some(last)) => (last - first).num_days() + 1,
            _ => 0,
        }
    }

    pub fn units_for(&self, sku: &Sku) -> i64 {
        self.totals.get(sku).copied().unwrap_or(0)
    }

    /// All-time totals ranked by descending units, ties in SKU order.
    pub fn ranking(&self) -> Vec<(&'a Sku, i64)> {
        let mut ranking: Vec<(&'a Sku, i64)> =
            self.totals.iter().map(|(sku, units)| (*sku, *units)).collect();
        ranking.sort_by(|a, b| b.1.cmp(&a.1));
        ranking
    }
}

/// The input tables of one run together with their SKU index and sales summary,
/// so every metric of a report reads the same lookups.
#[derive(Debug)]
pub struct AnalysisContext<'a> {
    pub stock: &'a [StockItem],
    pub sales: &'a [SaleRecord],
    pub history: &'a [HistoryRecord],
    pub index: SkuIndex<'a>,
    pub summary: SalesSummary<'a>,
}

impl<'a> AnalysisContext<'a> {
    pub fn build(
        stock: &'a [StockItem],
        sales: &'a [SaleRecord],
        history: &'a [HistoryRecord],
    ) -> Self {
        Self {
            stock,
            sales,
            history,
            index: SkuIndex::build(stock),
            summary: SalesSummary::build(sales),
        }
    }

    pub fn from_tables(tables: &'a InventoryTables) -> Self {
        Self::build(&tables.stock, &tables.sales, &tables.history)
    }
}

/// Units per SKU over the rows accepted by `keep`, ranked by descending total.
///
/// The sort is stable over SKU order, so equal totals come out in ascending SKU order.
pub fn rank_by_units<'a, F>(sales: &'a [SaleRecord], keep: F) -> Vec<(&'a Sku, i64)>
where
    F: Fn(&SaleRecord) -> bool,
{
    let mut totals: BTreeMap<&'a Sku, i64> = BTreeMap::new();
    for sale in sales.iter().filter(|s| keep(s)) {
        let total = totals.entry(&sale.sku).or_insert(0);
        *total = total.saturating_add(sale.units_sold);
    }
    let mut ranking: Vec<(&'a Sku, i64)> = totals.into_iter().collect();
    ranking.sort_by(|a, b| b.1.cmp(&a.1));
    ranking
}
