use crate::error::AnalyticsError;
use crate::index::AnalysisContext;
use crate::metrics;
use crate::report::{AnalysisResponse, DashboardReport, DetailedReport};
use configuration::AnalyticsParams;
use core_types::InventoryTables;

/// A stateless calculator that turns the three inventory tables into reports.
///
/// The engine only carries its tuning parameters. Every call reads the tables it is
/// given and nothing else, so the same input always yields the same report.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsEngine {
    params: AnalyticsParams,
}

impl AnalyticsEngine {
    pub fn new(params: AnalyticsParams) -> Result<Self, AnalyticsError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &AnalyticsParams {
        &self.params
    }

    /// The main entry point: both views of one analysis run.
    pub fn analyze(&self, tables: &InventoryTables) -> AnalysisResponse {
        tracing::info!(
            stock_rows = tables.stock.len(),
            sales_rows = tables.sales.len(),
            history_rows = tables.history.len(),
            "Running inventory analysis."
        );
        let ctx = AnalysisContext::from_tables(tables);
        AnalysisResponse {
            openai: self.detailed_report_in(&ctx),
            dashboard: self.dashboard_report_in(&ctx),
        }
    }

    /// Builds the full report for automated consumers.
    pub fn detailed_report(&self, tables: &InventoryTables) -> DetailedReport {
        self.detailed_report_in(&AnalysisContext::from_tables(tables))
    }

    /// Builds the condensed dashboard view.
    pub fn dashboard_report(&self, tables: &InventoryTables) -> DashboardReport {
        self.dashboard_report_in(&AnalysisContext::from_tables(tables))
    }

    fn detailed_report_in(&self, ctx: &AnalysisContext<'_>) -> DetailedReport {
        let p = &self.params;

        let report = DetailedReport {
            low_stock: metrics::low_stock(ctx.stock),
            slow_rotation: metrics::slow_rotation_in(&ctx.summary, &ctx.index, p.slow_rotation_ratio),
            dead_stock: metrics::dead_stock_in(&ctx.summary, &ctx.index, p.dead_stock_idle_days),
            top_sellers_month: metrics::top_sellers_for_month_in(ctx.sales, &ctx.index, p.top_month_n),
            sales_velocity: metrics::sales_velocity_in(&ctx.summary, &ctx.index),
            average_units_sold: metrics::average_units_sold_in(&ctx.summary),
            global_metrics: metrics::global_metrics_in(ctx),
            events: metrics::detect_events(ctx.history),
        };

        tracing::debug!(
            low_stock = report.low_stock.len(),
            slow_rotation = report.slow_rotation.len(),
            dead_stock = report.dead_stock.len(),
            top_sellers = report.top_sellers_month.len(),
            events = report.events.len(),
            "Detailed report built."
        );
        report
    }

    fn dashboard_report_in(&self, ctx: &AnalysisContext<'_>) -> DashboardReport {
        let top_n = self.params.dashboard_top_n;

        let report = DashboardReport {
            low_stock_alerts: metrics::low_stock_alerts(ctx.stock),
            summary: metrics::dashboard_summary_in(&ctx.summary, &ctx.index),
            top_sellers: metrics::dashboard_top_sellers_in(&ctx.summary, &ctx.index, top_n),
            last_analysis_date: metrics::last_analysis_date(ctx.sales, ctx.history),
        };

        tracing::debug!(
            alerts = report.low_stock_alerts.len(),
            top_sellers = report.top_sellers.len(),
            last_analysis_date = ?report.last_analysis_date,
            "Dashboard report built."
        );
        report
    }
}
