//! # Inventory Analytics Engine
//!
//! This crate derives inventory facts from three tables: current stock, the sales log
//! and the stock/sales history. It finds low-stock and dead products, slow movers and
//! best sellers, and computes sales velocity, global KPIs and stockout/restock events.
//!
//! ## Architectural Principles
//!
//! - **Layer 1 Logic:** This is a pure logic crate. It has no knowledge of files, HTTP or
//!   any other external system. It depends only on `core-types` and `configuration`.
//! - **Stateless Calculation:** Every metric in [`metrics`] is a pure function of the
//!   tables it is handed. Degenerate input (empty tables, a single sales day, SKUs missing
//!   from stock) yields empty or zero results instead of errors.
//!
//! ## Public API
//!
//! - `AnalyticsEngine`: applies the configured parameters and assembles the reports.
//! - `metrics`: the individual metric functions.
//! - `DetailedReport` / `DashboardReport` / `AnalysisResponse`: the serializable outputs.
//! - `AnalyticsError`: returned when the engine is built with invalid parameters.

// Declare the modules that constitute this crate.
pub mod engine;
pub mod error;
pub mod index;
pub mod metrics;
pub mod report;

// Re-export the key components to create a clean, public-facing API.
pub use engine::AnalyticsEngine;
pub use error::AnalyticsError;
pub use report::{AnalysisResponse, DashboardReport, DetailedReport};
