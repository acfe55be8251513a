use crate::{error::AppError, AppState};
use analytics::AnalysisResponse;
use axum::{
    body::Bytes,
    extract::{Multipart, State},
    Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

pub const STOCK_FIELD: &str = "stock_file";
pub const SALES_FIELD: &str = "ventas_file";
pub const HISTORY_FIELD: &str = "historico_file";

/// # GET /
/// Liveness probe for the hosting platform.
pub async fn root() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// # POST /procesar-todos/
/// Takes the stock, sales and history CSV files as a multipart upload and answers with
/// the detailed (`openai`) and dashboard views of the analysis.
pub async fn process_all(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<AnalysisResponse>, AppError> {
    let mut stock: Option<Bytes> = None;
    let mut sales: Option<Bytes> = None;
    let mut history: Option<Bytes> = None;

    while let Some(field) = multipart.next_field().await? {
        let Some(name) = field.name().map(str::to_owned) else {
            continue;
        };
        let slot = match name.as_str() {
            STOCK_FIELD => &mut stock,
            SALES_FIELD => &mut sales,
            HISTORY_FIELD => &mut history,
            _ => {
                tracing::debug!(field = %name, "Ignoring unexpected upload field.");
                continue;
            }
        };
        *slot = Some(field.bytes().await?);
    }

    let stock = stock.ok_or(AppError::MissingFile(STOCK_FIELD))?;
    let sales = sales.ok_or(AppError::MissingFile(SALES_FIELD))?;
    let history = history.ok_or(AppError::MissingFile(HISTORY_FIELD))?;

    let tables = ingestion::load_tables(&stock, &sales, &history)?;
    Ok(Json(state.engine.analyze(&tables)))
}
