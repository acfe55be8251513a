use analytics::AnalyticsEngine;
use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use configuration::Config;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer, ExposeHeaders},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
///
/// It is read-only: each request parses its own tables and runs its own analysis.
#[derive(Debug, Clone)]
pub struct AppState {
    pub engine: AnalyticsEngine,
}

/// Builds the application routes and middleware.
pub fn build_router(state: Arc<AppState>, body_limit_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any())
        .expose_headers(ExposeHeaders::any());

    Router::new()
        .route("/", get(handlers::root))
        .route("/api/health", get(|| async { "OK" }))
        .route("/procesar-todos/", post(handlers::process_all))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(body_limit_bytes))
}

/// The main function to configure and run the web server.
///
/// Tracing is expected to be initialized by the binary that calls this.
pub async fn run_server(config: Config) -> anyhow::Result<()> {
    let engine = AnalyticsEngine::new(config.analytics.clone())?;
    let app_state = Arc::new(AppState { engine });
    let app = build_router(app_state, config.server.body_limit_bytes());

    let addr = config.server.socket_addr();
    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    const BOUNDARY: &str = "stockpymes-test-boundary";

    const STOCK_CSV: &str = "\
SKU,Producto,Categoría,Talla,Color,Stock,Precio_Unitario,Umbral
1,Camiseta básica,Camisetas,M,Blanco,5,12.50,10
2,Vaqueros slim,Pantalones,40,Azul,30,45.00,5
";
    const SALES_CSV: &str = "Fecha,SKU,Unidades_Vendidas\n2024-03-01,1,6\n2024-03-02,2,2\n";
    const HISTORY_CSV: &str = "\
Fecha,SKU,Stock,Unidades_Vendidas,Reposicion,Precio_Unitario,Ingresos_Brutos
2024-03-03,1,0,0,1,12.50,0
";

    fn app() -> Router {
        let state = Arc::new(AppState {
            engine: AnalyticsEngine::default(),
        });
        build_router(state, 1024 * 1024)
    }

    fn multipart_request(parts: &[(&str, &str)]) -> Request<Body> {
        let mut body = String::new();
        for (name, content) in parts {
            body.push_str(&format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.csv\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
            ));
        }
        body.push_str(&format!("--{BOUNDARY}--\r\n"));

        Request::builder()
            .method("POST")
            .uri("/procesar-todos/")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn root_reports_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["status"], "ok");
    }

    #[tokio::test]
    async fn process_all_returns_both_blocks() {
        let request = multipart_request(&[
            ("stock_file", STOCK_CSV),
            ("ventas_file", SALES_CSV),
            ("historico_file", HISTORY_CSV),
        ]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["openai"]["metricas_globales"]["num_productos"], 2);
        assert_eq!(body["openai"]["eventos_detectados"].as_array().unwrap().len(), 2);
        assert_eq!(body["dashboard"]["alerta_stock_bajo"][0]["sku"], 1);
        assert_eq!(body["dashboard"]["fecha_ultimo_analisis"], "2024-03-03");
    }

    #[tokio::test]
    async fn missing_file_is_a_bad_request() {
        let request = multipart_request(&[("stock_file", STOCK_CSV), ("ventas_file", SALES_CSV)]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert!(body["error"].as_str().unwrap().contains("historico_file"));
    }

    #[tokio::test]
    async fn wrong_columns_are_unprocessable() {
        let request = multipart_request(&[
            ("stock_file", STOCK_CSV),
            ("ventas_file", "Fecha,Producto,Unidades\n2024-03-01,1,6\n"),
            ("historico_file", HISTORY_CSV),
        ]);
        let response = app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body = json_body(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.contains("ventas.csv"));
        assert!(message.contains("Unidades_Vendidas"));
    }
}
