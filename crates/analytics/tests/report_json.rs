use analytics::AnalyticsEngine;
use core_types::InventoryTables;
use serde_json::{Value, json};

const STOCK_CSV: &str = "\
SKU,Producto,Categoría,Talla,Color,Stock,Precio_Unitario,Umbral
1,Camiseta básica,Camisetas,M,Blanco,5,12.50,10
2,Vaqueros slim,Pantalones,40,Azul,30,45.00,5
3,Chaqueta,Abrigos,L,Negro,12,89.90,4
";

const SALES_CSV: &str = "\
Fecha,SKU,Unidades_Vendidas
2024-02-20,3,1
2024-03-01,1,6
2024-03-05,2,2
2024-03-10,1,4
";

const HISTORY_CSV: &str = "\
Fecha,SKU,Stock,Unidades_Vendidas,Reposicion,Precio_Unitario,Ingresos_Brutos
2024-03-01,1,0,6,1,12.50,75.00
2024-03-05,2,30,2,0,45.00,90.00
2024-03-11,3,0,0,0,89.90,0
";

fn load(stock: &str, sales: &str, history: &str) -> InventoryTables {
    ingestion::load_tables(stock.as_bytes(), sales.as_bytes(), history.as_bytes()).unwrap()
}

fn analyze(tables: &InventoryTables) -> Value {
    serde_json::to_value(AnalyticsEngine::default().analyze(tables)).unwrap()
}

#[test]
fn response_has_both_blocks_with_wire_keys() {
    let body = analyze(&load(STOCK_CSV, SALES_CSV, HISTORY_CSV));

    let openai = &body["openai"];
    for key in [
        "productos_bajo_stock",
        "productos_rotacion_lenta",
        "productos_muertos",
        "top_5_mas_vendidos_mes",
        "estimaciones_velocidad_venta",
        "promedios_unidades_vendidas",
        "metricas_globales",
        "eventos_detectados",
    ] {
        assert!(openai.get(key).is_some(), "missing openai.{key}");
    }

    let dashboard = &body["dashboard"];
    for key in [
        "alerta_stock_bajo",
        "resumen_global",
        "top_3_mas_vendidos",
        "fecha_ultimo_analisis",
    ] {
        assert!(dashboard.get(key).is_some(), "missing dashboard.{key}");
    }
}

#[test]
fn detailed_block_values() {
    let body = analyze(&load(STOCK_CSV, SALES_CSV, HISTORY_CSV));
    let openai = &body["openai"];

    let low = openai["productos_bajo_stock"].as_array().unwrap();
    assert_eq!(low.len(), 1);
    assert_eq!(low[0]["SKU"], 1);
    assert_eq!(low[0]["Producto"], "Camiseta básica");
    assert_eq!(low[0]["Categoría"], "Camisetas");

    // 2024-02-20 ..= 2024-03-10 is 20 days.
    assert_eq!(openai["estimaciones_velocidad_venta"], json!({ "1": 0.5, "2": 0.1, "3": 0.05 }));
    assert_eq!(openai["promedios_unidades_vendidas"], json!({ "1": 0.5, "2": 0.1, "3": 0.05 }));

    // Global average is 13 / (3 * 20), about 0.217; the cutoff is half of that.
    let slow = openai["productos_rotacion_lenta"].as_array().unwrap();
    assert_eq!(slow.len(), 2);
    assert_eq!(slow[0]["SKU"], 2);
    assert_eq!(slow[0]["media_diaria"], 0.1);
    assert_eq!(slow[1]["SKU"], 3);
    assert_eq!(slow[1]["media_diaria"], 0.05);

    // Last sale of SKU 3 is 19 days before the latest sale.
    let dead = openai["productos_muertos"].as_array().unwrap();
    assert_eq!(dead.len(), 1);
    assert_eq!(dead[0]["SKU"], 3);

    let top = openai["top_5_mas_vendidos_mes"].as_array().unwrap();
    assert_eq!(top.len(), 2);
    assert_eq!(top[0]["SKU"], 1);
    assert_eq!(top[0]["total_vendido_mes"], 10);
    assert_eq!(top[1]["SKU"], 2);

    assert_eq!(
        openai["metricas_globales"],
        json!({
            "total_stock": 47,
            "total_vendido": 13,
            "num_productos": 3,
            "num_roturas_detectadas": 2,
            "num_reposiciones_detectadas": 1,
            "media_rotacion_por_producto": 4.33,
        })
    );

    assert_eq!(
        openai["eventos_detectados"],
        json!([
            { "tipo": "rotura_stock", "SKU": 1, "fecha": "2024-03-01" },
            { "tipo": "reposicion", "SKU": 1, "fecha": "2024-03-01" },
            { "tipo": "rotura_stock", "SKU": 3, "fecha": "2024-03-11" },
        ])
    );
}

#[test]
fn dashboard_block_values() {
    let body = analyze(&load(STOCK_CSV, SALES_CSV, HISTORY_CSV));
    let dashboard = &body["dashboard"];

    assert_eq!(
        dashboard["alerta_stock_bajo"],
        json!([{ "nombre": "Camiseta básica", "sku": 1, "stock_restante": 5 }])
    );
    assert_eq!(
        dashboard["resumen_global"],
        json!({ "total_productos": 3, "total_vendido": 13, "promedio_rotacion": 4.33 })
    );
    assert_eq!(
        dashboard["top_3_mas_vendidos"],
        json!([
            { "nombre": "Camiseta básica", "sku": 1, "total_vendido": 10 },
            { "nombre": "Vaqueros slim", "sku": 2, "total_vendido": 2 },
            { "nombre": "Chaqueta", "sku": 3, "total_vendido": 1 },
        ])
    );
    assert_eq!(dashboard["fecha_ultimo_analisis"], "2024-03-11");
}

#[test]
fn empty_sales_and_history_degrade_gracefully() {
    let tables = load(
        STOCK_CSV,
        "Fecha,SKU,Unidades_Vendidas\n",
        "Fecha,SKU,Stock,Unidades_Vendidas,Reposicion,Precio_Unitario,Ingresos_Brutos\n",
    );
    let body = analyze(&tables);

    assert_eq!(body["openai"]["top_5_mas_vendidos_mes"], json!([]));
    assert_eq!(body["openai"]["promedios_unidades_vendidas"], json!({}));
    assert_eq!(body["openai"]["productos_rotacion_lenta"], json!([]));
    assert_eq!(body["openai"]["productos_muertos"].as_array().unwrap().len(), 3);
    assert_eq!(
        body["openai"]["estimaciones_velocidad_venta"],
        json!({ "1": 0.0, "2": 0.0, "3": 0.0 })
    );
    assert_eq!(body["dashboard"]["top_3_mas_vendidos"], json!([]));
    assert_eq!(body["dashboard"]["fecha_ultimo_analisis"], "");
}

#[test]
fn free_form_skus_stay_strings() {
    let stock = "\
SKU,Producto,Categoría,Talla,Color,Stock,Precio_Unitario,Umbral
TSH-007,Camiseta,Camisetas,S,Rojo,1,10,2
";
    let sales = "Fecha,SKU,Unidades_Vendidas\n2024-04-01,TSH-007,3\n";
    let history = "Fecha,SKU,Stock,Unidades_Vendidas,Reposicion,Precio_Unitario,Ingresos_Brutos\n";
    let body = analyze(&load(stock, sales, history));

    assert_eq!(body["openai"]["productos_bajo_stock"][0]["SKU"], "TSH-007");
    assert_eq!(body["openai"]["estimaciones_velocidad_venta"], json!({ "TSH-007": 3.0 }));
}
