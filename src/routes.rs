// src/routes.rs

use axum::{
    routing::{get, patch, post},
    Json, Router,
};
use utoipa::OpenApi;

use crate::{config::AppState, docs::ApiDoc, handlers};

pub fn build_router(app_state: AppState) -> Router {
    let supplier_routes = Router::new()
        .route(
            "/",
            get(handlers::suppliers::list_suppliers).post(handlers::suppliers::create_supplier),
        )
        .route(
            "/{id}",
            get(handlers::suppliers::get_supplier)
                .put(handlers::suppliers::update_supplier)
                .delete(handlers::suppliers::delete_supplier),
        )
        .route("/{id}/toggle-status", patch(handlers::suppliers::toggle_supplier_status));

    let brand_routes = Router::new()
        .route("/", get(handlers::brands::list_brands).post(handlers::brands::create_brand))
        .route(
            "/{id}",
            get(handlers::brands::get_brand)
                .put(handlers::brands::update_brand)
                .delete(handlers::brands::delete_brand),
        )
        .route("/{id}/toggle-status", patch(handlers::brands::toggle_brand_status));

    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route("/active", get(handlers::products::list_active_products))
        .route(
            "/{id}",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route("/{id}/toggle-status", patch(handlers::products::toggle_product_status));

    let stock_routes = Router::new()
        .route("/", get(handlers::stock::list_stock))
        .route("/low-stock", get(handlers::stock::list_low_stock))
        .route(
            "/product/{product_id}",
            get(handlers::stock::get_stock_by_product).put(handlers::stock::set_stock),
        )
        .route("/product/{product_id}/add", post(handlers::stock::add_stock))
        .route("/product/{product_id}/reduce", post(handlers::stock::reduce_stock));

    let output_routes = Router::new()
        .route(
            "/",
            get(handlers::stock_outputs::list_outputs).post(handlers::stock_outputs::create_output),
        )
        .route("/recent", get(handlers::stock_outputs::list_recent_outputs))
        .route("/date-range", get(handlers::stock_outputs::list_outputs_by_date_range))
        .route("/product/{product_id}", get(handlers::stock_outputs::list_outputs_by_product))
        .route(
            "/{id}",
            get(handlers::stock_outputs::get_output)
                .put(handlers::stock_outputs::update_output)
                .delete(handlers::stock_outputs::delete_output),
        );

    let configuration_routes = Router::new()
        .route(
            "/",
            get(handlers::supplier_configurations::list_configurations)
                .post(handlers::supplier_configurations::create_configuration),
        )
        .route(
            "/supplier/{supplier_id}",
            get(handlers::supplier_configurations::get_configuration_by_supplier),
        )
        .route(
            "/{id}",
            get(handlers::supplier_configurations::get_configuration)
                .put(handlers::supplier_configurations::update_configuration)
                .delete(handlers::supplier_configurations::delete_configuration),
        )
        .route(
            "/{id}/toggle-status",
            patch(handlers::supplier_configurations::toggle_configuration_status),
        )
        .route(
            "/{id}/reorder-plan",
            get(handlers::supplier_configurations::get_reorder_plan),
        );

    Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .nest("/api/suppliers", supplier_routes)
        .nest("/api/brands", brand_routes)
        .nest("/api/products", product_routes)
        .nest("/api/stock", stock_routes)
        .nest("/api/stock-outputs", output_routes)
        .nest("/api/supplier-configurations", configuration_routes)
        .with_state(app_state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Method, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;
    use crate::db::MemoryStore;

    fn app() -> Router {
        build_router(AppState::from_store(Arc::new(MemoryStore::new()), 10))
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>, lang: &str) -> (StatusCode, Value) {
        let mut request = Request::builder()
            .method(method)
            .uri(uri)
            .header(header::ACCEPT_LANGUAGE, lang);
        let body = match body {
            Some(value) => {
                request = request.header(header::CONTENT_TYPE, "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = app.clone().oneshot(request.body(body).unwrap()).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    // Fornecedor + marca + produto com saldo inicial; devolve o id do produto.
    async fn seed_product(app: &Router, initial_stock: i32) -> String {
        let (status, supplier) = send(
            app,
            Method::POST,
            "/api/suppliers",
            Some(json!({
                "name": "MedSupply Brasil",
                "cnpj": "12.345.678/0001-90",
                "phone": "(11) 3456-7890",
                "email": "contato@medsupply.com.br"
            })),
            "pt-BR",
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, brand) = send(app, Method::POST, "/api/brands", Some(json!({ "name": "MedTech" })), "pt").await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, product) = send(
            app,
            Method::POST,
            "/api/products",
            Some(json!({
                "code": " prod001 ",
                "name": "Seringa 10ml",
                "supplierId": supplier["id"],
                "brandId": brand["id"],
                "initialStock": initial_stock
            })),
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(product["code"], "PROD001");
        assert_eq!(product["stockQuantity"], initial_stock);

        product["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn health_answers_ok() {
        let response = app()
            .oneshot(Request::builder().uri("/api/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let (status, doc) = send(&app(), Method::GET, "/api-docs/openapi.json", None, "pt").await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/stock-outputs"].is_object());
    }

    #[tokio::test]
    async fn create_then_get_brand() {
        let app = app();
        let (status, brand) = send(&app, Method::POST, "/api/brands", Some(json!({ "name": "  Baxter " })), "pt").await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(brand["name"], "Baxter");
        assert_eq!(brand["active"], true);

        let uri = format!("/api/brands/{}", brand["id"].as_str().unwrap());
        let (status, fetched) = send(&app, Method::GET, &uri, None, "pt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["id"], brand["id"]);

        let (status, _) = send(&app, Method::POST, "/api/brands", Some(json!({ "name": "baxter" })), "pt").await;
        assert_eq!(status, StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn not_found_is_translated() {
        let app = app();
        let id = Uuid::new_v4();
        let uri = format!("/api/suppliers/{id}");

        let (status, body) = send(&app, Method::GET, &uri, None, "en-US,en;q=0.9").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "not_found");
        assert_eq!(body["message"], format!("Supplier with ID {id} not found"));

        let (_, body) = send(&app, Method::GET, &uri, None, "pt-BR").await;
        assert_eq!(body["message"], format!("Fornecedor com ID {id} não encontrado"));
    }

    #[tokio::test]
    async fn invalid_payload_is_rejected_with_details() {
        let (status, body) = send(
            &app(),
            Method::POST,
            "/api/suppliers",
            Some(json!({ "name": "AB", "cnpj": "123", "phone": "abc", "email": "nope" })),
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "validation_error");
        for field in ["name", "cnpj", "phone", "email"] {
            assert!(body["details"][field].is_array(), "faltou o campo {field}");
        }
    }

    #[tokio::test]
    async fn output_flow_updates_stock_and_reverses_on_delete() {
        let app = app();
        let product_id = seed_product(&app, 50).await;

        let (status, output) = send(
            &app,
            Method::POST,
            "/api/stock-outputs",
            Some(json!({ "productId": product_id, "quantity": 20, "notes": "Cirurgia" })),
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(output["productCode"], "PROD001");

        let stock_uri = format!("/api/stock/product/{product_id}");
        let (_, stock) = send(&app, Method::GET, &stock_uri, None, "pt").await;
        assert_eq!(stock["quantity"], 30);

        let (status, outputs) = send(
            &app,
            Method::GET,
            &format!("/api/stock-outputs/product/{product_id}"),
            None,
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(outputs.as_array().map(Vec::len), Some(1));

        let output_uri = format!("/api/stock-outputs/{}", output["id"].as_str().unwrap());
        let (status, _) = send(&app, Method::DELETE, &output_uri, None, "pt").await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (_, stock) = send(&app, Method::GET, &stock_uri, None, "pt").await;
        assert_eq!(stock["quantity"], 50);
    }

    #[tokio::test]
    async fn insufficient_stock_is_unprocessable() {
        let app = app();
        let product_id = seed_product(&app, 5).await;

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/stock-outputs",
            Some(json!({ "productId": product_id, "quantity": 10 })),
            "en",
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["error"], "insufficient_stock");
        assert_eq!(body["available"], 5);
        assert_eq!(body["requested"], 10);
        assert_eq!(body["message"], "Insufficient stock. Available: 5, Requested: 10");

        let (_, stock) = send(&app, Method::GET, &format!("/api/stock/product/{product_id}"), None, "pt").await;
        assert_eq!(stock["quantity"], 5);
    }

    #[tokio::test]
    async fn out_of_range_dates_are_bad_requests() {
        let app = app();

        let (status, body) = send(&app, Method::GET, "/api/stock-outputs/recent?days=1000000000", None, "en").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "overflow");

        let (status, body) = send(
            &app,
            Method::GET,
            "/api/stock-outputs?startDate=2025-02-01T00:00:00Z&endDate=2025-01-01T00:00:00Z",
            None,
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["reason"], "invalid_date_range");
    }

    #[tokio::test]
    async fn low_stock_uses_query_threshold() {
        let app = app();
        seed_product(&app, 8).await;

        let (_, default_low) = send(&app, Method::GET, "/api/stock/low-stock", None, "pt").await;
        assert_eq!(default_low.as_array().map(Vec::len), Some(1));

        let (_, strict_low) = send(&app, Method::GET, "/api/stock/low-stock?minQuantity=5", None, "pt").await;
        assert_eq!(strict_low.as_array().map(Vec::len), Some(0));
    }

    #[tokio::test]
    async fn supplier_with_products_cannot_be_deleted() {
        let app = app();
        seed_product(&app, 1).await;

        let (_, suppliers) = send(&app, Method::GET, "/api/suppliers", None, "pt").await;
        let supplier_id = suppliers[0]["id"].as_str().unwrap().to_string();

        let (status, body) = send(&app, Method::DELETE, &format!("/api/suppliers/{supplier_id}"), None, "pt").await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "in_use");
    }

    #[tokio::test]
    async fn configuration_consistency_and_reorder_plan() {
        let app = app();
        seed_product(&app, 1).await;
        let (_, suppliers) = send(&app, Method::GET, "/api/suppliers", None, "pt").await;
        let supplier_id = suppliers[0]["id"].clone();

        let (status, body) = send(
            &app,
            Method::POST,
            "/api/supplier-configurations",
            Some(json!({
                "supplierId": supplier_id,
                "planningMonths": 2,
                "minimumMonths": 6,
                "deliveryLeadTimeDays": 15
            })),
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["details"]["minimumMonths"].is_array());

        let (status, config) = send(
            &app,
            Method::POST,
            "/api/supplier-configurations",
            Some(json!({
                "supplierId": supplier_id,
                "planningMonths": 6,
                "minimumMonths": 2,
                "deliveryLeadTimeDays": 15
            })),
            "pt",
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(config["supplierName"], "MedSupply Brasil");

        let uri = format!(
            "/api/supplier-configurations/{}/reorder-plan?averageMonthlyConsumption=10",
            config["id"].as_str().unwrap()
        );
        let (status, plan) = send(&app, Method::GET, &uri, None, "pt").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plan["reorderQuantity"], 60);
    }
}
