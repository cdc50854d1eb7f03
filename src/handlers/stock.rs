// src/handlers/stock.rs

use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::stock::StockView,
};

// Entrada e baixa.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockMovementPayload {
    #[validate(range(min = 1, message = "A quantidade deve ser maior que zero."))]
    #[schema(example = 10)]
    pub quantity: i32,
}

// Ajuste absoluto (PUT).
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SetStockPayload {
    #[validate(range(min = 0, message = "A quantidade não pode ser negativa."))]
    #[schema(example = 50)]
    pub quantity: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LowStockQuery {
    /// Limite inclusivo; se omitido, vale o LOW_STOCK_THRESHOLD configurado.
    pub min_quantity: Option<i32>,
}

#[utoipa::path(
    get,
    path = "/api/stock",
    tag = "Stock",
    responses((status = 200, description = "Saldos de todos os produtos", body = Vec<StockView>))
)]
pub async fn list_stock(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let stock = app_state
        .stock_service
        .list_all()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}

#[utoipa::path(
    get,
    path = "/api/stock/low-stock",
    tag = "Stock",
    params(LowStockQuery),
    responses((status = 200, description = "Saldos no limite ou abaixo", body = Vec<StockView>))
)]
pub async fn list_low_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<LowStockQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let stock = app_state
        .stock_service
        .list_low_stock(query.min_quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}

#[utoipa::path(
    get,
    path = "/api/stock/product/{product_id}",
    tag = "Stock",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Saldo do produto", body = StockView),
        (status = 404, description = "Saldo não encontrado")
    )
)]
pub async fn get_stock_by_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let stock = app_state
        .stock_service
        .get_by_product(product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}

#[utoipa::path(
    put,
    path = "/api/stock/product/{product_id}",
    tag = "Stock",
    request_body = SetStockPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Saldo ajustado", body = StockView),
        (status = 404, description = "Saldo não encontrado")
    )
)]
pub async fn set_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<SetStockPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let stock = app_state
        .stock_service
        .set_stock(product_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}

#[utoipa::path(
    post,
    path = "/api/stock/product/{product_id}/add",
    tag = "Stock",
    request_body = StockMovementPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Entrada registrada", body = StockView),
        (status = 404, description = "Saldo não encontrado")
    )
)]
pub async fn add_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let stock = app_state
        .stock_service
        .add_stock(product_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}

#[utoipa::path(
    post,
    path = "/api/stock/product/{product_id}/reduce",
    tag = "Stock",
    request_body = StockMovementPayload,
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Baixa registrada", body = StockView),
        (status = 404, description = "Saldo não encontrado"),
        (status = 422, description = "Estoque insuficiente")
    )
)]
pub async fn reduce_stock(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<Uuid>,
    Json(payload): Json<StockMovementPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let stock = app_state
        .stock_service
        .reduce_stock(product_id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(stock))
}
