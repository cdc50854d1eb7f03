// src/handlers/stock_outputs.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::stock_output::{OutputFilter, StockOutputView},
    services::stock_output_service::DEFAULT_RECENT_DAYS,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStockOutputPayload {
    pub product_id: Uuid,

    #[validate(range(min = 1, max = 10000, message = "A quantidade deve estar entre 1 e 10000."))]
    #[schema(example = 20)]
    pub quantity: i32,

    #[validate(length(max = 500, message = "As observações devem ter no máximo 500 caracteres."))]
    #[schema(example = "Cirurgia sala 3")]
    pub notes: Option<String>,
}

// Correção administrativa: não mexe no saldo.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStockOutputPayload {
    #[validate(range(min = 1, max = 10000, message = "A quantidade deve estar entre 1 e 10000."))]
    pub quantity: i32,

    #[validate(length(max = 500, message = "As observações devem ter no máximo 500 caracteres."))]
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecentQuery {
    /// Janela em dias (padrão 30).
    pub days: Option<i64>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

#[utoipa::path(
    get,
    path = "/api/stock-outputs",
    tag = "Stock Outputs",
    params(OutputFilter),
    responses((status = 200, description = "Saídas, mais recentes primeiro", body = Vec<StockOutputView>))
)]
pub async fn list_outputs(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<OutputFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let outputs = app_state
        .stock_output_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outputs))
}

#[utoipa::path(
    get,
    path = "/api/stock-outputs/recent",
    tag = "Stock Outputs",
    params(RecentQuery),
    responses(
        (status = 200, description = "Saídas dos últimos N dias", body = Vec<StockOutputView>),
        (status = 400, description = "Número de dias inválido")
    )
)]
pub async fn list_recent_outputs(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<RecentQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let outputs = app_state
        .stock_output_service
        .list_recent(query.days.unwrap_or(DEFAULT_RECENT_DAYS))
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outputs))
}

#[utoipa::path(
    get,
    path = "/api/stock-outputs/date-range",
    tag = "Stock Outputs",
    params(DateRangeQuery),
    responses(
        (status = 200, description = "Saídas no intervalo (inclusivo)", body = Vec<StockOutputView>),
        (status = 400, description = "Intervalo inválido")
    )
)]
pub async fn list_outputs_by_date_range(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<DateRangeQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let outputs = app_state
        .stock_output_service
        .list_by_date_range(query.start_date, query.end_date)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outputs))
}

#[utoipa::path(
    get,
    path = "/api/stock-outputs/product/{product_id}",
    tag = "Stock Outputs",
    params(("product_id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Saídas do produto", body = Vec<StockOutputView>),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn list_outputs_by_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(product_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let outputs = app_state
        .stock_output_service
        .list_by_product(product_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(outputs))
}

#[utoipa::path(
    get,
    path = "/api/stock-outputs/{id}",
    tag = "Stock Outputs",
    params(("id" = Uuid, Path, description = "ID da saída")),
    responses(
        (status = 200, description = "Saída", body = StockOutputView),
        (status = 404, description = "Saída não encontrada")
    )
)]
pub async fn get_output(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let output = app_state
        .stock_output_service
        .get_output(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(output))
}

// POST /api/stock-outputs
#[utoipa::path(
    post,
    path = "/api/stock-outputs",
    tag = "Stock Outputs",
    request_body = CreateStockOutputPayload,
    responses(
        (status = 201, description = "Saída registrada e saldo baixado", body = StockOutputView),
        (status = 404, description = "Produto ou saldo não encontrado"),
        (status = 422, description = "Estoque insuficiente ou produto inativo")
    )
)]
pub async fn create_output(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateStockOutputPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let output = app_state
        .stock_output_service
        .create_output(payload.product_id, payload.quantity, payload.notes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(output)))
}

#[utoipa::path(
    put,
    path = "/api/stock-outputs/{id}",
    tag = "Stock Outputs",
    request_body = UpdateStockOutputPayload,
    params(("id" = Uuid, Path, description = "ID da saída")),
    responses(
        (status = 200, description = "Saída corrigida (saldo inalterado)", body = StockOutputView),
        (status = 404, description = "Saída não encontrada")
    )
)]
pub async fn update_output(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStockOutputPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let output = app_state
        .stock_output_service
        .update_output(id, payload.quantity, payload.notes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(output))
}

// DELETE /api/stock-outputs/{id} (estorna a quantidade para o saldo)
#[utoipa::path(
    delete,
    path = "/api/stock-outputs/{id}",
    tag = "Stock Outputs",
    params(("id" = Uuid, Path, description = "ID da saída")),
    responses(
        (status = 204, description = "Saída excluída e quantidade devolvida ao saldo"),
        (status = 404, description = "Saída não encontrada")
    )
)]
pub async fn delete_output(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .stock_output_service
        .delete_output(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}
