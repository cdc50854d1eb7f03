// src/handlers/brands.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::brand::Brand,
};

// Usado na criação e na edição.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BrandPayload {
    #[validate(length(min = 2, max = 100, message = "O nome da marca deve ter entre 2 e 100 caracteres."))]
    #[schema(example = "MedTech")]
    pub name: String,
}

#[utoipa::path(
    get,
    path = "/api/brands",
    tag = "Brands",
    responses((status = 200, description = "Lista de marcas", body = Vec<Brand>))
)]
pub async fn list_brands(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let brands = app_state
        .brand_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brands))
}

#[utoipa::path(
    get,
    path = "/api/brands/{id}",
    tag = "Brands",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 200, description = "Marca", body = Brand),
        (status = 404, description = "Marca não encontrada")
    )
)]
pub async fn get_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = app_state
        .brand_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}

#[utoipa::path(
    post,
    path = "/api/brands",
    tag = "Brands",
    request_body = BrandPayload,
    responses(
        (status = 201, description = "Marca criada", body = Brand),
        (status = 409, description = "Já existe marca com esse nome")
    )
)]
pub async fn create_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .create(payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(brand)))
}

#[utoipa::path(
    put,
    path = "/api/brands/{id}",
    tag = "Brands",
    request_body = BrandPayload,
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 200, description = "Marca atualizada", body = Brand),
        (status = 404, description = "Marca não encontrada"),
        (status = 409, description = "Já existe marca com esse nome")
    )
)]
pub async fn update_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<BrandPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let brand = app_state
        .brand_service
        .update(id, payload.name.trim())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}

#[utoipa::path(
    delete,
    path = "/api/brands/{id}",
    tag = "Brands",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 204, description = "Marca excluída"),
        (status = 404, description = "Marca não encontrada"),
        (status = 409, description = "Marca possui produtos")
    )
)]
pub async fn delete_brand(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .brand_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/brands/{id}/toggle-status",
    tag = "Brands",
    params(("id" = Uuid, Path, description = "ID da marca")),
    responses(
        (status = 200, description = "Status alternado", body = Brand),
        (status = 404, description = "Marca não encontrada")
    )
)]
pub async fn toggle_brand_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let brand = app_state
        .brand_service
        .toggle_status(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(brand))
}
