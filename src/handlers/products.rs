// src/handlers/products.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::product::{ProductFilter, ProductView},
};

fn validate_code(code: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-';
    if !code.chars().all(allowed) {
        let mut err = ValidationError::new("code");
        err.message = Some("O código deve conter apenas letras, números, '_' e '-'.".into());
        return Err(err);
    }
    Ok(())
}

// Código sempre salvo sem espaços nas pontas e em maiúsculas.
fn normalize_code(code: &str) -> String {
    code.trim().to_uppercase()
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductPayload {
    #[validate(
        length(min = 2, max = 50, message = "O código deve ter entre 2 e 50 caracteres."),
        custom(function = "validate_code")
    )]
    #[schema(example = "PROD001")]
    pub code: String,

    #[validate(length(min = 3, max = 200, message = "O nome deve ter entre 3 e 200 caracteres."))]
    #[schema(example = "Seringa 10ml")]
    pub name: String,

    pub supplier_id: Uuid,

    pub brand_id: Uuid,

    // Se não vier, o saldo começa em zero.
    #[validate(range(min = 0, message = "O estoque inicial não pode ser negativo."))]
    #[schema(example = 50)]
    pub initial_stock: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductPayload {
    #[validate(
        length(min = 2, max = 50, message = "O código deve ter entre 2 e 50 caracteres."),
        custom(function = "validate_code")
    )]
    pub code: String,

    #[validate(length(min = 3, max = 200, message = "O nome deve ter entre 3 e 200 caracteres."))]
    pub name: String,

    pub supplier_id: Uuid,

    pub brand_id: Uuid,
}

// GET /api/products?active=&supplierId=&brandId=&search=
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "Products",
    params(ProductFilter),
    responses((status = 200, description = "Produtos com fornecedor, marca e saldo", body = Vec<ProductView>))
)]
pub async fn list_products(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list(&filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

// GET /api/products/active
#[utoipa::path(
    get,
    path = "/api/products/active",
    tag = "Products",
    responses((status = 200, description = "Produtos ativos", body = Vec<ProductView>))
)]
pub async fn list_active_products(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let products = app_state
        .product_service
        .list_active()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(products))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto", body = ProductView),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn get_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    post,
    path = "/api/products",
    tag = "Products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Produto criado junto com o saldo", body = ProductView),
        (status = 404, description = "Fornecedor ou marca não encontrado"),
        (status = 409, description = "Código já cadastrado")
    )
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(mut payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.code = normalize_code(&payload.code);
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .create(
            &payload.code,
            payload.name.trim(),
            payload.supplier_id,
            payload.brand_id,
            payload.initial_stock,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    put,
    path = "/api/products/{id}",
    tag = "Products",
    request_body = UpdateProductPayload,
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Produto atualizado", body = ProductView),
        (status = 404, description = "Produto, fornecedor ou marca não encontrado"),
        (status = 409, description = "Código já cadastrado")
    )
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.code = normalize_code(&payload.code);
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let product = app_state
        .product_service
        .update(id, &payload.code, payload.name.trim(), payload.supplier_id, payload.brand_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 204, description = "Produto excluído com saldo e saídas"),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .product_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}/toggle-status",
    tag = "Products",
    params(("id" = Uuid, Path, description = "ID do produto")),
    responses(
        (status = 200, description = "Status alternado", body = ProductView),
        (status = 404, description = "Produto não encontrado")
    )
)]
pub async fn toggle_product_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = app_state
        .product_service
        .toggle_status(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(product))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_is_trimmed_and_uppercased() {
        assert_eq!(normalize_code("  prod-001 "), "PROD-001");
        assert!(validate_code("PROD_001").is_ok());
        assert!(validate_code("PROD 001").is_err());
        assert!(validate_code("PRÓD").is_err());
    }
}
