// src/handlers/suppliers.rs

use axum::{
    extract::{Path, State},
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
    models::supplier::Supplier,
};

fn validate_phone(phone: &str) -> Result<(), ValidationError> {
    let allowed = |c: char| c.is_ascii_digit() || matches!(c, ' ' | '(' | ')' | '+' | '-');
    if !phone.chars().all(allowed) {
        let mut err = ValidationError::new("phone");
        err.message = Some("Telefone deve conter apenas números, espaços, parênteses, '+' e '-'.".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierPayload {
    #[validate(length(min = 3, max = 200, message = "O nome deve ter entre 3 e 200 caracteres."))]
    #[schema(example = "MedSupply Brasil")]
    pub name: String,

    // Aceita com ou sem pontuação; o service normaliza para 14 dígitos.
    #[validate(length(min = 14, max = 18, message = "O CNPJ deve ter entre 14 e 18 caracteres."))]
    #[schema(example = "12.345.678/0001-90")]
    pub cnpj: String,

    #[validate(
        length(min = 1, max = 20, message = "O telefone é obrigatório (máximo 20 caracteres)."),
        custom(function = "validate_phone")
    )]
    #[schema(example = "(11) 3456-7890")]
    pub phone: String,

    #[validate(
        email(message = "Email inválido."),
        length(max = 100, message = "O email deve ter no máximo 100 caracteres.")
    )]
    #[schema(example = "contato@medsupply.com.br")]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierPayload {
    #[validate(length(min = 3, max = 200, message = "O nome deve ter entre 3 e 200 caracteres."))]
    pub name: String,

    #[validate(
        length(min = 1, max = 20, message = "O telefone é obrigatório (máximo 20 caracteres)."),
        custom(function = "validate_phone")
    )]
    pub phone: String,

    #[validate(
        email(message = "Email inválido."),
        length(max = 100, message = "O email deve ter no máximo 100 caracteres.")
    )]
    pub email: String,
}

// GET /api/suppliers
#[utoipa::path(
    get,
    path = "/api/suppliers",
    tag = "Suppliers",
    responses(
        (status = 200, description = "Lista de fornecedores", body = Vec<Supplier>)
    )
)]
pub async fn list_suppliers(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let suppliers = app_state
        .supplier_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(suppliers))
}

// GET /api/suppliers/{id}
#[utoipa::path(
    get,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn get_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .supplier_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}

// POST /api/suppliers
#[utoipa::path(
    post,
    path = "/api/suppliers",
    tag = "Suppliers",
    request_body = CreateSupplierPayload,
    responses(
        (status = 201, description = "Fornecedor criado", body = Supplier),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "CNPJ ou email já cadastrado")
    )
)]
pub async fn create_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateSupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .create(&payload.name, &payload.cnpj, &payload.phone, &payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(supplier)))
}

// PUT /api/suppliers/{id}
#[utoipa::path(
    put,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    request_body = UpdateSupplierPayload,
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Fornecedor atualizado", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Email já cadastrado")
    )
)]
pub async fn update_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let supplier = app_state
        .supplier_service
        .update(id, &payload.name, &payload.phone, &payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}

// DELETE /api/suppliers/{id}
#[utoipa::path(
    delete,
    path = "/api/suppliers/{id}",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 204, description = "Fornecedor excluído"),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Fornecedor possui produtos")
    )
)]
pub async fn delete_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .supplier_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

// PATCH /api/suppliers/{id}/toggle-status
#[utoipa::path(
    patch,
    path = "/api/suppliers/{id}/toggle-status",
    tag = "Suppliers",
    params(("id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Status alternado", body = Supplier),
        (status = 404, description = "Fornecedor não encontrado")
    )
)]
pub async fn toggle_supplier_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let supplier = app_state
        .supplier_service
        .toggle_status(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(supplier))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phone_accepts_common_formats() {
        assert!(validate_phone("(11) 3456-7890").is_ok());
        assert!(validate_phone("+55 11 91234-5678").is_ok());
        assert!(validate_phone("ramal 12").is_err());
    }

    #[test]
    fn create_payload_limits() {
        let payload = CreateSupplierPayload {
            name: "Me".into(),
            cnpj: "123".into(),
            phone: "(11) 3456-7890".into(),
            email: "nao-e-email".into(),
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("cnpj"));
        assert!(fields.contains_key("email"));
        assert!(!fields.contains_key("phone"));
    }
}
