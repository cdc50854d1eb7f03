// src/handlers/supplier_configurations.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::supplier_configuration::{ReorderPlan, SupplierConfigurationView},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSupplierConfigurationPayload {
    pub supplier_id: Uuid,

    #[validate(range(min = 1, max = 24, message = "O planejamento deve ser de 1 a 24 meses."))]
    #[schema(example = 6)]
    pub planning_months: i32,

    #[validate(range(min = 1, max = 12, message = "O estoque mínimo deve ser de 1 a 12 meses."))]
    #[schema(example = 2)]
    pub minimum_months: i32,

    #[validate(range(min = 1, max = 365, message = "O prazo de entrega deve ser de 1 a 365 dias."))]
    #[schema(example = 15)]
    pub delivery_lead_time_days: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSupplierConfigurationPayload {
    #[validate(range(min = 1, max = 24, message = "O planejamento deve ser de 1 a 24 meses."))]
    pub planning_months: i32,

    #[validate(range(min = 1, max = 12, message = "O estoque mínimo deve ser de 1 a 12 meses."))]
    pub minimum_months: i32,

    #[validate(range(min = 1, max = 365, message = "O prazo de entrega deve ser de 1 a 365 dias."))]
    pub delivery_lead_time_days: i32,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReorderPlanQuery {
    /// Consumo médio mensal do produto.
    pub average_monthly_consumption: i32,
}

// Regra entre campos: o mínimo não pode passar do horizonte de planejamento.
fn validate_consistency(planning_months: i32, minimum_months: i32) -> Result<(), ValidationErrors> {
    if minimum_months > planning_months {
        let mut err = ValidationError::new("minimum_exceeds_planning");
        err.message = Some("O estoque mínimo não pode ser maior que o período de planejamento.".into());
        let mut errors = ValidationErrors::new();
        errors.add("minimumMonths", err);
        return Err(errors);
    }
    Ok(())
}

#[utoipa::path(
    get,
    path = "/api/supplier-configurations",
    tag = "Supplier Configurations",
    responses((status = 200, description = "Configurações", body = Vec<SupplierConfigurationView>))
)]
pub async fn list_configurations(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let configs = app_state
        .supplier_configuration_service
        .list()
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(configs))
}

#[utoipa::path(
    get,
    path = "/api/supplier-configurations/{id}",
    tag = "Supplier Configurations",
    params(("id" = Uuid, Path, description = "ID da configuração")),
    responses(
        (status = 200, description = "Configuração", body = SupplierConfigurationView),
        (status = 404, description = "Configuração não encontrada")
    )
)]
pub async fn get_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = app_state
        .supplier_configuration_service
        .get(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(config))
}

#[utoipa::path(
    get,
    path = "/api/supplier-configurations/supplier/{supplier_id}",
    tag = "Supplier Configurations",
    params(("supplier_id" = Uuid, Path, description = "ID do fornecedor")),
    responses(
        (status = 200, description = "Configuração do fornecedor", body = SupplierConfigurationView),
        (status = 404, description = "Fornecedor sem configuração")
    )
)]
pub async fn get_configuration_by_supplier(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(supplier_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = app_state
        .supplier_configuration_service
        .get_by_supplier(supplier_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(config))
}

#[utoipa::path(
    post,
    path = "/api/supplier-configurations",
    tag = "Supplier Configurations",
    request_body = CreateSupplierConfigurationPayload,
    responses(
        (status = 201, description = "Configuração criada", body = SupplierConfigurationView),
        (status = 404, description = "Fornecedor não encontrado"),
        (status = 409, description = "Fornecedor já possui configuração")
    )
)]
pub async fn create_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateSupplierConfigurationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    validate_consistency(payload.planning_months, payload.minimum_months)
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let config = app_state
        .supplier_configuration_service
        .create(
            payload.supplier_id,
            payload.planning_months,
            payload.minimum_months,
            payload.delivery_lead_time_days,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(config)))
}

#[utoipa::path(
    put,
    path = "/api/supplier-configurations/{id}",
    tag = "Supplier Configurations",
    request_body = UpdateSupplierConfigurationPayload,
    params(("id" = Uuid, Path, description = "ID da configuração")),
    responses(
        (status = 200, description = "Configuração atualizada", body = SupplierConfigurationView),
        (status = 404, description = "Configuração não encontrada")
    )
)]
pub async fn update_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateSupplierConfigurationPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    validate_consistency(payload.planning_months, payload.minimum_months)
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let config = app_state
        .supplier_configuration_service
        .update(
            id,
            payload.planning_months,
            payload.minimum_months,
            payload.delivery_lead_time_days,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(config))
}

#[utoipa::path(
    delete,
    path = "/api/supplier-configurations/{id}",
    tag = "Supplier Configurations",
    params(("id" = Uuid, Path, description = "ID da configuração")),
    responses(
        (status = 204, description = "Configuração excluída"),
        (status = 404, description = "Configuração não encontrada")
    )
)]
pub async fn delete_configuration(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state
        .supplier_configuration_service
        .delete(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    patch,
    path = "/api/supplier-configurations/{id}/toggle-status",
    tag = "Supplier Configurations",
    params(("id" = Uuid, Path, description = "ID da configuração")),
    responses(
        (status = 200, description = "Status alternado", body = SupplierConfigurationView),
        (status = 404, description = "Configuração não encontrada")
    )
)]
pub async fn toggle_configuration_status(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let config = app_state
        .supplier_configuration_service
        .toggle_status(id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(config))
}

#[utoipa::path(
    get,
    path = "/api/supplier-configurations/{id}/reorder-plan",
    tag = "Supplier Configurations",
    params(
        ("id" = Uuid, Path, description = "ID da configuração"),
        ReorderPlanQuery
    ),
    responses(
        (status = 200, description = "Quantidade sugerida e data prevista de entrega", body = ReorderPlan),
        (status = 404, description = "Configuração não encontrada")
    )
)]
pub async fn get_reorder_plan(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Query(query): Query<ReorderPlanQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let plan = app_state
        .supplier_configuration_service
        .reorder_plan(id, query.average_monthly_consumption)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(Json(plan))
}
