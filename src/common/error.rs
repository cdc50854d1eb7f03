use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Entidades que aparecem nas mensagens de erro.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Supplier,
    Brand,
    Product,
    Stock,
    StockOutput,
    SupplierConfiguration,
}

impl Entity {
    /// Chave de tradução do nome da entidade no I18nStore.
    pub fn i18n_key(self) -> &'static str {
        match self {
            Entity::Supplier => "entity.supplier",
            Entity::Brand => "entity.brand",
            Entity::Product => "entity.product",
            Entity::Stock => "entity.stock",
            Entity::StockOutput => "entity.stock_output",
            Entity::SupplierConfiguration => "entity.supplier_configuration",
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Entity::Supplier => "Fornecedor",
            Entity::Brand => "Marca",
            Entity::Product => "Produto",
            Entity::Stock => "Estoque",
            Entity::StockOutput => "Saída de Estoque",
            Entity::SupplierConfiguration => "Configuração",
        };
        f.write_str(name)
    }
}

// Nosso tipo de erro. As variantes de domínio carregam CÓDIGOS (reason),
// a frase final é montada pelo I18nStore.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("{entity} com ID {id} não encontrado")]
    NotFound { entity: Entity, id: Uuid },

    #[error("{entity} com {field} '{value}' já existe")]
    AlreadyExists {
        entity: Entity,
        field: &'static str,
        value: String,
    },

    #[error("Valor inválido para '{field}': {reason}")]
    InvalidArgument {
        field: &'static str,
        reason: &'static str,
    },

    #[error("Estoque insuficiente. Disponível: {available}, Solicitado: {requested}")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Produto {0} não possui estoque associado")]
    MissingStock(Uuid),

    #[error("Operação não permitida: {0}")]
    DomainInvalid(&'static str),

    #[error("{entity} possui {dependents} vinculados")]
    InUse { entity: Entity, dependents: Entity },

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn not_found(entity: Entity, id: Uuid) -> Self {
        AppError::NotFound { entity, id }
    }

    pub fn already_exists(entity: Entity, field: &'static str, value: impl Into<String>) -> Self {
        AppError::AlreadyExists {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn invalid(field: &'static str, reason: &'static str) -> Self {
        AppError::InvalidArgument { field, reason }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            AppError::NotFound { .. } => StatusCode::NOT_FOUND,
            AppError::AlreadyExists { .. } | AppError::InUse { .. } => StatusCode::CONFLICT,
            AppError::InsufficientStock { .. }
            | AppError::MissingStock(_)
            | AppError::DomainInvalid(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Código estável enviado no campo "error" da resposta.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "validation_error",
            AppError::NotFound { .. } => "not_found",
            AppError::AlreadyExists { .. } => "already_exists",
            AppError::InvalidArgument { .. } => "invalid_argument",
            AppError::InsufficientStock { .. } => "insufficient_stock",
            AppError::MissingStock(_) => "missing_stock",
            AppError::DomainInvalid(_) => "domain_invalid",
            AppError::InUse { .. } => "in_use",
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => "internal_error",
        }
    }

    // Traduz o erro para o idioma do cliente.
    pub fn to_api_error(self, locale: &Locale, i18n: &I18nStore) -> ApiError {
        let lang = locale.0.as_str();
        let status = self.status_code();
        let code = self.code();

        let body = match &self {
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                json!({
                    "error": code,
                    "message": i18n.translate(lang, "error.validation"),
                    "details": details,
                })
            }
            AppError::NotFound { entity, id } => json!({
                "error": code,
                "message": i18n.format(lang, "error.not_found", &[
                    ("entity", i18n.translate(lang, entity.i18n_key())),
                    ("id", id.to_string()),
                ]),
            }),
            AppError::AlreadyExists { entity, field, value } => json!({
                "error": code,
                "message": i18n.format(lang, "error.already_exists", &[
                    ("entity", i18n.translate(lang, entity.i18n_key())),
                    ("field", i18n.translate(lang, &format!("field.{field}"))),
                    ("value", value.clone()),
                ]),
            }),
            AppError::InvalidArgument { field, reason } => json!({
                "error": code,
                "message": i18n.format(lang, "error.invalid_argument", &[
                    ("field", field.to_string()),
                    ("reason", i18n.translate(lang, &format!("reason.{reason}"))),
                ]),
                "field": field,
                "reason": reason,
            }),
            AppError::InsufficientStock { available, requested } => json!({
                "error": code,
                "message": i18n.format(lang, "error.insufficient_stock", &[
                    ("available", available.to_string()),
                    ("requested", requested.to_string()),
                ]),
                "available": available,
                "requested": requested,
            }),
            AppError::MissingStock(product_id) => json!({
                "error": code,
                "message": i18n.format(lang, "error.missing_stock", &[("id", product_id.to_string())]),
            }),
            AppError::DomainInvalid(reason) => json!({
                "error": code,
                "message": i18n.format(lang, "error.domain_invalid", &[
                    ("reason", i18n.translate(lang, &format!("reason.{reason}"))),
                ]),
                "reason": reason,
            }),
            AppError::InUse { entity, dependents } => json!({
                "error": code,
                "message": i18n.format(lang, "error.in_use", &[
                    ("entity", i18n.translate(lang, entity.i18n_key())),
                    ("dependents", i18n.translate(lang, dependents.i18n_key())),
                ]),
            }),
            // O detalhe fica só no log.
            AppError::DatabaseError(_) | AppError::InternalServerError(_) => {
                tracing::error!("Erro Interno do Servidor: {:?}", self);
                json!({
                    "error": code,
                    "message": i18n.translate(lang, "error.internal"),
                })
            }
        };

        ApiError { status, body }
    }
}

// Resposta de erro já traduzida, pronta para o axum.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub body: Value,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let locale = Locale(crate::common::i18n::DEFAULT_LOCALE.to_string());
        self.to_api_error(&locale, &I18nStore::new()).into_response()
    }
}
