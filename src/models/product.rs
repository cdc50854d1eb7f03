// src/models/product.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{stock::CurrentStock, stock_output::StockOutput},
};

// --- Produto (raiz do agregado Produto/Saldo/Saídas) ---
// Referências por ID; quem busca as entidades relacionadas é o service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    #[schema(example = "PROD001")]
    pub code: String,
    #[schema(example = "Seringa 10ml")]
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub supplier_id: Uuid,
    pub brand_id: Uuid,
}

fn require_text(field: &'static str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::invalid(field, "required"));
    }
    Ok(())
}

fn require_id(field: &'static str, id: Uuid) -> Result<(), AppError> {
    if id.is_nil() {
        return Err(AppError::invalid(field, "required"));
    }
    Ok(())
}

impl Product {
    pub fn new(code: &str, name: &str, supplier_id: Uuid, brand_id: Uuid) -> Result<Self, AppError> {
        require_text("code", code)?;
        require_text("name", name)?;
        require_id("supplierId", supplier_id)?;
        require_id("brandId", brand_id)?;

        Ok(Self {
            id: Uuid::new_v4(),
            code: code.to_string(),
            name: name.to_string(),
            active: true,
            created_at: Utc::now(),
            updated_at: None,
            supplier_id,
            brand_id,
        })
    }

    pub fn update_info(&mut self, code: &str, name: &str) -> Result<(), AppError> {
        require_text("code", code)?;
        require_text("name", name)?;
        self.code = code.to_string();
        self.name = name.to_string();
        self.touch();
        Ok(())
    }

    pub fn change_supplier(&mut self, supplier_id: Uuid) -> Result<(), AppError> {
        require_id("supplierId", supplier_id)?;
        self.supplier_id = supplier_id;
        self.touch();
        Ok(())
    }

    pub fn change_brand(&mut self, brand_id: Uuid) -> Result<(), AppError> {
        require_id("brandId", brand_id)?;
        self.brand_id = brand_id;
        self.touch();
        Ok(())
    }

    // Idempotentes: sempre carimbam updated_at.
    pub fn activate(&mut self) {
        self.active = true;
        self.touch();
    }

    pub fn deactivate(&mut self) {
        self.active = false;
        self.touch();
    }

    /// Registra uma saída de estoque deste produto.
    ///
    /// Único caminho para criar um [`StockOutput`]: a baixa no saldo acontece aqui,
    /// junto com a criação, então "toda baixa tem uma saída" vale por construção.
    /// Em qualquer erro o saldo fica intacto.
    pub fn record_output(
        &self,
        stock: Option<&mut CurrentStock>,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<StockOutput, AppError> {
        if !self.active {
            return Err(AppError::DomainInvalid("product_inactive"));
        }
        let stock = stock.ok_or(AppError::MissingStock(self.id))?;
        if stock.product_id != self.id {
            return Err(AppError::DomainInvalid("stock_product_mismatch"));
        }

        let output = StockOutput::new(self.id, quantity, notes)?;
        if stock.quantity < output.quantity {
            return Err(AppError::InsufficientStock {
                available: stock.quantity,
                requested: output.quantity,
            });
        }
        stock.reduce_stock(output.quantity)?;
        Ok(output)
    }

    fn touch(&mut self) {
        self.updated_at = Some(Utc::now());
    }
}

// --- Produto + nomes do fornecedor/marca + saldo (listagens) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: Uuid,
    #[schema(example = "PROD001")]
    pub code: String,
    #[schema(example = "Seringa 10ml")]
    pub name: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub supplier_id: Uuid,
    pub brand_id: Uuid,
    #[schema(example = "MedSupply Brasil")]
    pub supplier_name: String,
    #[schema(example = "MedTech")]
    pub brand_name: String,
    #[schema(example = 50)]
    pub stock_quantity: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub active: Option<bool>,
    pub supplier_id: Option<Uuid>,
    pub brand_id: Option<Uuid>,
    /// Trecho do código ou do nome (sem diferenciar maiúsculas).
    pub search: Option<String>,
}

impl ProductFilter {
    pub fn matches(&self, product: &Product) -> bool {
        let search_ok = self.search.as_deref().is_none_or(|term| {
            let term = term.to_lowercase();
            product.code.to_lowercase().contains(&term) || product.name.to_lowercase().contains(&term)
        });
        search_ok
            && self.active.is_none_or(|active| product.active == active)
            && self.supplier_id.is_none_or(|id| product.supplier_id == id)
            && self.brand_id.is_none_or(|id| product.brand_id == id)
    }
}
