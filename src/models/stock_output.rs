// src/models/stock_output.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{common::error::AppError, models::product::Product};

// --- Saída de estoque (consumo) ---
// Só nasce via Product::record_output, que também baixa o saldo.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockOutput {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 20)]
    pub quantity: i32,
    pub output_date: DateTime<Utc>,
    #[schema(example = "Cirurgia sala 3")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl StockOutput {
    pub(crate) fn new(product_id: Uuid, quantity: i32, notes: Option<String>) -> Result<Self, AppError> {
        if quantity <= 0 {
            return Err(AppError::invalid("quantity", "must_be_positive"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            quantity,
            output_date: now,
            notes,
            created_at: now,
            updated_at: None,
        })
    }

    // Correções administrativas. Não mexem no saldo.
    pub fn update_quantity(&mut self, new_quantity: i32) -> Result<(), AppError> {
        if new_quantity <= 0 {
            return Err(AppError::invalid("quantity", "must_be_positive"));
        }
        self.quantity = new_quantity;
        self.updated_at = Some(Utc::now());
        Ok(())
    }

    pub fn update_notes(&mut self, notes: Option<String>) {
        self.notes = notes;
        self.updated_at = Some(Utc::now());
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockOutputView {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 20)]
    pub quantity: i32,
    pub output_date: DateTime<Utc>,
    pub notes: Option<String>,
    #[schema(example = "Seringa 10ml")]
    pub product_name: String,
    #[schema(example = "PROD001")]
    pub product_code: String,
}

impl StockOutputView {
    pub fn new(output: &StockOutput, product: &Product) -> Self {
        Self {
            id: output.id,
            product_id: output.product_id,
            quantity: output.quantity,
            output_date: output.output_date,
            notes: output.notes.clone(),
            product_name: product.name.clone(),
            product_code: product.code.clone(),
        }
    }
}

/// Filtro das listagens de saídas. Tudo opcional; resultado ordenado da mais recente para a mais antiga.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct OutputFilter {
    pub product_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

impl OutputFilter {
    pub fn matches(&self, output: &StockOutput) -> bool {
        self.product_id.is_none_or(|id| output.product_id == id)
            && self.start_date.is_none_or(|start| output.output_date >= start)
            && self.end_date.is_none_or(|end| output.output_date <= end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn new_output_requires_positive_quantity() {
        assert!(StockOutput::new(Uuid::new_v4(), 0, None).is_err());
        let output = StockOutput::new(Uuid::new_v4(), 3, Some("obs".into())).unwrap();
        assert_eq!(output.quantity, 3);
        assert_eq!(output.output_date, output.created_at);
    }

    #[test]
    fn admin_updates_are_independent() {
        let mut output = StockOutput::new(Uuid::new_v4(), 3, Some("antes".into())).unwrap();
        output.update_notes(None);
        assert_eq!(output.quantity, 3);
        assert!(output.notes.is_none());

        assert!(output.update_quantity(-1).is_err());
        output.update_quantity(9).unwrap();
        assert_eq!(output.quantity, 9);
        assert!(output.updated_at.is_some());
    }

    #[test]
    fn filter_bounds_are_inclusive() {
        let output = StockOutput::new(Uuid::new_v4(), 1, None).unwrap();
        let at = output.output_date;

        let exact = OutputFilter {
            product_id: Some(output.product_id),
            start_date: Some(at),
            end_date: Some(at),
        };
        assert!(exact.matches(&output));

        let later = OutputFilter {
            start_date: Some(at + Duration::seconds(1)),
            ..Default::default()
        };
        assert!(!later.matches(&output));

        let other_product = OutputFilter {
            product_id: Some(Uuid::new_v4()),
            ..Default::default()
        };
        assert!(!other_product.matches(&output));
    }
}
