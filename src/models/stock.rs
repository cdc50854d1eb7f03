// src/models/stock.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{product::Product, stock_output::StockOutput},
};

// --- Saldo atual (tabela 'current_stocks') ---
// Um por produto. A quantidade nunca fica negativa.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentStock {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 50)]
    pub quantity: i32,
    pub last_updated_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl CurrentStock {
    pub fn new(product_id: Uuid, initial_quantity: i32) -> Result<Self, AppError> {
        if initial_quantity < 0 {
            return Err(AppError::invalid("quantity", "must_not_be_negative"));
        }
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            product_id,
            quantity: initial_quantity,
            last_updated_at: now,
            created_at: now,
            updated_at: None,
        })
    }

    /// Entrada de estoque.
    pub fn add_stock(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::invalid("quantity", "must_be_positive"));
        }
        self.quantity = self
            .quantity
            .checked_add(quantity)
            .ok_or_else(|| AppError::invalid("quantity", "overflow"))?;
        self.touch();
        Ok(())
    }

    /// Baixa de estoque. Em caso de erro o saldo não muda.
    pub fn reduce_stock(&mut self, quantity: i32) -> Result<(), AppError> {
        if quantity <= 0 {
            return Err(AppError::invalid("quantity", "must_be_positive"));
        }
        if quantity > self.quantity {
            return Err(AppError::InsufficientStock {
                available: self.quantity,
                requested: quantity,
            });
        }
        self.quantity -= quantity;
        self.touch();
        Ok(())
    }

    /// Ajuste administrativo: sobrescreve o saldo sem registrar movimentação.
    pub fn set_stock(&mut self, new_quantity: i32) -> Result<(), AppError> {
        if new_quantity < 0 {
            return Err(AppError::invalid("quantity", "must_not_be_negative"));
        }
        self.quantity = new_quantity;
        self.touch();
        Ok(())
    }

    pub fn is_stock_low(&self, threshold: i32) -> bool {
        self.quantity <= threshold
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.quantity <= 0
    }

    // Estorno de uma saída: devolve ao saldo exatamente o que ela retirou.
    pub fn reverse_output(&mut self, output: &StockOutput) -> Result<(), AppError> {
        if output.product_id != self.product_id {
            return Err(AppError::DomainInvalid("output_product_mismatch"));
        }
        self.add_stock(output.quantity)
    }

    fn touch(&mut self) {
        let now = Utc::now();
        self.last_updated_at = now;
        self.updated_at = Some(now);
    }
}

// --- Saldo + dados do produto (o que a API devolve) ---
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockView {
    pub id: Uuid,
    pub product_id: Uuid,
    #[schema(example = 50)]
    pub quantity: i32,
    pub last_updated_at: DateTime<Utc>,
    #[schema(example = "Seringa 10ml")]
    pub product_name: String,
    #[schema(example = "PROD001")]
    pub product_code: String,
}

impl StockView {
    pub fn new(stock: &CurrentStock, product: &Product) -> Self {
        Self {
            id: stock.id,
            product_id: stock.product_id,
            quantity: stock.quantity,
            last_updated_at: stock.last_updated_at,
            product_name: product.name.clone(),
            product_code: product.code.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn stock_with(quantity: i32) -> CurrentStock {
        CurrentStock::new(Uuid::new_v4(), quantity).unwrap()
    }

    #[test]
    fn new_stock_rejects_negative_initial_quantity() {
        let err = CurrentStock::new(Uuid::new_v4(), -1).unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { field: "quantity", .. }));
    }

    #[test]
    fn add_stock_rejects_zero_and_negative() {
        let mut stock = stock_with(10);
        assert!(matches!(stock.add_stock(0), Err(AppError::InvalidArgument { .. })));
        assert!(matches!(stock.add_stock(-3), Err(AppError::InvalidArgument { .. })));
        assert_eq!(stock.quantity, 10);
        assert!(stock.updated_at.is_none());
    }

    #[test]
    fn add_stock_overflow_is_rejected() {
        let mut stock = stock_with(i32::MAX);
        assert!(matches!(
            stock.add_stock(1),
            Err(AppError::InvalidArgument { reason: "overflow", .. })
        ));
        assert_eq!(stock.quantity, i32::MAX);
    }

    #[test]
    fn reduce_stock_to_zero_is_allowed() {
        let mut stock = stock_with(7);
        stock.reduce_stock(7).unwrap();
        assert_eq!(stock.quantity, 0);
        assert!(stock.is_out_of_stock());
    }

    #[test]
    fn reduce_stock_reports_available_and_requested() {
        let mut stock = stock_with(5);
        let err = stock.reduce_stock(10).unwrap_err();
        match err {
            AppError::InsufficientStock { available, requested } => {
                assert_eq!(available, 5);
                assert_eq!(requested, 10);
            }
            other => panic!("Esperava InsufficientStock, veio {other:?}"),
        }
        assert_eq!(stock.quantity, 5);
    }

    #[test]
    fn set_stock_negative_leaves_state_unchanged() {
        let mut stock = stock_with(12);
        assert!(stock.set_stock(-1).is_err());
        assert_eq!(stock.quantity, 12);
        stock.set_stock(0).unwrap();
        assert_eq!(stock.quantity, 0);
    }

    #[test]
    fn low_stock_threshold_is_inclusive() {
        let stock = stock_with(10);
        assert!(stock.is_stock_low(10));
        assert!(!stock.is_stock_low(9));
        assert!(!stock.is_out_of_stock());
    }

    #[test]
    fn reverse_output_of_another_product_is_rejected() {
        let mut stock = stock_with(3);
        let output = StockOutput::new(Uuid::new_v4(), 2, None).unwrap();
        assert!(matches!(
            stock.reverse_output(&output),
            Err(AppError::DomainInvalid("output_product_mismatch"))
        ));
        assert_eq!(stock.quantity, 3);
    }

    proptest! {
        #[test]
        fn add_increases_by_exactly_q(start in 0..1_000_000i32, q in 1..1_000_000i32) {
            let mut stock = stock_with(start);
            let before = stock.last_updated_at;
            stock.add_stock(q).unwrap();
            prop_assert_eq!(stock.quantity, start + q);
            prop_assert!(stock.last_updated_at >= before);
            prop_assert!(stock.updated_at.is_some());
        }

        #[test]
        fn reduce_within_balance_decreases_by_exactly_q(start in 1..1_000_000i32, pick in 0.0..1.0f64) {
            let q = ((start as f64 * pick) as i32).max(1);
            let mut stock = stock_with(start);
            stock.reduce_stock(q).unwrap();
            prop_assert_eq!(stock.quantity, start - q);
        }

        #[test]
        fn reduce_beyond_balance_never_mutates(start in 0..1_000i32, extra in 1..1_000i32) {
            let mut stock = stock_with(start);
            let snapshot = stock.clone();
            let result = stock.reduce_stock(start + extra);
            prop_assert!(
                matches!(result, Err(AppError::InsufficientStock { .. })),
                "esperava InsufficientStock"
            );
            prop_assert_eq!(stock, snapshot);
        }

        #[test]
        fn set_is_absolute(start in 0..1_000_000i32, q in 0..1_000_000i32) {
            let mut stock = stock_with(start);
            stock.set_stock(q).unwrap();
            prop_assert_eq!(stock.quantity, q);
        }
    }
}
