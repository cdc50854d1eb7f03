// src/services/stock_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{store::StockRepository, Store},
    models::stock::{CurrentStock, StockView},
};

#[derive(Clone)]
pub struct StockService {
    store: Arc<dyn Store>,
    low_stock_threshold: i32,
}

impl StockService {
    pub fn new(store: Arc<dyn Store>, low_stock_threshold: i32) -> Self {
        Self {
            store,
            low_stock_threshold,
        }
    }

    pub async fn get_by_product(&self, product_id: Uuid) -> Result<StockView, AppError> {
        let mut tx = self.store.begin().await?;
        tx.get_stock_view(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Stock, product_id))
    }

    pub async fn list_all(&self) -> Result<Vec<StockView>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_stock_views().await
    }

    /// Saldos com quantidade <= `threshold` (padrão: o limite configurado).
    pub async fn list_low_stock(&self, threshold: Option<i32>) -> Result<Vec<StockView>, AppError> {
        let threshold = threshold.unwrap_or(self.low_stock_threshold);
        let mut tx = self.store.begin().await?;
        let low = tx.list_low_stock(threshold).await?;
        if !low.is_empty() {
            warn!("{} produto(s) com estoque baixo (limite {})", low.len(), threshold);
        }
        Ok(low)
    }

    pub async fn add_stock(&self, product_id: Uuid, quantity: i32) -> Result<StockView, AppError> {
        let view = self
            .mutate(product_id, |stock| stock.add_stock(quantity))
            .await?;
        info!("Entrada de {} unidade(s) no produto {}; saldo {}", quantity, product_id, view.quantity);
        Ok(view)
    }

    pub async fn reduce_stock(&self, product_id: Uuid, quantity: i32) -> Result<StockView, AppError> {
        let view = self
            .mutate(product_id, |stock| stock.reduce_stock(quantity))
            .await
            .inspect_err(|e| {
                if let AppError::InsufficientStock { available, requested } = e {
                    warn!(
                        "Estoque insuficiente no produto {}: disponível {}, solicitado {}",
                        product_id, available, requested
                    );
                }
            })?;
        info!("Baixa de {} unidade(s) no produto {}; saldo {}", quantity, product_id, view.quantity);
        Ok(view)
    }

    // Ajuste administrativo, sem registro de movimentação.
    pub async fn set_stock(&self, product_id: Uuid, quantity: i32) -> Result<StockView, AppError> {
        let view = self
            .mutate(product_id, |stock| stock.set_stock(quantity))
            .await?;
        info!("Saldo do produto {} ajustado para {}", product_id, quantity);
        Ok(view)
    }

    // Carrega (travado) -> falha se não existe -> altera -> grava -> commit.
    async fn mutate<F>(&self, product_id: Uuid, change: F) -> Result<StockView, AppError>
    where
        F: FnOnce(&mut CurrentStock) -> Result<(), AppError> + Send,
    {
        let mut tx = self.store.begin().await?;

        let mut stock = tx
            .get_stock_by_product(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Stock, product_id))?;

        change(&mut stock)?;
        tx.update_stock(&stock).await?;
        let view = tx
            .get_stock_view(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Stock, product_id))?;
        tx.commit().await?;

        if stock.is_stock_low(self.low_stock_threshold) {
            warn!("Estoque baixo no produto {}: {}", product_id, stock.quantity);
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    #[tokio::test]
    async fn add_reduce_and_set() {
        let fx = fixture().await;
        let service = StockService::new(fx.store.clone(), 10);
        let product = fx.product_with_stock("PROD001", 10).await;

        assert_eq!(service.add_stock(product.id, 5).await.unwrap().quantity, 15);
        assert_eq!(service.reduce_stock(product.id, 15).await.unwrap().quantity, 0);
        assert_eq!(service.set_stock(product.id, 42).await.unwrap().quantity, 42);
        assert_eq!(service.get_by_product(product.id).await.unwrap().product_code, "PROD001");
    }

    #[tokio::test]
    async fn failed_mutation_leaves_stock_untouched() {
        let fx = fixture().await;
        let service = StockService::new(fx.store.clone(), 10);
        let product = fx.product_with_stock("PROD002", 5).await;

        let err = service.reduce_stock(product.id, 10).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 5, requested: 10 }));
        assert!(service.set_stock(product.id, -1).await.is_err());
        assert!(service.add_stock(product.id, 0).await.is_err());

        assert_eq!(service.get_by_product(product.id).await.unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn unknown_product_has_no_stock() {
        let fx = fixture().await;
        let service = StockService::new(fx.store.clone(), 10);
        let missing = Uuid::new_v4();

        assert!(matches!(
            service.add_stock(missing, 1).await,
            Err(AppError::NotFound { entity: Entity::Stock, .. })
        ));
        assert!(matches!(
            service.get_by_product(missing).await,
            Err(AppError::NotFound { entity: Entity::Stock, .. })
        ));
    }

    #[tokio::test]
    async fn low_stock_uses_configured_default() {
        let fx = fixture().await;
        let service = StockService::new(fx.store.clone(), 10);
        fx.product_with_stock("PROD001", 50).await;
        fx.product_with_stock("PROD002", 10).await;
        fx.product_with_stock("PROD003", 3).await;

        let low = service.list_low_stock(None).await.unwrap();
        let codes: Vec<_> = low.iter().map(|s| s.product_code.as_str()).collect();
        assert_eq!(codes, vec!["PROD003", "PROD002"]);

        assert_eq!(service.list_low_stock(Some(60)).await.unwrap().len(), 3);
        assert_eq!(service.list_all().await.unwrap().len(), 3);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_reductions_never_go_negative() {
        let fx = fixture().await;
        let service = StockService::new(fx.store.clone(), 0);
        let product = fx.product_with_stock("PROD001", 10).await;

        let a = tokio::spawn({
            let service = service.clone();
            async move { service.reduce_stock(product.id, 8).await }
        });
        let b = tokio::spawn({
            let service = service.clone();
            async move { service.reduce_stock(product.id, 8).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let insufficient = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::InsufficientStock { available: 2, requested: 8 })))
            .count();
        assert_eq!((ok, insufficient), (1, 1));
        assert_eq!(service.get_by_product(product.id).await.unwrap().quantity, 2);
    }
}
