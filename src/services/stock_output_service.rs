// src/services/stock_output_service.rs

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{
        store::{ProductRepository, StockOutputRepository, StockRepository},
        Store,
    },
    models::stock_output::{OutputFilter, StockOutputView},
};

pub const DEFAULT_RECENT_DAYS: i64 = 30;

#[derive(Clone)]
pub struct StockOutputService {
    store: Arc<dyn Store>,
    low_stock_threshold: i32,
}

impl StockOutputService {
    pub fn new(store: Arc<dyn Store>, low_stock_threshold: i32) -> Self {
        Self {
            store,
            low_stock_threshold,
        }
    }

    // --- REGISTRA SAÍDA (CONSUMO) ---
    // Saída e baixa no saldo são gravadas juntas ou nenhuma das duas.
    pub async fn create_output(
        &self,
        product_id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<StockOutputView, AppError> {
        let mut tx = self.store.begin().await?;

        let product = tx
            .get_product(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Product, product_id))?;

        let mut stock = tx
            .get_stock_by_product(product_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Stock, product_id))?;

        let output = product
            .record_output(Some(&mut stock), quantity, notes)
            .inspect_err(|e| {
                if let AppError::InsufficientStock { available, requested } = e {
                    warn!(
                        "Saída negada para {}: disponível {}, solicitado {}",
                        product.code, available, requested
                    );
                }
            })?;

        tx.insert_output(&output).await?;
        tx.update_stock(&stock).await?;
        tx.commit().await?;

        info!(
            "Saída {} registrada: {} unidade(s) de {}; saldo {}",
            output.id, output.quantity, product.code, stock.quantity
        );
        if stock.is_stock_low(self.low_stock_threshold) {
            warn!("Estoque baixo para {}: {}", product.code, stock.quantity);
        }

        Ok(StockOutputView::new(&output, &product))
    }

    // --- EXCLUI SAÍDA (ESTORNO) ---
    pub async fn delete_output(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        let output = tx
            .get_output(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::StockOutput, id))?;

        let mut stock = match tx.get_stock_by_product(output.product_id).await? {
            Some(stock) => stock,
            None => {
                error!(
                    "Integridade: saída {} aponta para o produto {} sem saldo",
                    id, output.product_id
                );
                return Err(AppError::not_found(Entity::Stock, output.product_id));
            }
        };

        stock.reverse_output(&output)?;
        tx.update_stock(&stock).await?;
        tx.delete_output(id).await?;
        tx.commit().await?;

        info!(
            "Saída {} excluída; {} unidade(s) devolvida(s) ao produto {}",
            id, output.quantity, output.product_id
        );
        Ok(())
    }

    pub async fn get_output(&self, id: Uuid) -> Result<StockOutputView, AppError> {
        let mut tx = self.store.begin().await?;
        tx.get_output_view(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::StockOutput, id))
    }

    pub async fn list_outputs(&self) -> Result<Vec<StockOutputView>, AppError> {
        self.list(&OutputFilter::default()).await
    }

    pub async fn list_by_product(&self, product_id: Uuid) -> Result<Vec<StockOutputView>, AppError> {
        let mut tx = self.store.begin().await?;
        if tx.get_product(product_id).await?.is_none() {
            return Err(AppError::not_found(Entity::Product, product_id));
        }
        let filter = OutputFilter {
            product_id: Some(product_id),
            ..Default::default()
        };
        tx.list_output_views(&filter).await
    }

    pub async fn list_by_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<StockOutputView>, AppError> {
        let filter = OutputFilter {
            start_date: Some(start),
            end_date: Some(end),
            ..Default::default()
        };
        self.list(&filter).await
    }

    pub async fn list_recent(&self, days: i64) -> Result<Vec<StockOutputView>, AppError> {
        if days <= 0 {
            return Err(AppError::invalid("days", "must_be_positive"));
        }
        let start = Duration::try_days(days)
            .and_then(|window| Utc::now().checked_sub_signed(window))
            .ok_or_else(|| AppError::invalid("days", "overflow"))?;
        let filter = OutputFilter {
            start_date: Some(start),
            ..Default::default()
        };
        self.list(&filter).await
    }

    pub async fn list(&self, filter: &OutputFilter) -> Result<Vec<StockOutputView>, AppError> {
        if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
            if start > end {
                return Err(AppError::invalid("startDate", "invalid_date_range"));
            }
        }
        let mut tx = self.store.begin().await?;
        tx.list_output_views(filter).await
    }

    // Correção administrativa: quantidade e observação mudam, o saldo não.
    pub async fn update_output(
        &self,
        id: Uuid,
        quantity: i32,
        notes: Option<String>,
    ) -> Result<StockOutputView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut output = tx
            .get_output(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::StockOutput, id))?;

        output.update_quantity(quantity)?;
        output.update_notes(notes);
        tx.update_output(&output).await?;

        let view = tx
            .get_output_view(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::StockOutput, id))?;
        tx.commit().await?;

        info!("Saída {} corrigida (sem efeito no saldo)", id);
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{product_service::ProductService, stock_service::StockService, test_support::fixture};

    #[tokio::test]
    async fn output_and_reversal_round_trip() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);
        let stock = StockService::new(fx.store.clone(), 10);
        let product = fx.product_with_stock("PROD001", 50).await;

        let view = outputs
            .create_output(product.id, 20, Some("Cirurgia sala 3".into()))
            .await
            .unwrap();
        assert_eq!(view.product_code, "PROD001");
        assert_eq!(view.quantity, 20);
        assert_eq!(stock.get_by_product(product.id).await.unwrap().quantity, 30);

        outputs.delete_output(view.id).await.unwrap();
        assert_eq!(stock.get_by_product(product.id).await.unwrap().quantity, 50);
        assert!(matches!(
            outputs.get_output(view.id).await,
            Err(AppError::NotFound { entity: Entity::StockOutput, .. })
        ));
    }

    #[tokio::test]
    async fn insufficient_stock_writes_nothing() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);
        let stock = StockService::new(fx.store.clone(), 10);
        let product = fx.product_with_stock("PROD002", 5).await;

        let err = outputs.create_output(product.id, 10, None).await.unwrap_err();
        assert!(matches!(err, AppError::InsufficientStock { available: 5, requested: 10 }));

        assert_eq!(stock.get_by_product(product.id).await.unwrap().quantity, 5);
        assert!(outputs.list_outputs().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn unknown_product_and_inactive_product() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);
        let products = ProductService::new(fx.store.clone());

        assert!(matches!(
            outputs.create_output(Uuid::new_v4(), 1, None).await,
            Err(AppError::NotFound { entity: Entity::Product, .. })
        ));

        let product = fx.product_with_stock("PROD001", 5).await;
        products.toggle_status(product.id).await.unwrap();
        assert!(matches!(
            outputs.create_output(product.id, 1, None).await,
            Err(AppError::DomainInvalid("product_inactive"))
        ));
        assert!(matches!(
            outputs.create_output(Uuid::new_v4(), 0, None).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn listings_are_newest_first_and_filtered() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 0);
        let a = fx.product_with_stock("PROD001", 100).await;
        let b = fx.product_with_stock("PROD002", 100).await;

        let first = outputs.create_output(a.id, 1, None).await.unwrap();
        let second = outputs.create_output(b.id, 2, None).await.unwrap();
        let third = outputs.create_output(a.id, 3, None).await.unwrap();

        let all = outputs.list_outputs().await.unwrap();
        assert_eq!(all.len(), 3);
        assert!(all.windows(2).all(|w| w[0].output_date >= w[1].output_date));

        let only_a = outputs.list_by_product(a.id).await.unwrap();
        let ids: Vec<_> = only_a.iter().map(|o| o.id).collect();
        assert!(ids.contains(&first.id) && ids.contains(&third.id));
        assert!(!ids.contains(&second.id));

        assert_eq!(outputs.list_recent(DEFAULT_RECENT_DAYS).await.unwrap().len(), 3);
        assert!(outputs.list_recent(0).await.is_err());

        let now = Utc::now();
        let range = outputs
            .list_by_date_range(now - Duration::hours(1), now + Duration::hours(1))
            .await
            .unwrap();
        assert_eq!(range.len(), 3);
        assert!(matches!(
            outputs.list_by_date_range(now, now - Duration::days(1)).await,
            Err(AppError::InvalidArgument { reason: "invalid_date_range", .. })
        ));
    }

    #[tokio::test]
    async fn huge_recent_window_is_rejected() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);

        assert!(matches!(
            outputs.list_recent(1_000_000_000).await,
            Err(AppError::InvalidArgument { field: "days", reason: "overflow" })
        ));
        assert!(matches!(
            outputs.list_recent(i64::MAX).await,
            Err(AppError::InvalidArgument { field: "days", reason: "overflow" })
        ));
    }

    #[tokio::test]
    async fn filtered_listing_rejects_inverted_range() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);
        let now = Utc::now();

        let filter = OutputFilter {
            start_date: Some(now),
            end_date: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(matches!(
            outputs.list(&filter).await,
            Err(AppError::InvalidArgument { reason: "invalid_date_range", .. })
        ));

        let open_ended = OutputFilter {
            start_date: Some(now - Duration::days(1)),
            ..Default::default()
        };
        assert!(outputs.list(&open_ended).await.unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn concurrent_outputs_never_oversell() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 0);
        let stock = StockService::new(fx.store.clone(), 0);
        let product = fx.product_with_stock("PROD001", 10).await;

        let a = tokio::spawn({
            let outputs = outputs.clone();
            async move { outputs.create_output(product.id, 8, None).await }
        });
        let b = tokio::spawn({
            let outputs = outputs.clone();
            async move { outputs.create_output(product.id, 8, None).await }
        });
        let results = [a.await.unwrap(), b.await.unwrap()];

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let insufficient = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::InsufficientStock { available: 2, requested: 8 })))
            .count();
        assert_eq!((ok, insufficient), (1, 1));
        assert_eq!(outputs.list_by_product(product.id).await.unwrap().len(), 1);
        assert_eq!(stock.get_by_product(product.id).await.unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn admin_update_does_not_touch_stock() {
        let fx = fixture().await;
        let outputs = StockOutputService::new(fx.store.clone(), 10);
        let stock = StockService::new(fx.store.clone(), 10);
        let product = fx.product_with_stock("PROD001", 50).await;

        let view = outputs.create_output(product.id, 20, None).await.unwrap();
        let updated = outputs
            .update_output(view.id, 25, Some("corrigido".into()))
            .await
            .unwrap();

        assert_eq!(updated.quantity, 25);
        assert_eq!(updated.notes.as_deref(), Some("corrigido"));
        assert_eq!(stock.get_by_product(product.id).await.unwrap().quantity, 30);
    }
}
