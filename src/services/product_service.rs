// src/services/product_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{
        store::{BrandRepository, ProductRepository, StockRepository, SupplierRepository},
        Store, StoreTx,
    },
    models::{
        product::{Product, ProductFilter, ProductView},
        stock::CurrentStock,
    },
};

#[derive(Clone)]
pub struct ProductService {
    store: Arc<dyn Store>,
}

async fn require_references(tx: &mut dyn StoreTx, supplier_id: Uuid, brand_id: Uuid) -> Result<(), AppError> {
    if tx.get_supplier(supplier_id).await?.is_none() {
        return Err(AppError::not_found(Entity::Supplier, supplier_id));
    }
    if tx.get_brand(brand_id).await?.is_none() {
        return Err(AppError::not_found(Entity::Brand, brand_id));
    }
    Ok(())
}

async fn load_view(tx: &mut dyn StoreTx, id: Uuid) -> Result<ProductView, AppError> {
    tx.get_product_view(id)
        .await?
        .ok_or_else(|| AppError::not_found(Entity::Product, id))
}

impl ProductService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // --- CREATE PRODUCT ---
    // Produto e saldo nascem juntos, na mesma transação.
    pub async fn create(
        &self,
        code: &str,
        name: &str,
        supplier_id: Uuid,
        brand_id: Uuid,
        initial_stock: Option<i32>,
    ) -> Result<ProductView, AppError> {
        let product = Product::new(code, name, supplier_id, brand_id)?;
        let stock = CurrentStock::new(product.id, initial_stock.unwrap_or(0))?;

        let mut tx = self.store.begin().await?;

        require_references(tx.as_mut(), supplier_id, brand_id).await?;
        if tx.product_code_exists(&product.code, None).await? {
            warn!("Produto com código {} já existe", product.code);
            return Err(AppError::already_exists(Entity::Product, "code", &product.code));
        }

        tx.insert_product(&product).await?;
        tx.insert_stock(&stock).await?;
        let view = load_view(tx.as_mut(), product.id).await?;
        tx.commit().await?;

        info!("Produto criado: {} ({}) com saldo inicial {}", product.code, product.id, stock.quantity);
        Ok(view)
    }

    pub async fn get(&self, id: Uuid) -> Result<ProductView, AppError> {
        let mut tx = self.store.begin().await?;
        load_view(tx.as_mut(), id).await
    }

    pub async fn list(&self, filter: &ProductFilter) -> Result<Vec<ProductView>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_product_views(filter).await
    }

    pub async fn list_active(&self) -> Result<Vec<ProductView>, AppError> {
        let filter = ProductFilter {
            active: Some(true),
            ..Default::default()
        };
        self.list(&filter).await
    }

    // --- UPDATE PRODUCT ---
    pub async fn update(
        &self,
        id: Uuid,
        code: &str,
        name: &str,
        supplier_id: Uuid,
        brand_id: Uuid,
    ) -> Result<ProductView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut product = tx
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Product, id))?;

        if tx.product_code_exists(code, Some(id)).await? {
            warn!("Código {} já usado por outro produto", code);
            return Err(AppError::already_exists(Entity::Product, "code", code));
        }
        require_references(tx.as_mut(), supplier_id, brand_id).await?;

        product.update_info(code, name)?;
        if product.supplier_id != supplier_id {
            product.change_supplier(supplier_id)?;
        }
        if product.brand_id != brand_id {
            product.change_brand(brand_id)?;
        }

        tx.update_product(&product).await?;
        let view = load_view(tx.as_mut(), id).await?;
        tx.commit().await?;

        info!("Produto atualizado: {}", id);
        Ok(view)
    }

    // Saldo e saídas vão junto (cascade).
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        if !tx.delete_product(id).await? {
            return Err(AppError::not_found(Entity::Product, id));
        }
        tx.commit().await?;

        info!("Produto excluído: {}", id);
        Ok(())
    }

    pub async fn toggle_status(&self, id: Uuid) -> Result<ProductView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut product = tx
            .get_product(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Product, id))?;

        if product.active {
            product.deactivate();
        } else {
            product.activate();
        }
        tx.update_product(&product).await?;
        let view = load_view(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    #[tokio::test]
    async fn create_builds_stock_in_same_transaction() {
        let fx = fixture().await;
        let service = ProductService::new(fx.store.clone());

        let view = service
            .create("PROD001", "Seringa 10ml", fx.supplier.id, fx.brand.id, Some(50))
            .await
            .unwrap();

        assert_eq!(view.stock_quantity, Some(50));
        assert_eq!(view.supplier_name, "MedSupply Brasil");
        assert_eq!(view.brand_name, "MedTech");

        let without_initial = service
            .create("PROD002", "Cateter", fx.supplier.id, fx.brand.id, None)
            .await
            .unwrap();
        assert_eq!(without_initial.stock_quantity, Some(0));
    }

    #[tokio::test]
    async fn create_checks_references_and_code() {
        let fx = fixture().await;
        let service = ProductService::new(fx.store.clone());

        let err = service
            .create("PROD001", "Seringa", Uuid::new_v4(), fx.brand.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: Entity::Supplier, .. }));

        let err = service
            .create("PROD001", "Seringa", fx.supplier.id, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: Entity::Brand, .. }));

        service
            .create("PROD001", "Seringa", fx.supplier.id, fx.brand.id, None)
            .await
            .unwrap();
        let err = service
            .create("PROD001", "Outra", fx.supplier.id, fx.brand.id, None)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { entity: Entity::Product, .. }));

        let err = service
            .create("PROD009", "Negativo", fx.supplier.id, fx.brand.id, Some(-1))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument { .. }));
        assert_eq!(service.list(&ProductFilter::default()).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn update_keeps_own_code_and_rejects_others() {
        let fx = fixture().await;
        let service = ProductService::new(fx.store.clone());
        let first = fx.product_with_stock("PROD001", 5).await;
        fx.product_with_stock("PROD002", 5).await;

        let view = service
            .update(first.id, "PROD001", "Seringa 20ml", fx.supplier.id, fx.brand.id)
            .await
            .unwrap();
        assert_eq!(view.name, "Seringa 20ml");

        let err = service
            .update(first.id, "PROD002", "Seringa", fx.supplier.id, fx.brand.id)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn toggle_and_active_listing() {
        let fx = fixture().await;
        let service = ProductService::new(fx.store.clone());
        let product = fx.product_with_stock("PROD001", 5).await;
        fx.product_with_stock("PROD002", 5).await;

        let view = service.toggle_status(product.id).await.unwrap();
        assert!(!view.active);

        let active = service.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].code, "PROD002");
    }

    #[tokio::test]
    async fn delete_unknown_product_is_not_found() {
        let fx = fixture().await;
        let service = ProductService::new(fx.store.clone());
        let product = fx.product_with_stock("PROD001", 5).await;

        service.delete(product.id).await.unwrap();
        assert!(matches!(
            service.delete(product.id).await,
            Err(AppError::NotFound { entity: Entity::Product, .. })
        ));
    }
}
