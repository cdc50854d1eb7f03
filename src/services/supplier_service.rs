// src/services/supplier_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{
        store::{ProductRepository, SupplierRepository},
        Store,
    },
    models::supplier::Supplier,
};

#[derive(Clone)]
pub struct SupplierService {
    store: Arc<dyn Store>,
}

impl SupplierService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    // --- CREATE ---
    pub async fn create(&self, name: &str, cnpj: &str, phone: &str, email: &str) -> Result<Supplier, AppError> {
        // Normaliza o CNPJ antes da checagem de duplicidade.
        let supplier = Supplier::new(name, cnpj, phone, email)?;

        let mut tx = self.store.begin().await?;

        if tx.supplier_cnpj_exists(&supplier.cnpj, None).await? {
            warn!("Fornecedor com CNPJ {} já existe", supplier.cnpj);
            return Err(AppError::already_exists(Entity::Supplier, "cnpj", &supplier.cnpj));
        }
        if tx.supplier_email_exists(&supplier.email, None).await? {
            warn!("Fornecedor com email {} já existe", supplier.email);
            return Err(AppError::already_exists(Entity::Supplier, "email", &supplier.email));
        }

        tx.insert_supplier(&supplier).await?;
        tx.commit().await?;

        info!("Fornecedor criado: {} ({})", supplier.name, supplier.id);
        Ok(supplier)
    }

    pub async fn get(&self, id: Uuid) -> Result<Supplier, AppError> {
        let mut tx = self.store.begin().await?;
        tx.get_supplier(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Supplier, id))
    }

    pub async fn list(&self) -> Result<Vec<Supplier>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_suppliers().await
    }

    // --- UPDATE ---
    // O CNPJ não é alterável; só o email passa pela checagem de duplicidade.
    pub async fn update(&self, id: Uuid, name: &str, phone: &str, email: &str) -> Result<Supplier, AppError> {
        let mut tx = self.store.begin().await?;

        let mut supplier = tx
            .get_supplier(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Supplier, id))?;

        if tx.supplier_email_exists(email, Some(id)).await? {
            warn!("Email {} já usado por outro fornecedor", email);
            return Err(AppError::already_exists(Entity::Supplier, "email", email));
        }

        supplier.update_info(name, phone, email)?;
        tx.update_supplier(&supplier).await?;
        tx.commit().await?;

        info!("Fornecedor atualizado: {}", supplier.id);
        Ok(supplier)
    }

    // --- DELETE ---
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        if tx.get_supplier(id).await?.is_none() {
            return Err(AppError::not_found(Entity::Supplier, id));
        }
        if tx.product_exists_by_supplier(id).await? {
            warn!("Fornecedor {} ainda tem produtos; exclusão negada", id);
            return Err(AppError::InUse {
                entity: Entity::Supplier,
                dependents: Entity::Product,
            });
        }

        tx.delete_supplier(id).await?;
        tx.commit().await?;

        info!("Fornecedor excluído: {}", id);
        Ok(())
    }

    pub async fn toggle_status(&self, id: Uuid) -> Result<Supplier, AppError> {
        let mut tx = self.store.begin().await?;

        let mut supplier = tx
            .get_supplier(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Supplier, id))?;

        if supplier.active {
            supplier.deactivate();
        } else {
            supplier.activate();
        }
        tx.update_supplier(&supplier).await?;
        tx.commit().await?;

        info!("Fornecedor {} agora está {}", supplier.id, if supplier.active { "ativo" } else { "inativo" });
        Ok(supplier)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    #[tokio::test]
    async fn create_normalizes_cnpj_and_rejects_duplicates() {
        let fx = fixture().await;
        let service = SupplierService::new(fx.store.clone());

        let created = service
            .create("Ortho Distribuidora", "98.765.432/0001-10", "(21) 1111-2222", "vendas@ortho.com.br")
            .await
            .unwrap();
        assert_eq!(created.cnpj, "98765432000110");

        let err = service
            .create("Outra", "98765432000110", "(21) 0000-0000", "outra@ortho.com.br")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { field: "cnpj", .. }));

        let err = service
            .create("Outra", "11.222.333/0001-44", "(21) 0000-0000", "vendas@ortho.com.br")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { field: "email", .. }));
    }

    #[tokio::test]
    async fn update_with_own_email_is_allowed() {
        let fx = fixture().await;
        let service = SupplierService::new(fx.store.clone());

        let updated = service
            .update(fx.supplier.id, "MedSupply", "(11) 9999-9999", &fx.supplier.email)
            .await
            .unwrap();
        assert_eq!(updated.name, "MedSupply");
        assert_eq!(updated.cnpj, fx.supplier.cnpj);
    }

    #[tokio::test]
    async fn update_to_someone_elses_email_fails() {
        let fx = fixture().await;
        let service = SupplierService::new(fx.store.clone());
        let other = service
            .create("Ortho", "98765432000110", "(21) 1111-2222", "vendas@ortho.com.br")
            .await
            .unwrap();

        let err = service
            .update(other.id, "Ortho", "(21) 1111-2222", &fx.supplier.email)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::AlreadyExists { entity: Entity::Supplier, .. }));
    }

    #[tokio::test]
    async fn delete_is_blocked_while_products_reference_supplier() {
        let fx = fixture().await;
        let service = SupplierService::new(fx.store.clone());
        fx.product_with_stock("PROD001", 1).await;

        let err = service.delete(fx.supplier.id).await.unwrap_err();
        assert!(matches!(err, AppError::InUse { entity: Entity::Supplier, .. }));

        let err = service.delete(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound { entity: Entity::Supplier, .. }));
    }

    #[tokio::test]
    async fn toggle_flips_active_flag() {
        let fx = fixture().await;
        let service = SupplierService::new(fx.store.clone());

        let toggled = service.toggle_status(fx.supplier.id).await.unwrap();
        assert!(!toggled.active);
        let toggled = service.toggle_status(fx.supplier.id).await.unwrap();
        assert!(toggled.active);
        assert_eq!(service.list().await.unwrap().len(), 1);
    }
}
