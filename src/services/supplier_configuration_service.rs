// src/services/supplier_configuration_service.rs

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{
        store::{SupplierConfigurationRepository, SupplierRepository},
        Store, StoreTx,
    },
    models::supplier_configuration::{ReorderPlan, SupplierConfiguration, SupplierConfigurationView},
};

#[derive(Clone)]
pub struct SupplierConfigurationService {
    store: Arc<dyn Store>,
}

async fn load_view(tx: &mut dyn StoreTx, id: Uuid) -> Result<SupplierConfigurationView, AppError> {
    tx.get_configuration_view(id)
        .await?
        .ok_or_else(|| AppError::not_found(Entity::SupplierConfiguration, id))
}

async fn load(tx: &mut dyn StoreTx, id: Uuid) -> Result<SupplierConfiguration, AppError> {
    tx.get_configuration(id)
        .await?
        .ok_or_else(|| AppError::not_found(Entity::SupplierConfiguration, id))
}

impl SupplierConfigurationService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(
        &self,
        supplier_id: Uuid,
        planning_months: i32,
        minimum_months: i32,
        delivery_lead_time_days: i32,
    ) -> Result<SupplierConfigurationView, AppError> {
        let config = SupplierConfiguration::new(supplier_id, planning_months, minimum_months, delivery_lead_time_days)?;
        let mut tx = self.store.begin().await?;

        if tx.get_supplier(supplier_id).await?.is_none() {
            return Err(AppError::not_found(Entity::Supplier, supplier_id));
        }
        // Uma configuração por fornecedor.
        if tx.configuration_exists_for_supplier(supplier_id).await? {
            warn!("Fornecedor {} já possui configuração", supplier_id);
            return Err(AppError::already_exists(
                Entity::SupplierConfiguration,
                "supplierId",
                supplier_id.to_string(),
            ));
        }

        tx.insert_configuration(&config).await?;
        let view = load_view(tx.as_mut(), config.id).await?;
        tx.commit().await?;

        info!("Configuração {} criada para o fornecedor {}", config.id, supplier_id);
        Ok(view)
    }

    pub async fn get(&self, id: Uuid) -> Result<SupplierConfigurationView, AppError> {
        let mut tx = self.store.begin().await?;
        load_view(tx.as_mut(), id).await
    }

    pub async fn get_by_supplier(&self, supplier_id: Uuid) -> Result<SupplierConfigurationView, AppError> {
        let mut tx = self.store.begin().await?;
        let config = tx
            .get_configuration_by_supplier(supplier_id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::SupplierConfiguration, supplier_id))?;
        load_view(tx.as_mut(), config.id).await
    }

    pub async fn list(&self) -> Result<Vec<SupplierConfigurationView>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_configuration_views().await
    }

    pub async fn update(
        &self,
        id: Uuid,
        planning_months: i32,
        minimum_months: i32,
        delivery_lead_time_days: i32,
    ) -> Result<SupplierConfigurationView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut config = load(tx.as_mut(), id).await?;
        config.update_configuration(planning_months, minimum_months, delivery_lead_time_days)?;
        tx.update_configuration(&config).await?;
        let view = load_view(tx.as_mut(), id).await?;
        tx.commit().await?;

        info!("Configuração {} atualizada", id);
        Ok(view)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;
        if !tx.delete_configuration(id).await? {
            return Err(AppError::not_found(Entity::SupplierConfiguration, id));
        }
        tx.commit().await?;

        info!("Configuração {} excluída", id);
        Ok(())
    }

    pub async fn toggle_status(&self, id: Uuid) -> Result<SupplierConfigurationView, AppError> {
        let mut tx = self.store.begin().await?;

        let mut config = load(tx.as_mut(), id).await?;
        if config.active {
            config.deactivate();
        } else {
            config.activate();
        }
        tx.update_configuration(&config).await?;
        let view = load_view(tx.as_mut(), id).await?;
        tx.commit().await?;
        Ok(view)
    }

    /// Quanto pedir (consumo médio x meses de planejamento) e quando chega.
    pub async fn reorder_plan(&self, id: Uuid, average_monthly_consumption: i32) -> Result<ReorderPlan, AppError> {
        let mut tx = self.store.begin().await?;
        let config = load(tx.as_mut(), id).await?;

        Ok(ReorderPlan {
            configuration_id: config.id,
            supplier_id: config.supplier_id,
            reorder_quantity: config.calculate_reorder_quantity(average_monthly_consumption)?,
            expected_delivery_date: config.calculate_delivery_date(Utc::now())?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::test_support::fixture;

    #[tokio::test]
    async fn one_configuration_per_supplier() {
        let fx = fixture().await;
        let service = SupplierConfigurationService::new(fx.store.clone());

        let view = service.create(fx.supplier.id, 6, 2, 15).await.unwrap();
        assert_eq!(view.supplier_name.as_deref(), Some("MedSupply Brasil"));

        let err = service.create(fx.supplier.id, 3, 1, 10).await.unwrap_err();
        assert!(matches!(
            err,
            AppError::AlreadyExists { entity: Entity::SupplierConfiguration, .. }
        ));

        let by_supplier = service.get_by_supplier(fx.supplier.id).await.unwrap();
        assert_eq!(by_supplier.id, view.id);
    }

    #[tokio::test]
    async fn invalid_parameters_and_missing_supplier() {
        let fx = fixture().await;
        let service = SupplierConfigurationService::new(fx.store.clone());

        assert!(matches!(
            service.create(fx.supplier.id, 2, 6, 15).await,
            Err(AppError::InvalidArgument { reason: "minimum_exceeds_planning", .. })
        ));
        assert!(matches!(
            service.create(Uuid::new_v4(), 6, 2, 15).await,
            Err(AppError::NotFound { entity: Entity::Supplier, .. })
        ));
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_toggle_and_reorder_plan() {
        let fx = fixture().await;
        let service = SupplierConfigurationService::new(fx.store.clone());
        let view = service.create(fx.supplier.id, 6, 2, 15).await.unwrap();

        assert!(service.update(view.id, 3, 4, 10).await.is_err());
        let updated = service.update(view.id, 12, 3, 30).await.unwrap();
        assert_eq!(updated.planning_months, 12);

        let toggled = service.toggle_status(view.id).await.unwrap();
        assert!(!toggled.active);

        let plan = service.reorder_plan(view.id, 10).await.unwrap();
        assert_eq!(plan.reorder_quantity, 120);
        assert!(plan.expected_delivery_date > Utc::now() + chrono::Duration::days(29));

        service.delete(view.id).await.unwrap();
        assert!(matches!(
            service.get(view.id).await,
            Err(AppError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn reorder_plan_reports_unreachable_delivery_date() {
        let fx = fixture().await;
        let service = SupplierConfigurationService::new(fx.store.clone());

        let view = service.create(fx.supplier.id, 6, 2, i32::MAX).await.unwrap();
        assert!(matches!(
            service.reorder_plan(view.id, 10).await,
            Err(AppError::InvalidArgument { field: "deliveryLeadTimeDays", reason: "overflow" })
        ));
    }
}
