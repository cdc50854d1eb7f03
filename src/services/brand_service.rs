// src/services/brand_service.rs

use std::sync::Arc;

use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::{
        store::{BrandRepository, ProductRepository},
        Store,
    },
    models::brand::Brand,
};

#[derive(Clone)]
pub struct BrandService {
    store: Arc<dyn Store>,
}

impl BrandService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn create(&self, name: &str) -> Result<Brand, AppError> {
        let brand = Brand::new(name)?;
        let mut tx = self.store.begin().await?;

        if tx.brand_name_exists(&brand.name, None).await? {
            warn!("Marca '{}' já existe", brand.name);
            return Err(AppError::already_exists(Entity::Brand, "name", &brand.name));
        }

        tx.insert_brand(&brand).await?;
        tx.commit().await?;

        info!("Marca criada: {} ({})", brand.name, brand.id);
        Ok(brand)
    }

    pub async fn get(&self, id: Uuid) -> Result<Brand, AppError> {
        let mut tx = self.store.begin().await?;
        tx.get_brand(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Brand, id))
    }

    pub async fn list(&self) -> Result<Vec<Brand>, AppError> {
        let mut tx = self.store.begin().await?;
        tx.list_brands().await
    }

    pub async fn update(&self, id: Uuid, name: &str) -> Result<Brand, AppError> {
        let mut tx = self.store.begin().await?;

        let mut brand = tx
            .get_brand(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Brand, id))?;

        // Renomear para o próprio nome (mesmo mudando maiúsculas) é permitido.
        if tx.brand_name_exists(name, Some(id)).await? {
            warn!("Marca '{}' já existe", name);
            return Err(AppError::already_exists(Entity::Brand, "name", name));
        }

        brand.update_name(name)?;
        tx.update_brand(&brand).await?;
        tx.commit().await?;

        info!("Marca atualizada: {}", brand.id);
        Ok(brand)
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.store.begin().await?;

        if tx.get_brand(id).await?.is_none() {
            return Err(AppError::not_found(Entity::Brand, id));
        }
        if tx.product_exists_by_brand(id).await? {
            warn!("Marca {} ainda tem produtos; exclusão negada", id);
            return Err(AppError::InUse {
                entity: Entity::Brand,
                dependents: Entity::Product,
            });
        }

        tx.delete_brand(id).await?;
        tx.commit().await?;

        info!("Marca excluída: {}", id);
        Ok(())
    }

    pub async fn toggle_status(&self, id: Uuid) -> Result<Brand, AppError> {
        let mut tx = self.store.begin().await?;

        let mut brand = tx
            .get_brand(id)
            .await?
            .ok_or_else(|| AppError::not_found(Entity::Brand, id))?;

        if brand.active {
            brand.deactivate();
        } else {
            brand.activate();
        }
        tx.update_brand(&brand).await?;
        tx.commit().await?;
        Ok(brand)
    }
}
