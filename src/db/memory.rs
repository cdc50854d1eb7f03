// src/db/memory.rs

use std::{collections::HashMap, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

use crate::{
    common::error::{AppError, Entity},
    db::store::{
        BrandRepository, ProductRepository, StockOutputRepository, StockRepository, Store, StoreTx,
        SupplierConfigurationRepository, SupplierRepository,
    },
    models::{
        brand::Brand,
        product::{Product, ProductFilter, ProductView},
        stock::{CurrentStock, StockView},
        stock_output::{OutputFilter, StockOutput, StockOutputView},
        supplier::Supplier,
        supplier_configuration::{SupplierConfiguration, SupplierConfigurationView},
    },
};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    suppliers: HashMap<Uuid, Supplier>,
    brands: HashMap<Uuid, Brand>,
    products: HashMap<Uuid, Product>,
    stocks: HashMap<Uuid, CurrentStock>,
    outputs: HashMap<Uuid, StockOutput>,
    configurations: HashMap<Uuid, SupplierConfiguration>,
}

impl MemoryState {
    fn stock_of(&self, product_id: Uuid) -> Option<&CurrentStock> {
        self.stocks.values().find(|s| s.product_id == product_id)
    }

    fn product_view(&self, product: &Product) -> ProductView {
        let supplier_name = self
            .suppliers
            .get(&product.supplier_id)
            .map(|s| s.name.clone())
            .unwrap_or_default();
        let brand_name = self
            .brands
            .get(&product.brand_id)
            .map(|b| b.name.clone())
            .unwrap_or_default();
        ProductView {
            id: product.id,
            code: product.code.clone(),
            name: product.name.clone(),
            active: product.active,
            created_at: product.created_at,
            updated_at: product.updated_at,
            supplier_id: product.supplier_id,
            brand_id: product.brand_id,
            supplier_name,
            brand_name,
            stock_quantity: self.stock_of(product.id).map(|s| s.quantity),
        }
    }

    fn stock_view(&self, stock: &CurrentStock) -> Option<StockView> {
        self.products.get(&stock.product_id).map(|p| StockView::new(stock, p))
    }

    fn output_view(&self, output: &StockOutput) -> Option<StockOutputView> {
        self.products
            .get(&output.product_id)
            .map(|p| StockOutputView::new(output, p))
    }

    fn configuration_view(&self, config: &SupplierConfiguration) -> SupplierConfigurationView {
        let supplier_name = self.suppliers.get(&config.supplier_id).map(|s| s.name.clone());
        SupplierConfigurationView::new(config, supplier_name)
    }

    // Equivalentes às foreign keys do schema.
    fn require_supplier(&self, id: Uuid) -> Result<(), AppError> {
        if self.suppliers.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(Entity::Supplier, id))
        }
    }

    fn require_brand(&self, id: Uuid) -> Result<(), AppError> {
        if self.brands.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(Entity::Brand, id))
        }
    }

    fn require_product(&self, id: Uuid) -> Result<(), AppError> {
        if self.products.contains_key(&id) {
            Ok(())
        } else {
            Err(AppError::not_found(Entity::Product, id))
        }
    }
}

/// Store em memória: mesmas regras do schema Postgres, usado nos testes e no modo
/// `STORAGE_BACKEND=memory`. Uma transação por vez; o estado só muda no commit.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let guard = self.state.clone().lock_owned().await;
        let work = guard.clone();
        Ok(Box::new(MemoryTx {
            guard: Some(guard),
            work,
        }))
    }
}

pub struct MemoryTx {
    guard: Option<OwnedMutexGuard<MemoryState>>,
    work: MemoryState,
}

impl MemoryTx {
    fn state(&mut self) -> Result<&mut MemoryState, AppError> {
        if self.guard.is_none() {
            return Err(AppError::InternalServerError(anyhow!("transação já encerrada")));
        }
        Ok(&mut self.work)
    }
}

fn sorted_by<T, K: Ord>(mut items: Vec<T>, key: impl FnMut(&T) -> K) -> Vec<T> {
    items.sort_by_key(key);
    items
}

#[async_trait]
impl SupplierRepository for MemoryTx {
    async fn get_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        Ok(self.state()?.suppliers.get(&id).cloned())
    }

    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError> {
        let all: Vec<Supplier> = self.state()?.suppliers.values().cloned().collect();
        Ok(sorted_by(all, |s| s.name.clone()))
    }

    async fn supplier_cnpj_exists(&mut self, cnpj: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .suppliers
            .values()
            .any(|s| s.cnpj == cnpj && Some(s.id) != excluding))
    }

    async fn supplier_email_exists(&mut self, email: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .suppliers
            .values()
            .any(|s| s.email == email && Some(s.id) != excluding))
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError> {
        if self.supplier_cnpj_exists(&supplier.cnpj, None).await? {
            return Err(AppError::already_exists(Entity::Supplier, "cnpj", &supplier.cnpj));
        }
        if self.supplier_email_exists(&supplier.email, None).await? {
            return Err(AppError::already_exists(Entity::Supplier, "email", &supplier.email));
        }
        self.state()?.suppliers.insert(supplier.id, supplier.clone());
        Ok(())
    }

    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError> {
        if self.supplier_email_exists(&supplier.email, Some(supplier.id)).await? {
            return Err(AppError::already_exists(Entity::Supplier, "email", &supplier.email));
        }
        let state = self.state()?;
        if let Some(current) = state.suppliers.get_mut(&supplier.id) {
            *current = supplier.clone();
        }
        Ok(())
    }

    async fn delete_supplier(&mut self, id: Uuid) -> Result<bool, AppError> {
        let state = self.state()?;
        if state.products.values().any(|p| p.supplier_id == id) {
            return Err(AppError::InUse {
                entity: Entity::Supplier,
                dependents: Entity::Product,
            });
        }
        state.configurations.retain(|_, c| c.supplier_id != id);
        Ok(state.suppliers.remove(&id).is_some())
    }
}

#[async_trait]
impl BrandRepository for MemoryTx {
    async fn get_brand(&mut self, id: Uuid) -> Result<Option<Brand>, AppError> {
        Ok(self.state()?.brands.get(&id).cloned())
    }

    async fn list_brands(&mut self) -> Result<Vec<Brand>, AppError> {
        let all: Vec<Brand> = self.state()?.brands.values().cloned().collect();
        Ok(sorted_by(all, |b| b.name.clone()))
    }

    async fn brand_name_exists(&mut self, name: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .brands
            .values()
            .any(|b| b.has_name(name) && Some(b.id) != excluding))
    }

    async fn insert_brand(&mut self, brand: &Brand) -> Result<(), AppError> {
        if self.brand_name_exists(&brand.name, None).await? {
            return Err(AppError::already_exists(Entity::Brand, "name", &brand.name));
        }
        self.state()?.brands.insert(brand.id, brand.clone());
        Ok(())
    }

    async fn update_brand(&mut self, brand: &Brand) -> Result<(), AppError> {
        if self.brand_name_exists(&brand.name, Some(brand.id)).await? {
            return Err(AppError::already_exists(Entity::Brand, "name", &brand.name));
        }
        let state = self.state()?;
        if let Some(current) = state.brands.get_mut(&brand.id) {
            *current = brand.clone();
        }
        Ok(())
    }

    async fn delete_brand(&mut self, id: Uuid) -> Result<bool, AppError> {
        let state = self.state()?;
        if state.products.values().any(|p| p.brand_id == id) {
            return Err(AppError::InUse {
                entity: Entity::Brand,
                dependents: Entity::Product,
            });
        }
        Ok(state.brands.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for MemoryTx {
    async fn get_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError> {
        Ok(self.state()?.products.get(&id).cloned())
    }

    async fn get_product_view(&mut self, id: Uuid) -> Result<Option<ProductView>, AppError> {
        let state = self.state()?;
        Ok(state.products.get(&id).map(|p| state.product_view(p)))
    }

    async fn list_product_views(&mut self, filter: &ProductFilter) -> Result<Vec<ProductView>, AppError> {
        let state = self.state()?;
        let views: Vec<ProductView> = state
            .products
            .values()
            .filter(|p| filter.matches(p))
            .map(|p| state.product_view(p))
            .collect();
        Ok(sorted_by(views, |v| v.name.clone()))
    }

    async fn product_code_exists(&mut self, code: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .products
            .values()
            .any(|p| p.code == code && Some(p.id) != excluding))
    }

    async fn product_exists_by_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError> {
        Ok(self.state()?.products.values().any(|p| p.supplier_id == supplier_id))
    }

    async fn product_exists_by_brand(&mut self, brand_id: Uuid) -> Result<bool, AppError> {
        Ok(self.state()?.products.values().any(|p| p.brand_id == brand_id))
    }

    async fn count_products(&mut self) -> Result<i64, AppError> {
        let total = self.state()?.products.len();
        i64::try_from(total).map_err(|e| AppError::InternalServerError(e.into()))
    }

    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError> {
        if self.product_code_exists(&product.code, None).await? {
            return Err(AppError::already_exists(Entity::Product, "code", &product.code));
        }
        let state = self.state()?;
        state.require_supplier(product.supplier_id)?;
        state.require_brand(product.brand_id)?;
        state.products.insert(product.id, product.clone());
        Ok(())
    }

    async fn update_product(&mut self, product: &Product) -> Result<(), AppError> {
        if self.product_code_exists(&product.code, Some(product.id)).await? {
            return Err(AppError::already_exists(Entity::Product, "code", &product.code));
        }
        let state = self.state()?;
        state.require_supplier(product.supplier_id)?;
        state.require_brand(product.brand_id)?;
        if let Some(current) = state.products.get_mut(&product.id) {
            *current = product.clone();
        }
        Ok(())
    }

    async fn delete_product(&mut self, id: Uuid) -> Result<bool, AppError> {
        let state = self.state()?;
        state.stocks.retain(|_, s| s.product_id != id);
        state.outputs.retain(|_, o| o.product_id != id);
        Ok(state.products.remove(&id).is_some())
    }
}

#[async_trait]
impl StockRepository for MemoryTx {
    async fn get_stock_by_product(&mut self, product_id: Uuid) -> Result<Option<CurrentStock>, AppError> {
        Ok(self.state()?.stock_of(product_id).cloned())
    }

    async fn get_stock_view(&mut self, product_id: Uuid) -> Result<Option<StockView>, AppError> {
        let state = self.state()?;
        Ok(state.stock_of(product_id).and_then(|s| state.stock_view(s)))
    }

    async fn list_stock_views(&mut self) -> Result<Vec<StockView>, AppError> {
        let state = self.state()?;
        let views: Vec<StockView> = state.stocks.values().filter_map(|s| state.stock_view(s)).collect();
        Ok(sorted_by(views, |v| v.product_name.clone()))
    }

    async fn list_low_stock(&mut self, threshold: i32) -> Result<Vec<StockView>, AppError> {
        let state = self.state()?;
        let views: Vec<StockView> = state
            .stocks
            .values()
            .filter(|s| s.is_stock_low(threshold))
            .filter_map(|s| state.stock_view(s))
            .collect();
        Ok(sorted_by(views, |v| (v.quantity, v.product_name.clone())))
    }

    async fn insert_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError> {
        let state = self.state()?;
        state.require_product(stock.product_id)?;
        if state.stock_of(stock.product_id).is_some() {
            return Err(AppError::already_exists(Entity::Stock, "productId", stock.product_id.to_string()));
        }
        state.stocks.insert(stock.id, stock.clone());
        Ok(())
    }

    async fn update_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError> {
        // CHECK (quantity >= 0)
        if stock.quantity < 0 {
            return Err(AppError::invalid("quantity", "must_not_be_negative"));
        }
        if let Some(current) = self.state()?.stocks.get_mut(&stock.id) {
            *current = stock.clone();
        }
        Ok(())
    }
}

#[async_trait]
impl StockOutputRepository for MemoryTx {
    async fn get_output(&mut self, id: Uuid) -> Result<Option<StockOutput>, AppError> {
        Ok(self.state()?.outputs.get(&id).cloned())
    }

    async fn get_output_view(&mut self, id: Uuid) -> Result<Option<StockOutputView>, AppError> {
        let state = self.state()?;
        Ok(state.outputs.get(&id).and_then(|o| state.output_view(o)))
    }

    async fn list_output_views(&mut self, filter: &OutputFilter) -> Result<Vec<StockOutputView>, AppError> {
        let state = self.state()?;
        let mut views: Vec<StockOutputView> = state
            .outputs
            .values()
            .filter(|o| filter.matches(o))
            .filter_map(|o| state.output_view(o))
            .collect();
        views.sort_by(|a, b| b.output_date.cmp(&a.output_date));
        Ok(views)
    }

    async fn insert_output(&mut self, output: &StockOutput) -> Result<(), AppError> {
        let state = self.state()?;
        state.require_product(output.product_id)?;
        state.outputs.insert(output.id, output.clone());
        Ok(())
    }

    async fn update_output(&mut self, output: &StockOutput) -> Result<(), AppError> {
        if let Some(current) = self.state()?.outputs.get_mut(&output.id) {
            *current = output.clone();
        }
        Ok(())
    }

    async fn delete_output(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state()?.outputs.remove(&id).is_some())
    }
}

#[async_trait]
impl SupplierConfigurationRepository for MemoryTx {
    async fn get_configuration(&mut self, id: Uuid) -> Result<Option<SupplierConfiguration>, AppError> {
        Ok(self.state()?.configurations.get(&id).cloned())
    }

    async fn get_configuration_by_supplier(
        &mut self,
        supplier_id: Uuid,
    ) -> Result<Option<SupplierConfiguration>, AppError> {
        Ok(self
            .state()?
            .configurations
            .values()
            .find(|c| c.supplier_id == supplier_id)
            .cloned())
    }

    async fn configuration_exists_for_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError> {
        Ok(self
            .state()?
            .configurations
            .values()
            .any(|c| c.supplier_id == supplier_id))
    }

    async fn get_configuration_view(&mut self, id: Uuid) -> Result<Option<SupplierConfigurationView>, AppError> {
        let state = self.state()?;
        Ok(state.configurations.get(&id).map(|c| state.configuration_view(c)))
    }

    async fn list_configuration_views(&mut self) -> Result<Vec<SupplierConfigurationView>, AppError> {
        let state = self.state()?;
        let views: Vec<SupplierConfigurationView> = state
            .configurations
            .values()
            .map(|c| state.configuration_view(c))
            .collect();
        Ok(sorted_by(views, |v| v.supplier_name.clone()))
    }

    async fn insert_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError> {
        if self.configuration_exists_for_supplier(config.supplier_id).await? {
            return Err(AppError::already_exists(
                Entity::SupplierConfiguration,
                "supplierId",
                config.supplier_id.to_string(),
            ));
        }
        let state = self.state()?;
        state.require_supplier(config.supplier_id)?;
        state.configurations.insert(config.id, config.clone());
        Ok(())
    }

    async fn update_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError> {
        if let Some(current) = self.state()?.configurations.get_mut(&config.id) {
            *current = config.clone();
        }
        Ok(())
    }

    async fn delete_configuration(&mut self, id: Uuid) -> Result<bool, AppError> {
        Ok(self.state()?.configurations.remove(&id).is_some())
    }
}

#[async_trait]
impl StoreTx for MemoryTx {
    async fn commit(&mut self) -> Result<(), AppError> {
        if let Some(mut guard) = self.guard.take() {
            *guard = std::mem::take(&mut self.work);
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        self.guard = None;
        self.work = MemoryState::default();
        Ok(())
    }
}
