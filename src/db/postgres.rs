// src/db/postgres.rs

use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgConnection, PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{
        brand_repo, product_repo, stock_output_repo, stock_repo,
        store::{
            BrandRepository, ProductRepository, StockOutputRepository, StockRepository, Store, StoreTx,
            SupplierConfigurationRepository, SupplierRepository,
        },
        supplier_configuration_repo, supplier_repo,
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

/// Abre a pool e aplica as migrações de `./migrations`.
pub async fn connect(database_url: &str, max_connections: u32) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await?;
    tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

    sqlx::migrate!().run(&pool).await?;
    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    Ok(pool)
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Store for PgStore {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgTx { tx: Some(tx) }))
    }
}

// Se for dropada sem commit, o sqlx faz o rollback.
pub struct PgTx {
    tx: Option<Transaction<'static, Postgres>>,
}

impl PgTx {
    fn conn(&mut self) -> Result<&mut PgConnection, AppError> {
        self.tx
            .as_deref_mut()
            .ok_or_else(|| AppError::InternalServerError(anyhow!("transação já encerrada")))
    }
}

#[async_trait]
impl SupplierRepository for PgTx {
    async fn get_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError> {
        supplier_repo::find_by_id(self.conn()?, id).await
    }

    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError> {
        supplier_repo::list_all(self.conn()?).await
    }

    async fn supplier_cnpj_exists(&mut self, cnpj: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        supplier_repo::cnpj_exists(self.conn()?, cnpj, excluding).await
    }

    async fn supplier_email_exists(&mut self, email: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        supplier_repo::email_exists(self.conn()?, email, excluding).await
    }

    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError> {
        supplier_repo::insert(self.conn()?, supplier).await
    }

    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError> {
        supplier_repo::update(self.conn()?, supplier).await
    }

    async fn delete_supplier(&mut self, id: Uuid) -> Result<bool, AppError> {
        supplier_repo::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl BrandRepository for PgTx {
    async fn get_brand(&mut self, id: Uuid) -> Result<Option<Brand>, AppError> {
        brand_repo::find_by_id(self.conn()?, id).await
    }

    async fn list_brands(&mut self) -> Result<Vec<Brand>, AppError> {
        brand_repo::list_all(self.conn()?).await
    }

    async fn brand_name_exists(&mut self, name: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        brand_repo::name_exists(self.conn()?, name, excluding).await
    }

    async fn insert_brand(&mut self, brand: &Brand) -> Result<(), AppError> {
        brand_repo::insert(self.conn()?, brand).await
    }

    async fn update_brand(&mut self, brand: &Brand) -> Result<(), AppError> {
        brand_repo::update(self.conn()?, brand).await
    }

    async fn delete_brand(&mut self, id: Uuid) -> Result<bool, AppError> {
        brand_repo::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl ProductRepository for PgTx {
    async fn get_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError> {
        product_repo::find_by_id(self.conn()?, id).await
    }

    async fn get_product_view(&mut self, id: Uuid) -> Result<Option<ProductView>, AppError> {
        product_repo::find_view_by_id(self.conn()?, id).await
    }

    async fn list_product_views(&mut self, filter: &ProductFilter) -> Result<Vec<ProductView>, AppError> {
        product_repo::list_views(self.conn()?, filter).await
    }

    async fn product_code_exists(&mut self, code: &str, excluding: Option<Uuid>) -> Result<bool, AppError> {
        product_repo::code_exists(self.conn()?, code, excluding).await
    }

    async fn product_exists_by_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError> {
        product_repo::exists_by_supplier(self.conn()?, supplier_id).await
    }

    async fn product_exists_by_brand(&mut self, brand_id: Uuid) -> Result<bool, AppError> {
        product_repo::exists_by_brand(self.conn()?, brand_id).await
    }

    async fn count_products(&mut self) -> Result<i64, AppError> {
        product_repo::count(self.conn()?).await
    }

    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError> {
        product_repo::insert(self.conn()?, product).await
    }

    async fn update_product(&mut self, product: &Product) -> Result<(), AppError> {
        product_repo::update(self.conn()?, product).await
    }

    async fn delete_product(&mut self, id: Uuid) -> Result<bool, AppError> {
        product_repo::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl StockRepository for PgTx {
    async fn get_stock_by_product(&mut self, product_id: Uuid) -> Result<Option<CurrentStock>, AppError> {
        stock_repo::find_by_product_for_update(self.conn()?, product_id).await
    }

    async fn get_stock_view(&mut self, product_id: Uuid) -> Result<Option<StockView>, AppError> {
        stock_repo::find_view_by_product(self.conn()?, product_id).await
    }

    async fn list_stock_views(&mut self) -> Result<Vec<StockView>, AppError> {
        stock_repo::list_views(self.conn()?).await
    }

    async fn list_low_stock(&mut self, threshold: i32) -> Result<Vec<StockView>, AppError> {
        stock_repo::list_low(self.conn()?, threshold).await
    }

    async fn insert_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError> {
        stock_repo::insert(self.conn()?, stock).await
    }

    async fn update_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError> {
        stock_repo::update(self.conn()?, stock).await
    }
}

#[async_trait]
impl StockOutputRepository for PgTx {
    async fn get_output(&mut self, id: Uuid) -> Result<Option<StockOutput>, AppError> {
        stock_output_repo::find_by_id(self.conn()?, id).await
    }

    async fn get_output_view(&mut self, id: Uuid) -> Result<Option<StockOutputView>, AppError> {
        stock_output_repo::find_view_by_id(self.conn()?, id).await
    }

    async fn list_output_views(&mut self, filter: &OutputFilter) -> Result<Vec<StockOutputView>, AppError> {
        stock_output_repo::list_views(self.conn()?, filter).await
    }

    async fn insert_output(&mut self, output: &StockOutput) -> Result<(), AppError> {
        stock_output_repo::insert(self.conn()?, output).await
    }

    async fn update_output(&mut self, output: &StockOutput) -> Result<(), AppError> {
        stock_output_repo::update(self.conn()?, output).await
    }

    async fn delete_output(&mut self, id: Uuid) -> Result<bool, AppError> {
        stock_output_repo::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl SupplierConfigurationRepository for PgTx {
    async fn get_configuration(&mut self, id: Uuid) -> Result<Option<SupplierConfiguration>, AppError> {
        supplier_configuration_repo::find_by_id(self.conn()?, id).await
    }

    async fn get_configuration_by_supplier(
        &mut self,
        supplier_id: Uuid,
    ) -> Result<Option<SupplierConfiguration>, AppError> {
        supplier_configuration_repo::find_by_supplier(self.conn()?, supplier_id).await
    }

    async fn configuration_exists_for_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError> {
        supplier_configuration_repo::exists_for_supplier(self.conn()?, supplier_id).await
    }

    async fn get_configuration_view(&mut self, id: Uuid) -> Result<Option<SupplierConfigurationView>, AppError> {
        supplier_configuration_repo::find_view_by_id(self.conn()?, id).await
    }

    async fn list_configuration_views(&mut self) -> Result<Vec<SupplierConfigurationView>, AppError> {
        supplier_configuration_repo::list_views(self.conn()?).await
    }

    async fn insert_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError> {
        supplier_configuration_repo::insert(self.conn()?, config).await
    }

    async fn update_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError> {
        supplier_configuration_repo::update(self.conn()?, config).await
    }

    async fn delete_configuration(&mut self, id: Uuid) -> Result<bool, AppError> {
        supplier_configuration_repo::delete(self.conn()?, id).await
    }
}

#[async_trait]
impl StoreTx for PgTx {
    async fn commit(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.tx.take() {
            tx.commit().await?;
        }
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), AppError> {
        if let Some(tx) = self.tx.take() {
            tx.rollback().await?;
        }
        Ok(())
    }
}
