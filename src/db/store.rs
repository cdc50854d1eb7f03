// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        brand::Brand,
        product::{Product, ProductFilter, ProductView},
        stock::{CurrentStock, StockView},
        stock_output::{OutputFilter, StockOutput, StockOutputView},
        supplier::Supplier,
        supplier_configuration::{SupplierConfiguration, SupplierConfigurationView},
    },
};

// ---
// Portas de persistência
// ---
// Os services só enxergam estes traits. Tudo roda dentro de um `StoreTx`:
// o que não for confirmado com `commit` é descartado.

#[async_trait]
pub trait SupplierRepository: Send {
    async fn get_supplier(&mut self, id: Uuid) -> Result<Option<Supplier>, AppError>;
    async fn list_suppliers(&mut self) -> Result<Vec<Supplier>, AppError>;
    async fn supplier_cnpj_exists(&mut self, cnpj: &str, excluding: Option<Uuid>) -> Result<bool, AppError>;
    async fn supplier_email_exists(&mut self, email: &str, excluding: Option<Uuid>) -> Result<bool, AppError>;
    async fn insert_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError>;
    async fn update_supplier(&mut self, supplier: &Supplier) -> Result<(), AppError>;
    async fn delete_supplier(&mut self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait BrandRepository: Send {
    async fn get_brand(&mut self, id: Uuid) -> Result<Option<Brand>, AppError>;
    async fn list_brands(&mut self) -> Result<Vec<Brand>, AppError>;
    /// Sem diferenciar maiúsculas.
    async fn brand_name_exists(&mut self, name: &str, excluding: Option<Uuid>) -> Result<bool, AppError>;
    async fn insert_brand(&mut self, brand: &Brand) -> Result<(), AppError>;
    async fn update_brand(&mut self, brand: &Brand) -> Result<(), AppError>;
    async fn delete_brand(&mut self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait ProductRepository: Send {
    async fn get_product(&mut self, id: Uuid) -> Result<Option<Product>, AppError>;
    async fn get_product_view(&mut self, id: Uuid) -> Result<Option<ProductView>, AppError>;
    async fn list_product_views(&mut self, filter: &ProductFilter) -> Result<Vec<ProductView>, AppError>;
    async fn product_code_exists(&mut self, code: &str, excluding: Option<Uuid>) -> Result<bool, AppError>;
    async fn product_exists_by_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError>;
    async fn product_exists_by_brand(&mut self, brand_id: Uuid) -> Result<bool, AppError>;
    async fn count_products(&mut self) -> Result<i64, AppError>;
    async fn insert_product(&mut self, product: &Product) -> Result<(), AppError>;
    async fn update_product(&mut self, product: &Product) -> Result<(), AppError>;
    /// Remove também o saldo e as saídas do produto.
    async fn delete_product(&mut self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait StockRepository: Send {
    /// Carrega o saldo travando a linha até o fim da transação.
    async fn get_stock_by_product(&mut self, product_id: Uuid) -> Result<Option<CurrentStock>, AppError>;
    async fn get_stock_view(&mut self, product_id: Uuid) -> Result<Option<StockView>, AppError>;
    async fn list_stock_views(&mut self) -> Result<Vec<StockView>, AppError>;
    async fn list_low_stock(&mut self, threshold: i32) -> Result<Vec<StockView>, AppError>;
    async fn insert_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError>;
    async fn update_stock(&mut self, stock: &CurrentStock) -> Result<(), AppError>;
}

#[async_trait]
pub trait StockOutputRepository: Send {
    async fn get_output(&mut self, id: Uuid) -> Result<Option<StockOutput>, AppError>;
    async fn get_output_view(&mut self, id: Uuid) -> Result<Option<StockOutputView>, AppError>;
    /// Mais recentes primeiro.
    async fn list_output_views(&mut self, filter: &OutputFilter) -> Result<Vec<StockOutputView>, AppError>;
    async fn insert_output(&mut self, output: &StockOutput) -> Result<(), AppError>;
    async fn update_output(&mut self, output: &StockOutput) -> Result<(), AppError>;
    async fn delete_output(&mut self, id: Uuid) -> Result<bool, AppError>;
}

#[async_trait]
pub trait SupplierConfigurationRepository: Send {
    async fn get_configuration(&mut self, id: Uuid) -> Result<Option<SupplierConfiguration>, AppError>;
    async fn get_configuration_by_supplier(
        &mut self,
        supplier_id: Uuid,
    ) -> Result<Option<SupplierConfiguration>, AppError>;
    async fn configuration_exists_for_supplier(&mut self, supplier_id: Uuid) -> Result<bool, AppError>;
    async fn get_configuration_view(&mut self, id: Uuid) -> Result<Option<SupplierConfigurationView>, AppError>;
    async fn list_configuration_views(&mut self) -> Result<Vec<SupplierConfigurationView>, AppError>;
    async fn insert_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError>;
    async fn update_configuration(&mut self, config: &SupplierConfiguration) -> Result<(), AppError>;
    async fn delete_configuration(&mut self, id: Uuid) -> Result<bool, AppError>;
}

/// Uma unidade de trabalho. Dropar sem `commit` equivale a `rollback`.
#[async_trait]
pub trait StoreTx:
    SupplierRepository
    + BrandRepository
    + ProductRepository
    + StockRepository
    + StockOutputRepository
    + SupplierConfigurationRepository
    + Send
{
    async fn commit(&mut self) -> Result<(), AppError>;
    async fn rollback(&mut self) -> Result<(), AppError>;
}

#[async_trait]
pub trait Store: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn StoreTx>, AppError>;
}
