// src/services/seed.rs

use tracing::info;

use crate::{
    common::error::AppError,
    db::{
        store::{BrandRepository, ProductRepository, StockRepository, SupplierConfigurationRepository, SupplierRepository},
        Store,
    },
    models::{
        brand::Brand, product::Product, stock::CurrentStock, supplier::Supplier,
        supplier_configuration::SupplierConfiguration,
    },
};

/// Popula uma base vazia com dados de demonstração. Não faz nada se já existir
/// algum produto. Retorna `true` quando inseriu.
pub async fn seed_database(store: &dyn Store) -> Result<bool, AppError> {
    let mut tx = store.begin().await?;

    if tx.count_products().await? > 0 {
        tx.rollback().await?;
        info!("Base já possui produtos, carga inicial ignorada");
        return Ok(false);
    }

    let supplier = Supplier::new(
        "MedSupply Brasil",
        "12345678000190",
        "(11) 3456-7890",
        "contato@medsupply.com.br",
    )?;
    let brand = Brand::new("MedTech")?;
    let config = SupplierConfiguration::new(supplier.id, 6, 2, 15)?;
    let product = Product::new("PROD001", "Seringa 10ml", supplier.id, brand.id)?;
    let stock = CurrentStock::new(product.id, 50)?;

    tx.insert_supplier(&supplier).await?;
    tx.insert_brand(&brand).await?;
    tx.insert_configuration(&config).await?;
    tx.insert_product(&product).await?;
    tx.insert_stock(&stock).await?;
    tx.commit().await?;

    info!("🌱 Seed aplicado: fornecedor, marca, configuração e produto {}", product.code);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryStore::new();

        assert!(seed_database(&store).await.unwrap());
        assert!(!seed_database(&store).await.unwrap());

        let mut tx = store.begin().await.unwrap();
        assert_eq!(tx.count_products().await.unwrap(), 1);
        assert_eq!(tx.list_suppliers().await.unwrap().len(), 1);
        let stock = tx.list_stock_views().await.unwrap();
        assert_eq!(stock[0].product_code, "PROD001");
        assert_eq!(stock[0].quantity, 50);
        assert_eq!(tx.list_configuration_views().await.unwrap()[0].planning_months, 6);
    }
}
