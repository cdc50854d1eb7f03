// src/services/test_support.rs

use std::sync::Arc;

use crate::{
    db::{
        store::{BrandRepository, ProductRepository, StockRepository, SupplierRepository},
        MemoryStore, Store,
    },
    models::{brand::Brand, product::Product, stock::CurrentStock, supplier::Supplier},
};

pub struct Fixture {
    pub store: Arc<dyn Store>,
    pub supplier: Supplier,
    pub brand: Brand,
}

/// Store em memória já com um fornecedor e uma marca.
pub async fn fixture() -> Fixture {
    let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
    let supplier = Supplier::new(
        "MedSupply Brasil",
        "12.345.678/0001-90",
        "(11) 3456-7890",
        "contato@medsupply.com.br",
    )
    .unwrap();
    let brand = Brand::new("MedTech").unwrap();

    let mut tx = store.begin().await.unwrap();
    tx.insert_supplier(&supplier).await.unwrap();
    tx.insert_brand(&brand).await.unwrap();
    tx.commit().await.unwrap();

    Fixture { store, supplier, brand }
}

impl Fixture {
    pub async fn product_with_stock(&self, code: &str, quantity: i32) -> Product {
        let product = Product::new(code, &format!("Produto {code}"), self.supplier.id, self.brand.id).unwrap();
        let stock = CurrentStock::new(product.id, quantity).unwrap();

        let mut tx = self.store.begin().await.unwrap();
        tx.insert_product(&product).await.unwrap();
        tx.insert_stock(&stock).await.unwrap();
        tx.commit().await.unwrap();
        product
    }
}
