// src/config.rs

use std::{env, str::FromStr, sync::Arc};

use anyhow::{bail, Context};

use crate::{
    common::i18n::I18nStore,
    db::{postgres, MemoryStore, PgStore, Store},
    services::{
        brand_service::BrandService, product_service::ProductService, stock_output_service::StockOutputService,
        stock_service::StockService, supplier_configuration_service::SupplierConfigurationService,
        supplier_service::SupplierService,
    },
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Postgres,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            "memory" => Ok(StorageBackend::Memory),
            other => bail!("STORAGE_BACKEND inválido: '{other}' (use 'postgres' ou 'memory')"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub db_max_connections: u32,
    pub server_addr: String,
    pub low_stock_threshold: i32,
    pub seed_database: bool,
}

impl Settings {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let storage_backend: StorageBackend = get("STORAGE_BACKEND", "postgres").parse()?;
        let database_url = lookup("DATABASE_URL");
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            bail!("DATABASE_URL deve ser definida quando STORAGE_BACKEND=postgres");
        }

        Ok(Self {
            storage_backend,
            database_url,
            db_max_connections: get("DB_MAX_CONNECTIONS", "5")
                .parse()
                .context("DB_MAX_CONNECTIONS deve ser um número")?,
            server_addr: get("SERVER_ADDR", "0.0.0.0:3000"),
            low_stock_threshold: get("LOW_STOCK_THRESHOLD", "10")
                .parse()
                .context("LOW_STOCK_THRESHOLD deve ser um número")?,
            seed_database: get("SEED_DATABASE", "true")
                .parse()
                .context("SEED_DATABASE deve ser 'true' ou 'false'")?,
        })
    }
}

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub i18n_store: I18nStore,
    pub supplier_service: SupplierService,
    pub brand_service: BrandService,
    pub product_service: ProductService,
    pub stock_service: StockService,
    pub stock_output_service: StockOutputService,
    pub supplier_configuration_service: SupplierConfigurationService,
}

impl AppState {
    pub async fn new(settings: &Settings) -> anyhow::Result<Self> {
        let store: Arc<dyn Store> = match settings.storage_backend {
            StorageBackend::Postgres => {
                let url = settings
                    .database_url
                    .as_deref()
                    .context("DATABASE_URL deve ser definida")?;
                let pool = postgres::connect(url, settings.db_max_connections).await?;
                Arc::new(PgStore::new(pool))
            }
            StorageBackend::Memory => {
                tracing::warn!("Usando armazenamento em memória: os dados somem ao reiniciar");
                Arc::new(MemoryStore::new())
            }
        };

        Ok(Self::from_store(store, settings.low_stock_threshold))
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_store(store: Arc<dyn Store>, low_stock_threshold: i32) -> Self {
        Self {
            supplier_service: SupplierService::new(store.clone()),
            brand_service: BrandService::new(store.clone()),
            product_service: ProductService::new(store.clone()),
            stock_service: StockService::new(store.clone(), low_stock_threshold),
            stock_output_service: StockOutputService::new(store.clone(), low_stock_threshold),
            supplier_configuration_service: SupplierConfigurationService::new(store.clone()),
            i18n_store: I18nStore::new(),
            store,
        }
    }
}
