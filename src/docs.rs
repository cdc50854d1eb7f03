// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "OPME Stock API", description = "Controle de estoque de materiais OPME"),
    paths(
        // --- Suppliers ---
        handlers::suppliers::list_suppliers,
        handlers::suppliers::get_supplier,
        handlers::suppliers::create_supplier,
        handlers::suppliers::update_supplier,
        handlers::suppliers::delete_supplier,
        handlers::suppliers::toggle_supplier_status,

        // --- Brands ---
        handlers::brands::list_brands,
        handlers::brands::get_brand,
        handlers::brands::create_brand,
        handlers::brands::update_brand,
        handlers::brands::delete_brand,
        handlers::brands::toggle_brand_status,

        // --- Products ---
        handlers::products::list_products,
        handlers::products::list_active_products,
        handlers::products::get_product,
        handlers::products::create_product,
        handlers::products::update_product,
        handlers::products::delete_product,
        handlers::products::toggle_product_status,

        // --- Stock ---
        handlers::stock::list_stock,
        handlers::stock::list_low_stock,
        handlers::stock::get_stock_by_product,
        handlers::stock::set_stock,
        handlers::stock::add_stock,
        handlers::stock::reduce_stock,

        // --- Stock Outputs ---
        handlers::stock_outputs::list_outputs,
        handlers::stock_outputs::list_recent_outputs,
        handlers::stock_outputs::list_outputs_by_date_range,
        handlers::stock_outputs::list_outputs_by_product,
        handlers::stock_outputs::get_output,
        handlers::stock_outputs::create_output,
        handlers::stock_outputs::update_output,
        handlers::stock_outputs::delete_output,

        // --- Supplier Configurations ---
        handlers::supplier_configurations::list_configurations,
        handlers::supplier_configurations::get_configuration,
        handlers::supplier_configurations::get_configuration_by_supplier,
        handlers::supplier_configurations::create_configuration,
        handlers::supplier_configurations::update_configuration,
        handlers::supplier_configurations::delete_configuration,
        handlers::supplier_configurations::toggle_configuration_status,
        handlers::supplier_configurations::get_reorder_plan,
    ),
    components(
        schemas(
            // --- Cadastros ---
            models::supplier::Supplier,
            models::brand::Brand,
            models::product::Product,
            models::product::ProductView,

            // --- Estoque ---
            models::stock::CurrentStock,
            models::stock::StockView,
            models::stock_output::StockOutput,
            models::stock_output::StockOutputView,

            // --- Planejamento ---
            models::supplier_configuration::SupplierConfiguration,
            models::supplier_configuration::SupplierConfigurationView,
            models::supplier_configuration::ReorderPlan,

            // --- Payloads ---
            handlers::suppliers::CreateSupplierPayload,
            handlers::suppliers::UpdateSupplierPayload,
            handlers::brands::BrandPayload,
            handlers::products::CreateProductPayload,
            handlers::products::UpdateProductPayload,
            handlers::stock::StockMovementPayload,
            handlers::stock::SetStockPayload,
            handlers::stock_outputs::CreateStockOutputPayload,
            handlers::stock_outputs::UpdateStockOutputPayload,
            handlers::supplier_configurations::CreateSupplierConfigurationPayload,
            handlers::supplier_configurations::UpdateSupplierConfigurationPayload,
        )
    ),
    tags(
        (name = "Suppliers", description = "Cadastro de Fornecedores"),
        (name = "Brands", description = "Cadastro de Marcas"),
        (name = "Products", description = "Produtos OPME"),
        (name = "Stock", description = "Saldo Atual por Produto"),
        (name = "Stock Outputs", description = "Saídas de Material (Consumo)"),
        (name = "Supplier Configurations", description = "Planejamento de Reposição por Fornecedor")
    )
)]
pub struct ApiDoc;
