pub mod brands;
pub mod products;
pub mod stock;
pub mod stock_outputs;
pub mod supplier_configurations;
pub mod suppliers;
