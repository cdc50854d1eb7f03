pub mod brand;
pub mod product;
pub mod stock;
pub mod stock_output;
pub mod supplier;
pub mod supplier_configuration;
