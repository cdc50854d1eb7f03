pub mod brand_service;
pub mod product_service;
pub mod seed;
pub mod stock_output_service;
pub mod stock_service;
pub mod supplier_configuration_service;
pub mod supplier_service;

#[cfg(test)]
pub(crate) mod test_support;
