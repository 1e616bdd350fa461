pub mod cart_store;
pub mod export_source;
pub mod models;
pub mod order_repo;
