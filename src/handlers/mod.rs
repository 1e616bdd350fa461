pub mod cart;
pub mod export;
pub mod invoice;
pub mod orders;
pub mod principal;
