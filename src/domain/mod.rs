pub mod cart;
pub mod errors;
pub mod export;
pub mod invoice;
pub mod order;
pub mod ports;
