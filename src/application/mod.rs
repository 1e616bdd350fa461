pub mod cart_service;
pub mod checkout_service;
pub mod export_service;
pub mod invoice_service;
