// handlers/elevated/mod.rs - Elevated handlers (active admin required)
//
// Middleware: admin_middleware

pub mod products;

pub use products::{product_create, product_delete, product_update};
