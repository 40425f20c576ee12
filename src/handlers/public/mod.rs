// handlers/public/mod.rs - Public handlers (no authentication required)
//
// Security Level: None
// Middleware: None

pub mod products;
pub mod root;
pub mod sales;
pub mod token;

pub use products::{product_get, products_list};
pub use root::{health, root};
pub use sales::{best_customer, busiest_month, top_products, top_territories};
pub use token::token_post;
