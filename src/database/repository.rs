use async_trait::async_trait;

use crate::database::manager::DatabaseError;
use crate::database::models::{BestCustomer, BusiestMonth, Product, ProductBase, TerritoryRevenue, TopProduct};
use crate::filter::ListingQuery;

/// Data access for the products table.
///
/// Mutations are atomic: they either commit fully or leave the table unchanged.
/// A mutation that matches no row fails with `DatabaseError::NotFound`.
#[async_trait]
pub trait ProductStore: Send + Sync {
    async fn list(&self, query: &ListingQuery) -> Result<Vec<Product>, DatabaseError>;

    async fn get(&self, product_key: i64) -> Result<Product, DatabaseError>;

    async fn insert(&self, product: &ProductBase) -> Result<Product, DatabaseError>;

    async fn update(&self, product_key: i64, product: &ProductBase) -> Result<Product, DatabaseError>;

    async fn delete(&self, product_key: i64) -> Result<(), DatabaseError>;

    async fn health_check(&self) -> Result<(), DatabaseError>;
}

/// Fixed read-only reports over the yearly sales tables.
#[async_trait]
pub trait SalesReports: Send + Sync {
    /// Ten best-selling products of a category, by number of sale lines.
    async fn top_products(&self, category: i32) -> Result<Vec<TopProduct>, DatabaseError>;

    /// Customer with the most sale lines.
    async fn best_customer(&self) -> Result<Vec<BestCustomer>, DatabaseError>;

    /// Calendar month with the highest revenue across all years.
    async fn busiest_month(&self) -> Result<Vec<BusiestMonth>, DatabaseError>;

    /// Territories whose revenue is at least the per-territory average.
    async fn top_territories(&self) -> Result<Vec<TerritoryRevenue>, DatabaseError>;
}

pub(crate) fn not_found(product_key: i64) -> DatabaseError {
    DatabaseError::NotFound(format!("product {}", product_key))
}
