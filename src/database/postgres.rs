use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};

use crate::config::{DatabaseConfig, ReportsConfig};
use crate::database::manager::{DatabaseError, DatabaseManager};
use crate::database::models::{BestCustomer, BusiestMonth, Product, ProductBase, TerritoryRevenue, TopProduct};
use crate::database::query_builder;
use crate::database::reports;
use crate::database::repository::{not_found, ProductStore, SalesReports};
use crate::filter::ListingQuery;

const SELECT_ONE: &str = "SELECT * FROM \"products\" WHERE \"ProductKey\" = $1";

const INSERT: &str = "INSERT INTO \"products\" (\"ProductSubcategoryKey\", \"ProductSKU\", \"ProductName\", \
    \"ModelName\", \"ProductDescription\", \"ProductColor\", \"ProductSize\", \"ProductStyle\", \"ProductCost\", \
    \"ProductPrice\") VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING \"ProductKey\"";

const UPDATE: &str = "UPDATE \"products\" SET \"ProductSubcategoryKey\" = $1, \"ProductSKU\" = $2, \
    \"ProductName\" = $3, \"ModelName\" = $4, \"ProductDescription\" = $5, \"ProductColor\" = $6, \
    \"ProductSize\" = $7, \"ProductStyle\" = $8, \"ProductCost\" = $9, \"ProductPrice\" = $10 \
    WHERE \"ProductKey\" = $11";

const DELETE: &str = "DELETE FROM \"products\" WHERE \"ProductKey\" = $1";

/// PostgreSQL-backed store.
///
/// Expects `products."ProductKey"` as BIGINT (identity), `ProductSubcategoryKey`
/// as INTEGER and `ProductCost`/`ProductPrice` as DOUBLE PRECISION.
pub struct PgStore {
    pool: PgPool,
    reports: ReportsConfig,
    log_queries: bool,
}

impl PgStore {
    pub fn new(pool: PgPool, reports: ReportsConfig, log_queries: bool) -> Self {
        Self { pool, reports, log_queries }
    }

    pub async fn connect(database: &DatabaseConfig, reports: ReportsConfig) -> Result<Self, DatabaseError> {
        let pool = DatabaseManager::connect(database).await?;
        Ok(Self::new(pool, reports, database.enable_query_logging))
    }

    fn log_query(&self, sql: &str) {
        if self.log_queries {
            tracing::debug!(target: "products_api::sql", "{}", sql);
        }
    }

    /// Commit when `result` is Ok, roll back otherwise.
    async fn finish<T>(
        tx: Transaction<'static, Postgres>,
        result: Result<T, DatabaseError>,
    ) -> Result<T, DatabaseError> {
        match result {
            Ok(value) => {
                tx.commit().await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::error!("Rollback failed: {}", rollback_err);
                }
                Err(e)
            }
        }
    }
}

#[async_trait]
impl ProductStore for PgStore {
    async fn list(&self, query: &ListingQuery) -> Result<Vec<Product>, DatabaseError> {
        let sql = query.to_sql();
        self.log_query(&sql.query);
        let rows = query_builder::query_as::<Product>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    async fn get(&self, product_key: i64) -> Result<Product, DatabaseError> {
        self.log_query(SELECT_ONE);
        sqlx::query_as::<_, Product>(SELECT_ONE)
            .bind(product_key)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found(product_key))
    }

    async fn insert(&self, product: &ProductBase) -> Result<Product, DatabaseError> {
        self.log_query(INSERT);
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query_scalar::<_, i64>(INSERT)
            .bind(product.product_subcategory_key)
            .bind(&product.product_sku)
            .bind(&product.product_name)
            .bind(&product.model_name)
            .bind(&product.product_description)
            .bind(&product.product_color)
            .bind(&product.product_size)
            .bind(&product.product_style)
            .bind(product.product_cost)
            .bind(product.product_price)
            .fetch_one(&mut *tx)
            .await
            .map(|key| Product::new(key, product.clone()))
            .map_err(DatabaseError::from);
        Self::finish(tx, result).await
    }

    async fn update(&self, product_key: i64, product: &ProductBase) -> Result<Product, DatabaseError> {
        self.log_query(UPDATE);
        let mut tx = self.pool.begin().await?;
        let result = match sqlx::query(UPDATE)
            .bind(product.product_subcategory_key)
            .bind(&product.product_sku)
            .bind(&product.product_name)
            .bind(&product.model_name)
            .bind(&product.product_description)
            .bind(&product.product_color)
            .bind(&product.product_size)
            .bind(&product.product_style)
            .bind(product.product_cost)
            .bind(product.product_price)
            .bind(product_key)
            .execute(&mut *tx)
            .await
        {
            Ok(done) if done.rows_affected() == 0 => Err(not_found(product_key)),
            Ok(_) => Ok(Product::new(product_key, product.clone())),
            Err(e) => Err(e.into()),
        };
        Self::finish(tx, result).await
    }

    async fn delete(&self, product_key: i64) -> Result<(), DatabaseError> {
        self.log_query(DELETE);
        let mut tx = self.pool.begin().await?;
        let result = match sqlx::query(DELETE).bind(product_key).execute(&mut *tx).await {
            Ok(done) if done.rows_affected() == 0 => Err(not_found(product_key)),
            Ok(_) => Ok(()),
            Err(e) => Err(e.into()),
        };
        Self::finish(tx, result).await
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[async_trait]
impl SalesReports for PgStore {
    async fn top_products(&self, category: i32) -> Result<Vec<TopProduct>, DatabaseError> {
        let sql = reports::top_products_sql(&self.reports);
        self.log_query(&sql);
        Ok(sqlx::query_as::<_, TopProduct>(&sql).bind(category).fetch_all(&self.pool).await?)
    }

    async fn best_customer(&self) -> Result<Vec<BestCustomer>, DatabaseError> {
        let sql = reports::best_customer_sql(&self.reports);
        self.log_query(&sql);
        Ok(sqlx::query_as::<_, BestCustomer>(&sql).fetch_all(&self.pool).await?)
    }

    async fn busiest_month(&self) -> Result<Vec<BusiestMonth>, DatabaseError> {
        let sql = reports::busiest_month_sql(&self.reports);
        self.log_query(&sql);
        Ok(sqlx::query_as::<_, BusiestMonth>(&sql).fetch_all(&self.pool).await?)
    }

    async fn top_territories(&self) -> Result<Vec<TerritoryRevenue>, DatabaseError> {
        let sql = reports::top_territories_sql(&self.reports);
        self.log_query(&sql);
        Ok(sqlx::query_as::<_, TerritoryRevenue>(&sql).fetch_all(&self.pool).await?)
    }
}
