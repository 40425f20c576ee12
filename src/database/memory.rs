use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use tokio::sync::RwLock;

use crate::config::ReportsConfig;
use crate::database::manager::DatabaseError;
use crate::database::models::sales::round_cents;
use crate::database::models::{
    BestCustomer, BusiestMonth, Customer, Product, ProductBase, SaleLine, TerritoryRevenue, TopProduct,
};
use crate::database::repository::{not_found, ProductStore, SalesReports};
use crate::filter::filter_where::FilterWhere;
use crate::filter::ListingQuery;
use chrono::Datelike;

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<i64, Product>,
    /// ProductSubcategoryKey -> ProductCategoryKey
    subcategories: HashMap<i32, i32>,
    customers: BTreeMap<i64, Customer>,
    sales: BTreeMap<u16, Vec<SaleLine>>,
}

impl Tables {
    fn next_product_key(&self) -> i64 {
        self.products.keys().next_back().map_or(1, |k| k + 1)
    }

    fn price_of(&self, product_key: i64) -> Option<f64> {
        self.products.get(&product_key).map(|p| p.base.product_price)
    }

    fn sales_in<'a>(&'a self, years: &'a [u16]) -> impl Iterator<Item = &'a SaleLine> + 'a {
        years
            .iter()
            .filter_map(move |y| self.sales.get(y))
            .flat_map(|lines| lines.iter())
    }
}

/// Store kept entirely in process memory.
///
/// Used when no database is configured and by the test suite. A single write
/// lock per mutation gives the same all-or-nothing behavior as a transaction.
#[derive(Debug)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
    reports: ReportsConfig,
}

impl MemoryStore {
    pub fn new(reports: ReportsConfig) -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            reports,
        }
    }

    /// Insert a product with a fixed key, replacing any existing row.
    pub async fn seed_product(&self, product: Product) {
        self.tables.write().await.products.insert(product.product_key, product);
    }

    pub async fn seed_subcategory(&self, subcategory_key: i32, category_key: i32) {
        self.tables.write().await.subcategories.insert(subcategory_key, category_key);
    }

    pub async fn seed_customer(&self, customer: Customer) {
        self.tables.write().await.customers.insert(customer.customer_key, customer);
    }

    pub async fn seed_sale(&self, year: u16, line: SaleLine) {
        self.tables.write().await.sales.entry(year).or_default().push(line);
    }
}

#[async_trait]
impl ProductStore for MemoryStore {
    async fn list(&self, query: &ListingQuery) -> Result<Vec<Product>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<&Product> = tables.products.values().collect();

        if let Some(filter) = query.filter_clause() {
            rows.retain(|p| {
                p.field_value(filter.field)
                    .is_some_and(|v| FilterWhere::matches(&v.as_text(), &filter.pattern))
            });
        }

        if let Some(sort) = query.sort_clause() {
            rows.sort_by(|a, b| match (a.field_value(sort.field), b.field_value(sort.field)) {
                (Some(x), Some(y)) => x.compare(&y),
                _ => std::cmp::Ordering::Equal,
            });
        }

        let rows = rows.into_iter().cloned();
        let out: Vec<Product> = match query.page() {
            Some(page) => rows
                .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
                .take(usize::try_from(page.limit).unwrap_or(usize::MAX))
                .collect(),
            None => rows.collect(),
        };
        Ok(out)
    }

    async fn get(&self, product_key: i64) -> Result<Product, DatabaseError> {
        self.tables
            .read()
            .await
            .products
            .get(&product_key)
            .cloned()
            .ok_or_else(|| not_found(product_key))
    }

    async fn insert(&self, product: &ProductBase) -> Result<Product, DatabaseError> {
        product.check_constraints().map_err(DatabaseError::Constraint)?;
        let mut tables = self.tables.write().await;
        let key = tables.next_product_key();
        let row = Product::new(key, product.clone());
        tables.products.insert(key, row.clone());
        Ok(row)
    }

    async fn update(&self, product_key: i64, product: &ProductBase) -> Result<Product, DatabaseError> {
        product.check_constraints().map_err(DatabaseError::Constraint)?;
        let mut tables = self.tables.write().await;
        let row = tables.products.get_mut(&product_key).ok_or_else(|| not_found(product_key))?;
        row.base = product.clone();
        Ok(row.clone())
    }

    async fn delete(&self, product_key: i64) -> Result<(), DatabaseError> {
        self.tables
            .write()
            .await
            .products
            .remove(&product_key)
            .map(|_| ())
            .ok_or_else(|| not_found(product_key))
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}

#[async_trait]
impl SalesReports for MemoryStore {
    async fn top_products(&self, category: i32) -> Result<Vec<TopProduct>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for line in tables.sales_in(&self.reports.sales_years) {
            let Some(product) = tables.products.get(&line.product_key) else { continue };
            let in_category = tables
                .subcategories
                .get(&product.base.product_subcategory_key)
                .is_some_and(|c| *c == category);
            if in_category {
                *counts.entry(product.product_key).or_default() += 1;
            }
        }

        let mut out: Vec<TopProduct> = counts
            .into_iter()
            .filter_map(|(key, total_sales)| {
                tables.products.get(&key).map(|p| TopProduct {
                    product_key: key,
                    product_name: p.base.product_name.clone(),
                    total_sales,
                })
            })
            .collect();
        out.sort_by(|a, b| b.total_sales.cmp(&a.total_sales).then(a.product_key.cmp(&b.product_key)));
        out.truncate(10);
        Ok(out)
    }

    async fn best_customer(&self) -> Result<Vec<BestCustomer>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
        for line in tables.sales_in(&self.reports.sales_years) {
            if tables.customers.contains_key(&line.customer_key) {
                *counts.entry(line.customer_key).or_default() += 1;
            }
        }

        // Ties go to the lowest key, matching the SQL ordering.
        let best = counts
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.cmp(&a.0)));

        Ok(best
            .and_then(|(key, total_orders)| {
                tables.customers.get(&key).map(|c| BestCustomer {
                    customer_key: key,
                    first_name: c.first_name.clone(),
                    last_name: c.last_name.clone(),
                    total_orders,
                })
            })
            .into_iter()
            .collect())
    }

    async fn busiest_month(&self) -> Result<Vec<BusiestMonth>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut revenue: BTreeMap<u32, f64> = BTreeMap::new();
        for line in tables.sales_in(&self.reports.sales_years) {
            if let Some(price) = tables.price_of(line.product_key) {
                *revenue.entry(line.order_date.month()).or_default() += price;
            }
        }

        let best = revenue.into_iter().fold(None::<(u32, f64)>, |best, (month, total)| match best {
            Some((_, top)) if top >= total => best,
            _ => Some((month, total)),
        });

        Ok(best
            .map(|(month, total)| BusiestMonth {
                month: month as i32,
                total_revenue: round_cents(total),
            })
            .into_iter()
            .collect())
    }

    async fn top_territories(&self) -> Result<Vec<TerritoryRevenue>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut revenue: BTreeMap<i64, f64> = BTreeMap::new();
        for line in tables.sales_in(std::slice::from_ref(&self.reports.territory_year)) {
            if let Some(price) = tables.price_of(line.product_key) {
                *revenue.entry(line.territory_key).or_default() += price;
            }
        }
        if revenue.is_empty() {
            return Ok(vec![]);
        }

        // Compared in cents, matching the SQL cutoff
        let average = round_cents(revenue.values().sum::<f64>()) / revenue.len() as f64;
        let mut out: Vec<TerritoryRevenue> = revenue
            .into_iter()
            .filter(|(_, total)| round_cents(*total) >= average)
            .map(|(territory_key, total)| TerritoryRevenue {
                territory_key,
                revenue: round_cents(total),
            })
            .collect();
        out.sort_by(|a, b| {
            b.revenue
                .partial_cmp(&a.revenue)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.territory_key.cmp(&b.territory_key))
        });
        Ok(out)
    }
}
