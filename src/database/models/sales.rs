use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TopProduct {
    #[serde(rename = "ProductKey")]
    #[sqlx(rename = "ProductKey")]
    pub product_key: i64,
    #[serde(rename = "ProductName")]
    #[sqlx(rename = "ProductName")]
    pub product_name: String,
    pub total_sales: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BestCustomer {
    #[serde(rename = "CustomerKey")]
    #[sqlx(rename = "CustomerKey")]
    pub customer_key: i64,
    #[serde(rename = "FirstName")]
    #[sqlx(rename = "FirstName")]
    pub first_name: String,
    #[serde(rename = "LastName")]
    #[sqlx(rename = "LastName")]
    pub last_name: String,
    pub total_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct BusiestMonth {
    pub month: i32,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct TerritoryRevenue {
    #[serde(rename = "TerritoryKey")]
    #[sqlx(rename = "TerritoryKey")]
    pub territory_key: i64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub customer_key: i64,
    pub first_name: String,
    pub last_name: String,
}

/// One row of a `sales_<year>` table.
#[derive(Debug, Clone, PartialEq)]
pub struct SaleLine {
    pub order_date: NaiveDate,
    pub product_key: i64,
    pub customer_key: i64,
    pub territory_key: i64,
}

/// Round to cents the way the report queries do.
pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
