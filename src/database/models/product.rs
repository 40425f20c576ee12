use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::filter::ResourceSchema;

/// Writable attributes of a product, as submitted by clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "PascalCase")]
#[sqlx(rename_all = "PascalCase")]
pub struct ProductBase {
    pub product_subcategory_key: i32,
    #[serde(rename = "ProductSKU")]
    #[sqlx(rename = "ProductSKU")]
    pub product_sku: String,
    pub product_name: String,
    pub model_name: String,
    pub product_description: String,
    pub product_color: String,
    pub product_size: String,
    pub product_style: String,
    pub product_cost: f64,
    pub product_price: f64,
}

/// A stored product: its key plus the writable attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Product {
    #[serde(rename = "ProductKey")]
    #[sqlx(rename = "ProductKey")]
    pub product_key: i64,
    #[serde(flatten)]
    #[sqlx(flatten)]
    pub base: ProductBase,
}

/// Typed value of a single product column, used by the in-memory store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Int(i64),
    Float(f64),
    Text(&'a str),
}

impl FieldValue<'_> {
    /// Text form matching what `CAST(column AS TEXT)` yields.
    pub fn as_text(&self) -> String {
        match self {
            FieldValue::Int(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Text(s) => s.to_string(),
        }
    }

    pub fn compare(&self, other: &Self) -> std::cmp::Ordering {
        use std::cmp::Ordering;
        match (self, other) {
            (FieldValue::Int(a), FieldValue::Int(b)) => a.cmp(b),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (FieldValue::Text(a), FieldValue::Text(b)) => a.cmp(b),
            _ => self.as_text().cmp(&other.as_text()),
        }
    }
}

impl Product {
    pub const TABLE: &'static str = "products";

    pub const FIELDS: &'static [&'static str] = &[
        "ProductKey",
        "ProductSubcategoryKey",
        "ProductSKU",
        "ProductName",
        "ModelName",
        "ProductDescription",
        "ProductColor",
        "ProductSize",
        "ProductStyle",
        "ProductCost",
        "ProductPrice",
    ];

    pub const SCHEMA: ResourceSchema = ResourceSchema {
        table: Self::TABLE,
        fields: Self::FIELDS,
    };

    pub fn new(product_key: i64, base: ProductBase) -> Self {
        Self { product_key, base }
    }

    pub fn field_value(&self, field: &str) -> Option<FieldValue<'_>> {
        let b = &self.base;
        let value = match field {
            "ProductKey" => FieldValue::Int(self.product_key),
            "ProductSubcategoryKey" => FieldValue::Int(b.product_subcategory_key as i64),
            "ProductSKU" => FieldValue::Text(&b.product_sku),
            "ProductName" => FieldValue::Text(&b.product_name),
            "ModelName" => FieldValue::Text(&b.model_name),
            "ProductDescription" => FieldValue::Text(&b.product_description),
            "ProductColor" => FieldValue::Text(&b.product_color),
            "ProductSize" => FieldValue::Text(&b.product_size),
            "ProductStyle" => FieldValue::Text(&b.product_style),
            "ProductCost" => FieldValue::Float(b.product_cost),
            "ProductPrice" => FieldValue::Float(b.product_price),
            _ => return None,
        };
        Some(value)
    }
}

impl ProductBase {
    /// Column constraints of the products table that the in-memory store enforces.
    pub fn check_constraints(&self) -> Result<(), String> {
        if self.product_style.chars().count() > 1 {
            return Err(format!(
                "ProductStyle must be at most one character, got '{}'",
                self.product_style
            ));
        }
        Ok(())
    }
}
