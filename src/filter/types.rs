use serde::Deserialize;

/// Static description of a listable resource: its table and the only field
/// names that may appear in a filter or an ORDER BY.
#[derive(Debug, Clone, Copy)]
pub struct ResourceSchema {
    pub table: &'static str,
    pub fields: &'static [&'static str],
}

impl ResourceSchema {
    /// Returns the schema's own copy of `field` when it is allow-listed.
    pub fn field(&self, field: &str) -> Option<&'static str> {
        self.fields.iter().copied().find(|f| *f == field)
    }
}

/// Listing parameters as they arrive on the query string.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListingParams {
    #[serde(default)]
    pub page: i64,
    #[serde(default)]
    pub page_size: i64,
    #[serde(rename = "typeFilter")]
    pub type_filter: Option<String>,
    #[serde(rename = "searchFilter")]
    pub search_filter: Option<String>,
    #[serde(rename = "orderBy")]
    pub order_by: Option<String>,
}

/// Substring match of `pattern` against an allow-listed field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFilter {
    pub field: &'static str,
    pub pattern: String,
}

/// Ascending sort on an allow-listed field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySort {
    pub field: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryPage {
    pub limit: i64,
    pub offset: i64,
}

impl QueryPage {
    /// Both values must be positive for paging to apply.
    pub fn from_page(page: i64, page_size: i64) -> Option<Self> {
        if page > 0 && page_size > 0 {
            Some(Self {
                limit: page_size,
                offset: (page - 1).saturating_mul(page_size),
            })
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

#[derive(Debug, Clone)]
pub struct SqlResult {
    pub query: String,
    pub params: Vec<SqlParam>,
}
