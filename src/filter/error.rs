use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    #[error("Invalid table name: {0}")]
    InvalidTableName(String),

    #[error("Filter not in {table} table: {field}")]
    InvalidFilterField { table: String, field: String },

    #[error("Order not in {table} table: {field}")]
    InvalidSortField { table: String, field: String },
}
