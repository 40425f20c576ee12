pub mod product;
pub mod sales;

pub use product::{FieldValue, Product, ProductBase};
pub use sales::{BestCustomer, BusiestMonth, Customer, SaleLine, TerritoryRevenue, TopProduct};
