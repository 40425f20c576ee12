use super::types::QuerySort;

pub struct FilterOrder;

impl FilterOrder {
    /// The sort field is interpolated, so it must come from a `ResourceSchema`.
    pub fn generate(sort: Option<&QuerySort>) -> String {
        match sort {
            Some(sort) => format!("ORDER BY \"{}\" ASC", sort.field),
            None => String::new(),
        }
    }
}
