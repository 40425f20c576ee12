use super::error::FilterError;
use super::filter_order::FilterOrder;
use super::filter_where::FilterWhere;
use super::types::{ListingParams, QueryFilter, QueryPage, QuerySort, ResourceSchema, SqlParam, SqlResult};

/// A validated listing request over one resource.
///
/// Every identifier it carries was taken from the resource's allow-list, so
/// rendering it to SQL cannot fail.
#[derive(Debug, Clone)]
pub struct ListingQuery {
    schema: ResourceSchema,
    filter: Option<QueryFilter>,
    sort: Option<QuerySort>,
    page: Option<QueryPage>,
}

/// Validate the query-string parameters for `schema` and compose a listing.
///
/// `typeFilter` is checked whenever it is present; the filter itself only
/// applies when `searchFilter` is present as well.
pub fn build_listing_query(schema: &ResourceSchema, params: &ListingParams) -> Result<ListingQuery, FilterError> {
    let mut query = ListingQuery::new(schema)?;

    if let Some(field) = params.type_filter.as_deref() {
        match params.search_filter.as_deref() {
            Some(pattern) => {
                query.filter(field, pattern)?;
            }
            None => {
                query.allowed_filter_field(field)?;
            }
        }
    }

    if let Some(field) = params.order_by.as_deref() {
        query.order(field)?;
    }

    query.paginate(params.page, params.page_size);
    Ok(query)
}

impl ListingQuery {
    pub fn new(schema: &ResourceSchema) -> Result<Self, FilterError> {
        Self::validate_table_name(schema.table)?;
        Ok(Self {
            schema: *schema,
            filter: None,
            sort: None,
            page: None,
        })
    }

    pub fn filter(&mut self, field: &str, pattern: impl Into<String>) -> Result<&mut Self, FilterError> {
        let field = self.allowed_filter_field(field)?;
        self.filter = Some(QueryFilter { field, pattern: pattern.into() });
        Ok(self)
    }

    pub fn order(&mut self, field: &str) -> Result<&mut Self, FilterError> {
        let field = self.schema.field(field).ok_or_else(|| FilterError::InvalidSortField {
            table: self.schema.table.to_string(),
            field: field.to_string(),
        })?;
        self.sort = Some(QuerySort { field });
        Ok(self)
    }

    /// Applies LIMIT/OFFSET only when both values are positive.
    pub fn paginate(&mut self, page: i64, page_size: i64) -> &mut Self {
        self.page = QueryPage::from_page(page, page_size);
        self
    }

    pub fn table(&self) -> &'static str {
        self.schema.table
    }

    pub fn filter_clause(&self) -> Option<&QueryFilter> {
        self.filter.as_ref()
    }

    pub fn sort_clause(&self) -> Option<&QuerySort> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> Option<QueryPage> {
        self.page
    }

    /// Render the query template and its ordered bind parameters.
    pub fn to_sql(&self) -> SqlResult {
        let mut params = Vec::new();
        let mut parts = vec![format!("SELECT * FROM \"{}\"", self.schema.table)];

        if let Some(filter) = &self.filter {
            let (clause, param) = FilterWhere::generate(filter, params.len() + 1);
            params.push(param);
            parts.push(format!("WHERE {}", clause));
        }

        let order_clause = FilterOrder::generate(self.sort.as_ref());
        if !order_clause.is_empty() {
            parts.push(order_clause);
        }

        if let Some(page) = self.page {
            parts.push(format!("LIMIT ${} OFFSET ${}", params.len() + 1, params.len() + 2));
            params.push(SqlParam::Int(page.limit));
            params.push(SqlParam::Int(page.offset));
        }

        SqlResult { query: parts.join(" "), params }
    }

    fn allowed_filter_field(&self, field: &str) -> Result<&'static str, FilterError> {
        self.schema.field(field).ok_or_else(|| FilterError::InvalidFilterField {
            table: self.schema.table.to_string(),
            field: field.to_string(),
        })
    }

    fn validate_table_name(name: &str) -> Result<(), FilterError> {
        let mut chars = name.chars();
        let valid_start = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
        if !valid_start || !chars.all(|c| c.is_ascii_alphanumeric() || c == '_') {
            return Err(FilterError::InvalidTableName(name.to_string()));
        }
        Ok(())
    }
}
