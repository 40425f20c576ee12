use super::types::{QueryFilter, SqlParam};

pub struct FilterWhere;

impl FilterWhere {
    /// Render the substring condition using placeholder `$param_index`.
    ///
    /// The column is cast to text so numeric fields can be searched too.
    pub fn generate(filter: &QueryFilter, param_index: usize) -> (String, SqlParam) {
        let clause = format!("CAST(\"{}\" AS TEXT) LIKE ${}", filter.field, param_index);
        (clause, SqlParam::Text(Self::like_pattern(&filter.pattern)))
    }

    /// Wrap `pattern` as `%pattern%` with LIKE metacharacters escaped.
    pub fn like_pattern(pattern: &str) -> String {
        let mut out = String::with_capacity(pattern.len() + 2);
        out.push('%');
        for c in pattern.chars() {
            if matches!(c, '%' | '_' | '\\') {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('%');
        out
    }

    /// In-memory equivalent of the generated LIKE condition.
    pub fn matches(value: &str, pattern: &str) -> bool {
        value.contains(pattern)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wraps_pattern_in_wildcards() {
        assert_eq!(FilterWhere::like_pattern("Road"), "%Road%");
        assert_eq!(FilterWhere::like_pattern(""), "%%");
    }

    #[test]
    fn escapes_like_metacharacters() {
        assert_eq!(FilterWhere::like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }

    #[test]
    fn binds_pattern_instead_of_interpolating() {
        let filter = QueryFilter { field: "ProductName", pattern: "x' OR '1'='1".to_string() };
        let (clause, param) = FilterWhere::generate(&filter, 1);
        assert_eq!(clause, "CAST(\"ProductName\" AS TEXT) LIKE $1");
        assert!(!clause.contains("OR"));
        assert_eq!(param, SqlParam::Text("%x' OR '1'='1%".to_string()));
    }
}
