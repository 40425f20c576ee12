//! SQL for the fixed sales reports.
//!
//! Sales are split into one `sales_<year>` table per year. Years come from
//! configuration as integers, so the generated table names are safe to
//! interpolate. `OrderDate` is stored as `MM/DD/YYYY` text.

use crate::config::ReportsConfig;

fn sales_table(year: u16) -> String {
    format!("\"sales_{}\"", year)
}

fn union_all(years: &[u16], part: impl Fn(&str) -> String) -> String {
    years
        .iter()
        .map(|y| part(&sales_table(*y)))
        .collect::<Vec<_>>()
        .join(" UNION ALL ")
}

/// `$1` is the product category key.
pub fn top_products_sql(config: &ReportsConfig) -> String {
    let parts = union_all(&config.sales_years, |sales| {
        format!(
            "SELECT p.\"ProductKey\"::BIGINT AS \"ProductKey\", p.\"ProductName\", COUNT(*) AS sales \
             FROM \"products\" AS p \
             INNER JOIN \"product_subcategories\" AS ps ON ps.\"ProductSubcategoryKey\" = p.\"ProductSubcategoryKey\" \
             INNER JOIN {sales} AS s ON s.\"ProductKey\" = p.\"ProductKey\" \
             WHERE ps.\"ProductCategoryKey\" = $1 \
             GROUP BY p.\"ProductKey\", p.\"ProductName\""
        )
    });
    format!(
        "SELECT comb.\"ProductKey\", comb.\"ProductName\", SUM(comb.sales)::BIGINT AS total_sales \
         FROM ({parts}) AS comb \
         GROUP BY comb.\"ProductKey\", comb.\"ProductName\" \
         ORDER BY total_sales DESC, comb.\"ProductKey\" ASC LIMIT 10"
    )
}

pub fn best_customer_sql(config: &ReportsConfig) -> String {
    let parts = union_all(&config.sales_years, |sales| {
        format!(
            "SELECT c.\"CustomerKey\"::BIGINT AS \"CustomerKey\", c.\"FirstName\", c.\"LastName\", COUNT(*) AS orders \
             FROM \"customers\" AS c \
             INNER JOIN {sales} AS s ON s.\"CustomerKey\" = c.\"CustomerKey\" \
             GROUP BY c.\"CustomerKey\", c.\"FirstName\", c.\"LastName\""
        )
    });
    format!(
        "SELECT comb.\"CustomerKey\", comb.\"FirstName\", comb.\"LastName\", SUM(comb.orders)::BIGINT AS total_orders \
         FROM ({parts}) AS comb \
         GROUP BY comb.\"CustomerKey\", comb.\"FirstName\", comb.\"LastName\" \
         ORDER BY total_orders DESC, comb.\"CustomerKey\" ASC LIMIT 1"
    )
}

pub fn busiest_month_sql(config: &ReportsConfig) -> String {
    let parts = union_all(&config.sales_years, |sales| {
        format!(
            "SELECT EXTRACT(MONTH FROM TO_DATE(s.\"OrderDate\", 'MM/DD/YYYY'))::INT AS month, p.\"ProductPrice\" AS revenue \
             FROM {sales} AS s \
             INNER JOIN \"products\" AS p ON p.\"ProductKey\" = s.\"ProductKey\""
        )
    });
    format!(
        "SELECT comb.month, ROUND(SUM(comb.revenue)::NUMERIC, 2)::DOUBLE PRECISION AS total_revenue \
         FROM ({parts}) AS comb \
         GROUP BY comb.month \
         ORDER BY total_revenue DESC, comb.month ASC LIMIT 1"
    )
}

pub fn top_territories_sql(config: &ReportsConfig) -> String {
    let sales = sales_table(config.territory_year);
    format!(
        "SELECT s.\"TerritoryKey\"::BIGINT AS \"TerritoryKey\", ROUND(SUM(p.\"ProductPrice\")::NUMERIC, 2)::DOUBLE PRECISION AS revenue \
         FROM {sales} AS s \
         INNER JOIN \"products\" AS p ON p.\"ProductKey\" = s.\"ProductKey\" \
         GROUP BY s.\"TerritoryKey\" \
         HAVING ROUND(SUM(p.\"ProductPrice\")::NUMERIC, 2) >= ( \
             SELECT ROUND(SUM(p2.\"ProductPrice\")::NUMERIC, 2) / COUNT(DISTINCT s2.\"TerritoryKey\") \
             FROM {sales} AS s2 \
             INNER JOIN \"products\" AS p2 ON p2.\"ProductKey\" = s2.\"ProductKey\" \
         ) \
         ORDER BY revenue DESC, \"TerritoryKey\" ASC"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> ReportsConfig {
        ReportsConfig { sales_years: vec![2016, 2017], territory_year: 2017 }
    }

    #[test]
    fn unions_one_part_per_year() {
        let sql = top_products_sql(&config());
        assert_eq!(sql.matches("UNION ALL").count(), 1);
        assert!(sql.contains("\"sales_2016\""));
        assert!(sql.contains("\"sales_2017\""));
        assert!(!sql.contains("sales_2015"));
        assert!(sql.ends_with("LIMIT 10"));
    }

    #[test]
    fn category_is_bound_not_interpolated() {
        let sql = top_products_sql(&config());
        assert!(sql.contains("\"ProductCategoryKey\" = $1"));
        assert!(!sql.contains("$2"));
    }

    #[test]
    fn single_row_reports_limit_one() {
        assert!(best_customer_sql(&config()).ends_with("LIMIT 1"));
        assert!(busiest_month_sql(&config()).ends_with("LIMIT 1"));
    }

    #[test]
    fn territories_use_configured_year_only() {
        let sql = top_territories_sql(&ReportsConfig { sales_years: vec![2015], territory_year: 2016 });
        assert!(sql.contains("\"sales_2016\""));
        assert!(!sql.contains("sales_2015"));
    }

    #[test]
    fn territory_cutoff_compares_rounded_sums() {
        let sql = top_territories_sql(&config());
        assert!(sql.contains("HAVING ROUND(SUM(p.\"ProductPrice\")::NUMERIC, 2) >="));
        assert!(sql.contains("SELECT ROUND(SUM(p2.\"ProductPrice\")::NUMERIC, 2) / COUNT(DISTINCT s2.\"TerritoryKey\")"));
    }
}
