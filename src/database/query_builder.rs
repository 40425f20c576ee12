use sqlx::{self, postgres::PgArguments, FromRow};

use crate::filter::{SqlParam, SqlResult};

/// Prepare a typed query from a rendered template, binding parameters in order.
pub fn query_as<'q, O>(sql: &'q SqlResult) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    let mut q = sqlx::query_as::<_, O>(&sql.query);
    for p in sql.params.iter() {
        q = bind_param_query_as(q, p);
    }
    q
}

fn bind_param_query_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>,
    v: &'q SqlParam,
) -> sqlx::query::QueryAs<'q, sqlx::Postgres, O, PgArguments>
where
    O: for<'r> FromRow<'r, sqlx::postgres::PgRow>,
{
    match v {
        SqlParam::Text(s) => q.bind(s.as_str()),
        SqlParam::Int(i) => q.bind(*i),
    }
}
