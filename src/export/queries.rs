//! Shared query construction for exports.

use sqlx::QueryBuilder;
use sqlx::Sqlite;

/// The column list both exporters select from `email_status`.
pub const SELECT_COLUMNS: &str =
    "SELECT es.id, es.email, es.domain, es.mx_records, es.mx_count, es.used_implicit_mx,
            es.verdict, es.smtp_code, es.smtp_message, es.probed_host, es.response_time,
            es.timestamp, es.run_id
     FROM email_status es";

/// Appends the WHERE clause for the optional export filters, plus the
/// ordering shared by all exporters.
pub fn build_where_clause(
    query_builder: &mut QueryBuilder<'_, Sqlite>,
    run_id: Option<&str>,
    domain: Option<&str>,
    verdict: Option<&str>,
    since: Option<i64>,
) {
    let mut has_where = false;
    if let Some(run_id) = run_id {
        query_builder.push(" WHERE es.run_id = ");
        query_builder.push_bind(run_id.to_string());
        has_where = true;
    }
    if let Some(domain) = domain {
        if has_where {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_where = true;
        }
        query_builder.push("es.domain = ");
        query_builder.push_bind(domain.to_string());
    }
    if let Some(verdict) = verdict {
        if has_where {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
            has_where = true;
        }
        query_builder.push("es.verdict = ");
        query_builder.push_bind(verdict.to_string());
    }
    if let Some(since) = since {
        if has_where {
            query_builder.push(" AND ");
        } else {
            query_builder.push(" WHERE ");
        }
        query_builder.push("es.timestamp >= ");
        query_builder.push_bind(since);
    }

    query_builder.push(" ORDER BY es.timestamp DESC");
}
