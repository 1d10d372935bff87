//! Dynamic statement construction for customer queries.
//!
//! Every builder returns statement text plus an ordered parameter list;
//! caller-supplied values are only ever bound as parameters, never
//! spliced into the SQL text.

use uuid::Uuid;

use crate::domain::models::{CustomerPatch, ListQuery};

/// Non-sensitive customer columns. `password_hash` is intentionally
/// excluded from every SELECT built here.
pub const CUSTOMER_COLUMNS: &str =
    "id, tenant_id, email, full_name, phone, address, loyalty_points, created_at, updated_at";

/// A positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Text(String),
    Int(i64),
}

/// Escape LIKE wildcards in a user-supplied search term. The produced
/// pattern is used with `ESCAPE '\'`.
fn escape_like(term: &str) -> String {
    term.replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Append the shared tenant + search predicate.
///
/// `build_list` and `build_count` both go through here so their WHERE
/// clauses cannot drift apart and `total` always matches the filtered
/// set.
fn push_filter(sql: &mut String, params: &mut Vec<SqlParam>, query: &ListQuery) {
    sql.push_str(" WHERE tenant_id = ?");
    params.push(SqlParam::Text(query.tenant_id.clone()));

    if let Some(search) = &query.search {
        let pattern = format!("%{}%", escape_like(search));
        sql.push_str(
            " AND (LOWER(email) LIKE ? ESCAPE '\\' \
             OR LOWER(COALESCE(full_name, '')) LIKE ? ESCAPE '\\')",
        );
        params.push(SqlParam::Text(pattern.clone()));
        params.push(SqlParam::Text(pattern));
    }
}

/// Build the paginated list SELECT for a tenant.
///
/// Ordering is newest-first with `id` as a tie-break so pages are
/// stable across requests. `query` is already normalized (limit
/// clamped to `1..=MAX_PAGE_SIZE`, offset non-negative).
pub fn build_list(query: &ListQuery) -> (String, Vec<SqlParam>) {
    let mut sql = format!("SELECT {CUSTOMER_COLUMNS} FROM customers");
    let mut params = Vec::new();

    push_filter(&mut sql, &mut params, query);

    sql.push_str(" ORDER BY created_at DESC, id LIMIT ? OFFSET ?");
    params.push(SqlParam::Int(query.limit));
    params.push(SqlParam::Int(query.offset));

    (sql, params)
}

/// Build the scalar COUNT sharing the list predicate.
pub fn build_count(query: &ListQuery) -> (String, Vec<SqlParam>) {
    let mut sql = String::from("SELECT COUNT(*) FROM customers");
    let mut params = Vec::new();

    push_filter(&mut sql, &mut params, query);

    (sql, params)
}

/// Build a dynamic UPDATE touching only the patch's supplied fields,
/// plus an unconditional `updated_at` refresh, scoped by id AND tenant.
///
/// Returns `None` for an empty patch: no statement is emitted.
pub fn build_update(
    id: Uuid,
    tenant_id: &str,
    patch: &CustomerPatch,
    updated_at: &str,
) -> Option<(String, Vec<SqlParam>)> {
    if patch.is_empty() {
        return None;
    }

    let mut assignments = Vec::new();
    let mut params = Vec::new();

    if let Some(full_name) = &patch.full_name {
        assignments.push("full_name = ?");
        params.push(SqlParam::Text(full_name.clone()));
    }
    if let Some(phone) = &patch.phone {
        assignments.push("phone = ?");
        params.push(SqlParam::Text(phone.clone()));
    }
    if let Some(address) = &patch.address {
        assignments.push("address = ?");
        params.push(SqlParam::Text(address.to_string()));
    }
    if let Some(points) = patch.loyalty_points {
        assignments.push("loyalty_points = ?");
        params.push(SqlParam::Int(points));
    }

    assignments.push("updated_at = ?");
    params.push(SqlParam::Text(updated_at.to_string()));

    let sql = format!(
        "UPDATE customers SET {} WHERE id = ? AND tenant_id = ?",
        assignments.join(", ")
    );
    params.push(SqlParam::Text(id.to_string()));
    params.push(SqlParam::Text(tenant_id.to_string()));

    Some((sql, params))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(search: Option<&str>) -> ListQuery {
        ListQuery::new("tenant-a", search, Some(25), Some(50))
    }

    #[test]
    fn test_list_without_search() {
        let (sql, params) = build_list(&query(None));
        assert_eq!(
            sql,
            format!(
                "SELECT {CUSTOMER_COLUMNS} FROM customers WHERE tenant_id = ? \
                 ORDER BY created_at DESC, id LIMIT ? OFFSET ?"
            )
        );
        assert_eq!(
            params,
            vec![
                SqlParam::Text("tenant-a".to_string()),
                SqlParam::Int(25),
                SqlParam::Int(50),
            ]
        );
    }

    #[test]
    fn test_list_with_search_binds_pattern() {
        let (sql, params) = build_list(&query(Some("Alice")));
        assert!(sql.contains("LOWER(email) LIKE ? ESCAPE '\\'"));
        assert!(sql.contains("LOWER(COALESCE(full_name, '')) LIKE ? ESCAPE '\\'"));
        // Normalized term is bound twice, never interpolated
        assert!(!sql.contains("alice"));
        assert_eq!(params[1], SqlParam::Text("%alice%".to_string()));
        assert_eq!(params[2], SqlParam::Text("%alice%".to_string()));
    }

    #[test]
    fn test_search_wildcards_are_escaped() {
        let (_, params) = build_list(&query(Some("50%_off")));
        assert_eq!(params[1], SqlParam::Text("%50\\%\\_off%".to_string()));
    }

    #[test]
    fn test_count_shares_list_predicate() {
        let q = query(Some("bob"));
        let (list_sql, list_params) = build_list(&q);
        let (count_sql, count_params) = build_count(&q);

        let list_where = list_sql
            .split(" WHERE ")
            .nth(1)
            .unwrap()
            .split(" ORDER BY ")
            .next()
            .unwrap();
        let count_where = count_sql.split(" WHERE ").nth(1).unwrap();
        assert_eq!(list_where, count_where);

        // Count params are the list params minus limit/offset
        assert_eq!(count_params, list_params[..list_params.len() - 2]);
    }

    #[test]
    fn test_update_touches_only_supplied_fields() {
        let patch = CustomerPatch {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        let id = Uuid::new_v4();
        let (sql, params) =
            build_update(id, "tenant-a", &patch, "2024-01-01T00:00:00Z").unwrap();

        assert_eq!(
            sql,
            "UPDATE customers SET phone = ?, updated_at = ? WHERE id = ? AND tenant_id = ?"
        );
        assert!(!sql.contains("full_name"));
        assert!(!sql.contains("loyalty_points"));
        assert_eq!(params.len(), 4);
        assert_eq!(params[0], SqlParam::Text("555-0100".to_string()));
    }

    #[test]
    fn test_update_all_fields() {
        let patch = CustomerPatch {
            full_name: Some("Alice Smith".to_string()),
            phone: Some("555-0100".to_string()),
            address: Some(serde_json::json!({"city": "Springfield"})),
            loyalty_points: Some(40),
        };
        let (sql, params) =
            build_update(Uuid::new_v4(), "tenant-a", &patch, "2024-01-01T00:00:00Z").unwrap();

        assert!(sql.starts_with(
            "UPDATE customers SET full_name = ?, phone = ?, address = ?, loyalty_points = ?, updated_at = ?"
        ));
        assert_eq!(params.len(), 7);
        assert_eq!(params[3], SqlParam::Int(40));
    }

    #[test]
    fn test_update_empty_patch_emits_nothing() {
        let patch = CustomerPatch::default();
        assert!(build_update(Uuid::new_v4(), "tenant-a", &patch, "now").is_none());
    }
}
