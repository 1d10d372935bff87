//! Deterministic cache key construction.
//!
//! List keys are namespaced under `customers:list:{tenant}:` so a
//! single prefix delete invalidates every cached page for a tenant
//! after a write. `:` is the segment separator; variable segments are
//! escaped so distinct inputs can never produce the same key.

use uuid::Uuid;

use crate::domain::models::ListQuery;

/// Escape the separator inside a variable key segment.
fn encode_segment(segment: &str) -> String {
    segment.replace('\\', "\\\\").replace(':', "\\:")
}

/// Key for one cached list page: tenant + search + limit + offset.
pub fn list_page(query: &ListQuery) -> String {
    format!(
        "customers:list:{}:{}:{}:{}",
        encode_segment(&query.tenant_id),
        encode_segment(query.search.as_deref().unwrap_or("-")),
        query.limit,
        query.offset
    )
}

/// Prefix shared by every cached list page of a tenant.
pub fn list_prefix(tenant_id: &str) -> String {
    format!("customers:list:{}:", encode_segment(tenant_id))
}

/// Key for a cached single-customer lookup.
pub fn one(tenant_id: &str, id: Uuid) -> String {
    format!("customers:one:{}:{id}", encode_segment(tenant_id))
}

/// Key for a tenant's cached stats snapshot.
pub fn stats(tenant_id: &str) -> String {
    format!("customers:stats:{}", encode_segment(tenant_id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_key_shape() {
        let q = ListQuery::new("tenant-a", Some("Alice"), Some(25), Some(50));
        assert_eq!(list_page(&q), "customers:list:tenant-a:alice:25:50");
    }

    #[test]
    fn test_list_key_without_search() {
        let q = ListQuery::new("tenant-a", None, None, None);
        assert_eq!(list_page(&q), "customers:list:tenant-a:-:50:0");
    }

    #[test]
    fn test_list_keys_share_tenant_prefix() {
        let q1 = ListQuery::new("tenant-a", None, None, None);
        let q2 = ListQuery::new("tenant-a", Some("bob"), Some(10), Some(20));
        let prefix = list_prefix("tenant-a");

        assert!(list_page(&q1).starts_with(&prefix));
        assert!(list_page(&q2).starts_with(&prefix));
        assert!(!list_page(&ListQuery::new("tenant-b", None, None, None)).starts_with(&prefix));
    }

    #[test]
    fn test_separator_in_tenant_cannot_collide() {
        let q1 = ListQuery::new("a:b", None, None, None);
        let q2 = ListQuery::new("a", Some("b"), None, None);
        assert_ne!(list_page(&q1), list_page(&q2));
        assert_ne!(list_prefix("a:b"), list_prefix("a"));
    }
}
