use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Default page size for list queries when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: i64 = 50;

/// Hard upper bound on page size. Callers asking for more are clamped.
pub const MAX_PAGE_SIZE: i64 = 200;

/// Customer entity scoped to a single tenant.
///
/// The stored `password_hash` column is deliberately absent from this
/// struct: it is write-only data that never crosses the repository
/// boundary on any read path, so neither cache entries nor HTTP
/// responses can leak it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    /// Unique customer identifier
    pub id: Uuid,

    /// Tenant partition key; all queries are scoped by it
    pub tenant_id: String,

    /// Email address, unique within the tenant
    pub email: String,

    /// Display name
    pub full_name: Option<String>,

    /// Contact phone number
    pub phone: Option<String>,

    /// Opaque structured address blob
    pub address: Option<serde_json::Value>,

    /// Loyalty point balance, never negative
    pub loyalty_points: i64,

    /// Creation timestamp, set by the store
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp, refreshed on every update
    pub updated_at: DateTime<Utc>,
}

/// Input for the create operation. `password` is hashed by the service
/// before it reaches the repository.
#[derive(Debug, Clone, Deserialize)]
pub struct NewCustomer {
    pub tenant_id: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
}

/// Repository-level create input: a `NewCustomer` with the password
/// already replaced by its hash.
#[derive(Debug, Clone)]
pub struct NewCustomerRecord {
    pub tenant_id: String,
    pub email: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<serde_json::Value>,
}

/// Partial update over the fixed set of mutable columns.
///
/// Modeled as a tagged set of optional fields rather than an open
/// mapping so only these four columns can ever be targeted by an
/// update statement, regardless of request payload shape.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CustomerPatch {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<serde_json::Value>,
    #[serde(default)]
    pub loyalty_points: Option<i64>,
}

impl CustomerPatch {
    /// True when no field is supplied. An empty patch is a validation
    /// error, not a no-op update.
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.loyalty_points.is_none()
    }
}

/// Normalized list-query parameters.
///
/// Construction clamps pagination and trims the search term, so both
/// the cache key and the SQL statement are derived from the same
/// normalized values and can never disagree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub tenant_id: String,
    /// Lowercased, trimmed search term; `None` when absent or blank.
    pub search: Option<String>,
    /// Page size, clamped to `1..=MAX_PAGE_SIZE`.
    pub limit: i64,
    /// Row offset, clamped to `>= 0`.
    pub offset: i64,
}

impl ListQuery {
    pub fn new(
        tenant_id: impl Into<String>,
        search: Option<&str>,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Self {
        let search = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        Self {
            tenant_id: tenant_id.into(),
            search,
            limit: limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}

/// One page of list results plus the total matching row count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerPage {
    pub customers: Vec<Customer>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Per-tenant aggregate counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenantStats {
    pub total_customers: i64,
    pub total_loyalty_points: i64,
    pub avg_loyalty_points: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_query_defaults() {
        let q = ListQuery::new("tenant-a", None, None, None);
        assert_eq!(q.limit, DEFAULT_PAGE_SIZE);
        assert_eq!(q.offset, 0);
        assert_eq!(q.search, None);
    }

    #[test]
    fn test_list_query_clamps_limit() {
        let q = ListQuery::new("tenant-a", None, Some(10_000), None);
        assert_eq!(q.limit, MAX_PAGE_SIZE);

        let q = ListQuery::new("tenant-a", None, Some(0), None);
        assert_eq!(q.limit, 1);

        let q = ListQuery::new("tenant-a", None, Some(-5), Some(-20));
        assert_eq!(q.limit, 1);
        assert_eq!(q.offset, 0);
    }

    #[test]
    fn test_list_query_normalizes_search() {
        let q = ListQuery::new("tenant-a", Some("  Alice "), None, None);
        assert_eq!(q.search.as_deref(), Some("alice"));

        let q = ListQuery::new("tenant-a", Some("   "), None, None);
        assert_eq!(q.search, None);
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(CustomerPatch::default().is_empty());

        let patch = CustomerPatch {
            phone: Some("555-0100".to_string()),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }
}
