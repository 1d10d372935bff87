use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::models::{
    Customer, CustomerPatch, ListQuery, NewCustomerRecord, TenantStats,
};

/// Error type for repository operations.
///
/// Unique-constraint violations are reported distinctly from
/// connectivity/query failures so the service can map them to a
/// conflict instead of a generic database error.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Query failed: {0}")]
    QueryFailed(#[from] sqlx::Error),

    #[error("Unique constraint violated for email: {0}")]
    UniqueViolation(String),

    #[error("Row decode failed: {0}")]
    Decode(String),

    #[error("Empty patch: no fields to update")]
    EmptyPatch,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Repository interface for customer persistence.
///
/// Every operation is scoped by `tenant_id`; implementations must never
/// return rows belonging to another tenant. The repository is the only
/// component that ever sees `password_hash`.
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a new customer and return the stored row.
    ///
    /// Returns `RepositoryError::UniqueViolation` when another live
    /// customer already holds `(tenant_id, email)`.
    async fn insert(&self, record: NewCustomerRecord) -> RepositoryResult<Customer>;

    /// Fetch one customer by id within a tenant. `Ok(None)` when no row
    /// matches the id+tenant scope.
    async fn find(&self, id: Uuid, tenant_id: &str) -> RepositoryResult<Option<Customer>>;

    /// Fast existence probe for the create pre-check. Case-insensitive
    /// on the email, mirroring the store's uniqueness collation.
    async fn email_exists(&self, tenant_id: &str, email: &str) -> RepositoryResult<bool>;

    /// Fetch one page of customers plus the total count matching the
    /// same filter predicate.
    async fn list(&self, query: &ListQuery) -> RepositoryResult<(Vec<Customer>, i64)>;

    /// Apply a partial update to the whitelisted mutable columns and
    /// return the updated row. `Ok(None)` when no row matches the
    /// id+tenant scope.
    async fn apply_patch(
        &self,
        id: Uuid,
        tenant_id: &str,
        patch: &CustomerPatch,
    ) -> RepositoryResult<Option<Customer>>;

    /// Aggregate counters over all of a tenant's customers.
    async fn tenant_stats(&self, tenant_id: &str) -> RepositoryResult<TenantStats>;
}
