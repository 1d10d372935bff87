//! Customer service implementing the cache-aside and invalidation
//! policy over the repository and cache ports.
//!
//! Reads consult the cache first and fall back to the store on miss;
//! writes hit the store first and then invalidate the affected keys.
//! Cache failures are logged and absorbed — a request never fails
//! because the cache is down.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

use crate::domain::errors::{ServiceError, ServiceResult};
use crate::domain::models::{
    CacheConfig, Customer, CustomerPage, CustomerPatch, ListQuery, NewCustomer, NewCustomerRecord,
    TenantStats,
};
use crate::domain::ports::{CacheStore, CustomerRepository};
use crate::services::cache_keys;

/// Per-operation cache lifetimes.
#[derive(Debug, Clone, Copy)]
pub struct CacheTtls {
    pub list: Duration,
    pub entity: Duration,
    pub stats: Duration,
}

impl From<&CacheConfig> for CacheTtls {
    fn from(config: &CacheConfig) -> Self {
        Self {
            list: Duration::from_secs(config.list_ttl_secs),
            entity: Duration::from_secs(config.entity_ttl_secs),
            stats: Duration::from_secs(config.stats_ttl_secs),
        }
    }
}

pub struct CustomerService<R: CustomerRepository, C: CacheStore> {
    repository: Arc<R>,
    cache: Arc<C>,
    ttls: CacheTtls,
}

impl<R: CustomerRepository, C: CacheStore> CustomerService<R, C> {
    pub fn new(repository: Arc<R>, cache: Arc<C>, config: &CacheConfig) -> Self {
        Self {
            repository,
            cache,
            ttls: CacheTtls::from(config),
        }
    }

    /// List one page of a tenant's customers, newest first.
    pub async fn list_customers(&self, query: ListQuery) -> ServiceResult<CustomerPage> {
        require_tenant(&query.tenant_id)?;

        let key = cache_keys::list_page(&query);
        if let Some(page) = self.cache_get::<CustomerPage>(&key).await {
            return Ok(page);
        }

        let (customers, total) = self.repository.list(&query).await?;
        let page = CustomerPage {
            customers,
            total,
            limit: query.limit,
            offset: query.offset,
        };

        self.cache_put(&key, &page, self.ttls.list).await;
        Ok(page)
    }

    /// Fetch a single customer by id within a tenant.
    pub async fn get_customer(&self, id: Uuid, tenant_id: &str) -> ServiceResult<Customer> {
        require_tenant(tenant_id)?;

        let key = cache_keys::one(tenant_id, id);
        if let Some(customer) = self.cache_get::<Customer>(&key).await {
            return Ok(customer);
        }

        let customer = self
            .repository
            .find(id, tenant_id)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        self.cache_put(&key, &customer, self.ttls.entity).await;
        Ok(customer)
    }

    /// Create a customer. Duplicate `(tenant_id, email)` yields a
    /// conflict: the pre-check catches it early, the store's unique
    /// constraint catches the race the pre-check cannot.
    pub async fn create_customer(&self, new: NewCustomer) -> ServiceResult<Customer> {
        let tenant_id = new.tenant_id.trim();
        let email = new.email.trim();
        require_tenant(tenant_id)?;
        if email.is_empty() {
            return Err(ServiceError::Validation("email is required".to_string()));
        }
        if new.password.trim().is_empty() {
            return Err(ServiceError::Validation("password is required".to_string()));
        }

        if self.repository.email_exists(tenant_id, email).await? {
            return Err(ServiceError::Conflict {
                email: email.to_string(),
            });
        }

        let record = NewCustomerRecord {
            tenant_id: tenant_id.to_string(),
            email: email.to_string(),
            password_hash: hash_password(&new.password)?,
            full_name: new.full_name,
            phone: new.phone,
            address: new.address,
        };

        let customer = self.repository.insert(record).await?;
        tracing::info!(customer_id = %customer.id, tenant_id, "customer created");

        self.invalidate_prefix(&cache_keys::list_prefix(tenant_id))
            .await;
        Ok(customer)
    }

    /// Apply a partial update to a customer's mutable fields.
    pub async fn update_customer(
        &self,
        id: Uuid,
        tenant_id: &str,
        patch: CustomerPatch,
    ) -> ServiceResult<Customer> {
        require_tenant(tenant_id)?;
        if patch.is_empty() {
            return Err(ServiceError::Validation(
                "update requires at least one field".to_string(),
            ));
        }
        if patch.loyalty_points.is_some_and(|points| points < 0) {
            return Err(ServiceError::Validation(
                "loyalty_points cannot be negative".to_string(),
            ));
        }

        let customer = self
            .repository
            .apply_patch(id, tenant_id, &patch)
            .await?
            .ok_or(ServiceError::NotFound(id))?;

        self.invalidate(&cache_keys::one(tenant_id, id)).await;
        self.invalidate_prefix(&cache_keys::list_prefix(tenant_id))
            .await;
        Ok(customer)
    }

    /// Aggregate counters for a tenant. Writes do not invalidate this
    /// snapshot; it is stale for at most its TTL.
    pub async fn tenant_stats(&self, tenant_id: &str) -> ServiceResult<TenantStats> {
        require_tenant(tenant_id)?;

        let key = cache_keys::stats(tenant_id);
        if let Some(stats) = self.cache_get::<TenantStats>(&key).await {
            return Ok(stats);
        }

        let stats = self.repository.tenant_stats(tenant_id).await?;
        self.cache_put(&key, &stats, self.ttls.stats).await;
        Ok(stats)
    }

    /// Read a cached value. Backend failures and corrupt payloads both
    /// degrade to a miss.
    async fn cache_get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        match self.cache.get(key).await {
            Ok(Some(payload)) => match serde_json::from_str(&payload) {
                Ok(value) => {
                    tracing::debug!(key, "cache hit");
                    Some(value)
                }
                Err(error) => {
                    tracing::warn!(key, %error, "discarding corrupt cache entry");
                    None
                }
            },
            Ok(None) => {
                tracing::debug!(key, "cache miss");
                None
            }
            Err(error) => {
                tracing::warn!(key, %error, "cache read failed, falling back to store");
                None
            }
        }
    }

    /// Write a value back after a miss. Best-effort.
    async fn cache_put<T: Serialize>(&self, key: &str, value: &T, ttl: Duration) {
        let payload = match serde_json::to_string(value) {
            Ok(payload) => payload,
            Err(error) => {
                tracing::warn!(key, %error, "failed to serialize cache payload");
                return;
            }
        };

        if let Err(error) = self.cache.set_with_ttl(key, payload, ttl).await {
            tracing::warn!(key, %error, "cache write failed");
        }
    }

    async fn invalidate(&self, key: &str) {
        if let Err(error) = self.cache.delete(key).await {
            tracing::warn!(key, %error, "cache invalidation failed");
        }
    }

    async fn invalidate_prefix(&self, prefix: &str) {
        if let Err(error) = self.cache.delete_prefix(prefix).await {
            tracing::warn!(prefix, %error, "cache prefix invalidation failed");
        }
    }
}

fn require_tenant(tenant_id: &str) -> ServiceResult<()> {
    if tenant_id.trim().is_empty() {
        return Err(ServiceError::Validation("tenant_id is required".to_string()));
    }
    Ok(())
}

fn hash_password(password: &str) -> ServiceResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| ServiceError::Hashing(e.to_string()))
}
