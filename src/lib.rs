//! Rolodex - Tenant-Scoped Customer Record Service
//!
//! Rolodex stores customer records partitioned by tenant and serves
//! them through a cache-aside read path: reads consult the cache and
//! fall back to SQLite on miss, writes invalidate the affected cache
//! keys after the store commits.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, port traits, and the error taxonomy
//! - **Service Layer** (`services`): Cache-aside orchestration and key policy
//! - **Adapters** (`adapters`): SQLite repository, moka cache store, axum HTTP
//! - **Infrastructure** (`infrastructure`): Configuration loading
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//!
//! use rolodex::adapters::cache::MemoryCacheStore;
//! use rolodex::adapters::sqlite::{self, SqliteCustomerRepository};
//! use rolodex::domain::models::Config;
//! use rolodex::services::CustomerService;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let pool = sqlite::initialize_database(&config.database).await?;
//!     let service = CustomerService::new(
//!         Arc::new(SqliteCustomerRepository::new(pool.clone())),
//!         Arc::new(MemoryCacheStore::new(config.cache.max_entries)),
//!         &config.cache,
//!     );
//!     // Serve requests...
//!     Ok(())
//! }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::cache::MemoryCacheStore;
pub use adapters::http::CustomersHttpServer;
pub use adapters::sqlite::SqliteCustomerRepository;
pub use domain::errors::{ServiceError, ServiceResult};
pub use domain::models::{
    CacheConfig, Config, Customer, CustomerPage, CustomerPatch, DatabaseConfig, HttpConfig,
    ListQuery, LoggingConfig, NewCustomer, TenantStats,
};
pub use domain::ports::{CacheStore, CustomerRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::CustomerService;
