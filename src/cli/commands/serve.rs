//! Implementation of the `rolodex serve` command.

use anyhow::{anyhow, Context, Result};
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

use crate::adapters::cache::MemoryCacheStore;
use crate::adapters::http::CustomersHttpServer;
use crate::adapters::sqlite::{self, SqliteCustomerRepository};
use crate::infrastructure::config::ConfigLoader;
use crate::services::CustomerService;

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Load configuration from this file instead of the hierarchical
    /// .rolodex/ lookup
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs) -> Result<()> {
    let config = match args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let pool = sqlite::initialize_database(&config.database)
        .await
        .context("failed to initialize database")?;
    sqlite::verify_connection(&pool)
        .await
        .context("database liveness check failed")?;

    let repository = Arc::new(SqliteCustomerRepository::new(pool.clone()));
    let cache = Arc::new(MemoryCacheStore::new(config.cache.max_entries));
    let service = Arc::new(CustomerService::new(repository, cache, &config.cache));

    let server = CustomersHttpServer::new(service, config.http.clone());
    server
        .serve_with_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("shutdown signal received");
        })
        .await
        .map_err(|e| anyhow!("http server error: {e}"))?;

    // Teardown in reverse order of construction; the server has already
    // drained by the time we get here.
    pool.close().await;
    tracing::info!("database pool closed, exiting");
    Ok(())
}
