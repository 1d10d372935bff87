//! Implementation of the `rolodex migrate` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::PathBuf;

use crate::adapters::sqlite::{all_embedded_migrations, create_pool, Migrator};
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// Load configuration from this file instead of the hierarchical
    /// .rolodex/ lookup
    #[arg(long)]
    pub config: Option<PathBuf>,
}

pub async fn execute(args: MigrateArgs) -> Result<()> {
    let config = match args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let pool = create_pool(&config.database)
        .await
        .context("failed to open database")?;

    let migrator = Migrator::new(pool.clone());
    let applied = migrator
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .context("migration failed")?;

    if applied == 0 {
        println!("Schema already up to date");
    } else {
        println!("Applied {applied} migration(s)");
    }

    pool.close().await;
    Ok(())
}
