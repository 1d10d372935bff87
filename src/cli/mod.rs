//! Command-line interface for the rolodex service.

pub mod commands;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "rolodex", version, about = "Tenant-scoped customer record service")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),

    /// Apply pending database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
}

/// Report a fatal error and exit non-zero.
pub fn handle_error(err: &anyhow::Error) -> ! {
    eprintln!("error: {err:#}");
    std::process::exit(1);
}
