//! Rolodex CLI entry point.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use rolodex::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Serve(args) => rolodex::cli::commands::serve::execute(args).await,
        Commands::Migrate(args) => rolodex::cli::commands::migrate::execute(args).await,
    };

    if let Err(err) = result {
        rolodex::cli::handle_error(&err);
    }
}
