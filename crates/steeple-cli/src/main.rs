mod cli;
mod commands;
mod output;

use anyhow::Result;
use clap::Parser;

use cli::{Cli, Commands};
use output::print_error;
use steeple_directus::DirectusClient;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    if let Err(e) = run().await {
        print_error(&format!("{e:#}"));
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse();

    match &cli.command {
        Commands::Sync => {
            let client = DirectusClient::new(&cli.url, cli.token.clone())?;
            commands::sync::sync(&client).await?;
        }
        Commands::Status => {
            let client = DirectusClient::new(&cli.url, cli.token.clone())?;
            commands::status::status(&client).await?;
        }
        Commands::Catalog => {
            commands::catalog::catalog_table()?;
        }
    }

    Ok(())
}

fn init_tracing() {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().without_time())
        .try_init();
}
