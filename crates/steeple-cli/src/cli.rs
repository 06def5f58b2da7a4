use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "steeple")]
#[command(about = "Provision and inspect the church directory schema in Directus")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Directus base URL
    #[arg(
        short,
        long,
        global = true,
        env = "STEEPLE_DIRECTUS_URL",
        default_value = "http://localhost:8056"
    )]
    pub url: String,

    /// Static admin token
    #[arg(short, long, global = true, env = "STEEPLE_DIRECTUS_TOKEN")]
    pub token: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one reconciliation pass: create missing collections, fields, and relations
    Sync,
    /// Check that the Directus instance is reachable
    Status,
    /// Print the declared catalog without touching the network
    Catalog,
}
