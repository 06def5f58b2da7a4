use anyhow::Result;
use colored::Colorize;
use steeple_directus::DirectusClient;

pub async fn status(client: &DirectusClient) -> Result<()> {
    match client.ping().await {
        Ok(()) => {
            println!(
                "{} {} is {}",
                "✓".green(),
                client.base_url().cyan(),
                "reachable".green()
            );
            Ok(())
        }
        Err(e) => {
            println!(
                "{} {} is {}: {e}",
                "✗".red(),
                client.base_url().cyan(),
                "unreachable".red()
            );
            std::process::exit(1);
        }
    }
}
