use std::env;

use steeple_server::config::loader::load_config;
use steeple_server::observability::init_tracing_with_level;

#[tokio::main]
async fn main() {
    // Load .env if present, before reading any configuration.
    if let Err(e) = dotenvy::dotenv() {
        if !matches!(e, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            eprintln!("Warning: failed to load .env file: {e}");
        }
    }

    let config_path = resolve_config_path();
    let cfg = match load_config(config_path.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(2);
        }
    };

    init_tracing_with_level(&cfg.logging.level);
    tracing::info!(
        path = config_path.as_deref().unwrap_or("steeple.toml"),
        "configuration loaded"
    );

    if let Err(e) = steeple_server::run(cfg).await {
        tracing::error!(error = %e, "server failed");
        std::process::exit(1);
    }
}

/// `--config <path>` argument, then the STEEPLE_CONFIG environment
/// variable, then the default `steeple.toml`.
fn resolve_config_path() -> Option<String> {
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next();
        }
    }
    env::var("STEEPLE_CONFIG").ok()
}
