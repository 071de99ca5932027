use anyhow::Result;
use luna_client::api::HttpClient;
use luna_client::repl::Repl;
use luna_client::session::Session;
use luna_client::{config, identity};
use tracing::info;

/// Validates that a log level string is valid
fn validate_log_level(level: &str) -> Result<()> {
    level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .map_err(|_| {
            anyhow::anyhow!(
                "Invalid log level: '{}'. Valid levels: error, warn, info, debug, trace",
                level
            )
        })?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (before logging setup)
    let config = match config::load().await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Determine log level: environment variable overrides config
    let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| config.logs.level.clone());

    // Validate log level
    if let Err(e) = validate_log_level(&log_level) {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    // Logs go to stderr; stdout belongs to the REPL
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_level.parse().unwrap()),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Starting Luna client against {}", config.backend.origin);

    let user_id = identity::load_or_create(&config.identity.path).await?;
    info!("Scoped to user: {}", user_id);

    let client = HttpClient::new(config.backend.clone())?;
    let origin = client.origin().to_string();
    let session = Session::new(client, user_id);

    Repl::new(session, origin).run().await?;

    Ok(())
}
