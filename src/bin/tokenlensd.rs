//! tokenlensd — Tokenlens daemon.
//!
//! Serves the tokenize and decode operations over HTTP for browser-based
//! token inspection tools.

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tokenlens::server::{AppState, Config, serve};
use tokenlens::{Reconstructor, TokenLensError, TokenizerCache};

/// Tokenlens daemon — token-level introspection over HTTP.
#[derive(Parser)]
#[command(name = "tokenlensd")]
#[command(version = tokenlens::PKG_VERSION)]
#[command(about = "Tokenlens token introspection daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long, env = "TOKENLENS_CONFIG")]
    config: Option<PathBuf>,

    /// Address to bind to, overriding the configuration file.
    #[arg(short, long, env = "TOKENLENS_ADDRESS")]
    address: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(address) = args.address {
        config.server.address = address;
    }

    let cache = TokenizerCache::new(Arc::new(config.tokenizers.loader()), &config.cache);
    let state = AppState::new(Arc::new(cache), Reconstructor::new(config.padding.clone()));

    let listener = TcpListener::bind(&config.server.address)
        .await
        .map_err(|e| {
            TokenLensError::Configuration(format!(
                "Failed to bind to {}: {e}",
                config.server.address
            ))
        })?;

    info!(
        version = tokenlens::version_string(),
        address = %config.server.address,
        max_models = config.cache.max_models,
        sentinel = config.padding.sentinel,
        "tokenlensd starting"
    );

    serve(listener, state).await?;

    Ok(())
}
