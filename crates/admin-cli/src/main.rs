//! Operator CLI for the rental admin back-office
//!
//! Talks to the backend REST API through `rental-client`; the session
//! token and refresh cookie are kept in a file so commands can be chained.

mod cli;
mod commands;
mod keepalive;
mod session_file;

use anyhow::Result;
use clap::Parser;
use rental_client::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::Cli;
use crate::session_file::{SessionFile, DEFAULT_SESSION_FILE};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rental_admin=info,rental_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = ClientConfig::from_env();
    if let Some(url) = cli.api_url.clone() {
        config = config.with_base_url(url);
    }
    tracing::debug!("Using API at {}", config.base_url);

    let session_file = SessionFile::new(
        cli.session_file
            .clone()
            .unwrap_or_else(|| DEFAULT_SESSION_FILE.into()),
    );
    let stored = session_file.load().await?;
    let admin = commands::connect(&config, stored.as_ref())?;

    commands::execute(cli.command, &admin, &config, &session_file, stored.as_ref()).await
}
