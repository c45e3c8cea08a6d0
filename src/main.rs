mod collector;

use collector::*;
use sentry_events_client::{Config, SentryClient};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> std::process::ExitCode {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    if let Err(e) = run().await {
        tracing::error!("Error collecting data: {}", e);
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn run() -> sentry_events_client::Result<()> {
    let settings = CollectorSettings::from_env()?;
    let client = SentryClient::new(&Config::from_env())?;
    collect_data(&client, &settings).await
}
