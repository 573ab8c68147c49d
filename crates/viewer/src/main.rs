use std::time::Duration;

use tracing_subscriber::EnvFilter;
use viewer::clients::analysis::AnalysisClient;
use viewer::config::Config;
use viewer::controller::PositionController;
use viewer::{routes, session};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Config::from_env();

    let controller = PositionController::new(
        &config.start_fen,
        config.analysis_depth,
        config.analysis_policy,
    )?;
    let client = AnalysisClient::new(
        config.analysis_url.clone(),
        Duration::from_secs(config.analysis_timeout_secs),
    )?;

    tracing::info!(
        url = %config.analysis_url,
        depth = config.analysis_depth,
        policy = ?config.analysis_policy,
        "Analysis client configured"
    );

    let session = session::spawn(controller, client);
    let app = routes::app(session);

    let addr = format!("{}:{}", config.host, config.port);
    tracing::info!("Starting viewer on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
