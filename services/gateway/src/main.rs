use std::process::ExitCode;

use anyhow::Context;
use gateway::GatewayConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Boot the gateway. A missing or malformed `BACKEND_URL` stops the process
/// before any port is bound.
#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            tracing::error!(%error, "refusing to start gateway");
            return ExitCode::FAILURE;
        }
    };

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!(?error, "gateway exited with error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: GatewayConfig) -> anyhow::Result<()> {
    let app = gateway::app(&config).context("failed to build outbound http client")?;

    let listener = tokio::net::TcpListener::bind(config.listen)
        .await
        .with_context(|| format!("failed to bind gateway listener on {}", config.listen))?;

    tracing::info!(
        addr = %config.listen,
        backend = %config.backend,
        static_dir = %config.static_dir.display(),
        "gateway listening"
    );

    gateway::serve(listener, app)
        .await
        .context("gateway server failed")?;

    tracing::info!("gateway stopped");
    Ok(())
}
