//! KBGate API Server
//!
//! HTTP gateway in front of an Amazon Bedrock knowledge base.

use kbgate_api::{create_router, state::AppState};
use kbgate_bedrock::{default_credentials, BedrockKbClient};
use kbgate_core::{AppConfig, LoggingConfig};
use std::sync::Arc;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = load_config()?;

    // Initialize tracing
    init_tracing(&config.logging);

    let missing = config.missing_generation_settings();
    if !missing.is_empty() {
        tracing::warn!(
            missing = %missing.join(", "),
            "Bedrock settings missing; the server will start but queries will fail"
        );
    }

    // Create the generation client
    let credentials = default_credentials().await;
    let generator = BedrockKbClient::new(&config.bedrock, credentials)?;

    let addr = config.bind_address();

    // Create application state
    let state = Arc::new(AppState::new(config, Arc::new(generator)));

    // Create router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("KBGate API running on http://{}", addr);
    tracing::info!("Health check available at http://{}/health", addr);
    tracing::info!("OpenAPI spec at http://{}/api-docs/openapi.json", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// `KBGATE_CONFIG` points at an optional TOML file; the environment wins
fn load_config() -> anyhow::Result<AppConfig> {
    let config = match std::env::var("KBGATE_CONFIG") {
        Ok(path) => AppConfig::from_file(path)?.with_env_override()?,
        Err(_) => AppConfig::from_env()?,
    };
    Ok(config)
}

fn init_tracing(logging: &LoggingConfig) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "kbgate_api={0},kbgate_bedrock={0},tower_http={0}",
            logging.level
        )
        .into()
    });

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if logging.json_format {
        builder.json().init();
    } else {
        builder.init();
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
