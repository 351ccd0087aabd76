use std::net::SocketAddr;
use std::sync::Arc;

use compose_api::http::{AppState, build_router};
use shared::config::{ApiConfig, load_dotenv};
use shared::llm::{LlmGateway, OpenRouterGateway, UnconfiguredGateway};
use shared::presets::PresetStore;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "compose_api=info,shared=info,axum=info";

#[tokio::main]
async fn main() {
    if let Err(err) = load_dotenv() {
        eprintln!("{err}");
        std::process::exit(1);
    }

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let config = match ApiConfig::from_env() {
        Ok(cfg) => cfg,
        Err(err) => {
            error!("failed to read config: {err}");
            std::process::exit(1);
        }
    };

    let gateway: Arc<dyn LlmGateway> = match config.openrouter.clone() {
        Some(openrouter) => match OpenRouterGateway::new(openrouter) {
            Ok(gateway) => {
                info!(model = gateway.model(), "openrouter gateway configured");
                Arc::new(gateway)
            }
            Err(err) => {
                error!("failed to build openrouter gateway: {err}");
                std::process::exit(1);
            }
        },
        None => {
            warn!("OPENROUTER_API_KEY is not set; every variant request will use fallback copy");
            Arc::new(UnconfiguredGateway)
        }
    };

    let presets = match PresetStore::open(config.preset_store_path.clone()).await {
        Ok(store) => store,
        Err(err) => {
            error!("failed to open preset store: {err}");
            std::process::exit(1);
        }
    };

    let app = build_router(AppState::new(
        gateway,
        Arc::new(presets),
        config.request_body_limit_bytes,
    ));

    let addr: SocketAddr = match config.bind_addr.parse() {
        Ok(addr) => addr,
        Err(err) => {
            error!("invalid API_BIND_ADDR '{}': {err}", config.bind_addr);
            std::process::exit(1);
        }
    };

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!("failed to bind {addr}: {err}");
            std::process::exit(1);
        }
    };

    info!(
        "compose api listening on {}",
        listener.local_addr().unwrap_or(addr)
    );
    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("server exited with error: {err}");
        std::process::exit(1);
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
    info!("shutdown signal received");
}
