//! SafeRoute Server - route safety scoring over HTTP

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::broadcast;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use saferoute_core::EngineRules;
use saferoute_server::config::Config;
use saferoute_server::state::catalog::load_base_records;
use saferoute_server::state::{AppState, Providers};
use saferoute_server::{api, loops};

async fn load_rules(config: &Config) -> Result<EngineRules> {
    let Some(path) = &config.rules_path else {
        return Ok(EngineRules::default());
    };
    let json = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read rules {}", path.display()))?;
    let rules = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse rules {}", path.display()))?;
    tracing::info!("Loaded engine rules from {}", path.display());
    Ok(rules)
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("saferoute_server=debug".parse()?),
        )
        .init();

    tracing::info!("Starting SafeRoute Server...");

    let config = Config::from_env();
    let port = config.server_port;
    let rules = load_rules(&config).await?;
    let providers = Providers::from_config(&config).context("Failed to build provider clients")?;
    let base = load_base_records(&config).await?;

    let state = Arc::new(AppState::new(config, rules, providers));
    state.set_base_records(base);

    let (shutdown_tx, _) = broadcast::channel(1);
    let sync_handle = tokio::spawn(loops::incident_sync_loop::run_incident_sync_loop(
        state.clone(),
        shutdown_tx.subscribe(),
    ));

    let app = api::routes()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", err);
                std::future::pending::<()>().await;
            }
        })
        .await?;

    tracing::info!("Shutting down background tasks");
    let _ = shutdown_tx.send(());
    let _ = sync_handle.await;
    Ok(())
}
