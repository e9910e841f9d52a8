//! Domain Appraiser API Server
//!
//! Usage:
//!   cargo run --bin appraiser_api
//!
//! Environment:
//!   PORT / APPRAISER_PORT - Server port (default: 8080)
//!   APPRAISER_HOST        - Server host (default: 0.0.0.0)
//!   RUST_LOG              - Log filter (default: info)
//!   APPRAISER_*           - Engine settings, see `AppraiserConfig`

use domain_appraiser::api::{create_router, AppState};
use domain_appraiser::utils::constants::{APP_NAME, APP_VERSION, DEFAULT_API_PORT};
use domain_appraiser::AppraiserConfig;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    print_banner();

    let config = AppraiserConfig::default();
    let state = Arc::new(AppState::new(&config)?);

    let sweeper = state.estimator.cache().spawn_sweeper(config.sweep_interval);
    info!(
        "🧹 Cache sweeper started (every {}s)",
        config.sweep_interval.as_secs()
    );

    let app = create_router(state.clone());

    let host = std::env::var("APPRAISER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .or_else(|_| std::env::var("APPRAISER_PORT"))
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_API_PORT);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;

    info!("🚀 {} API starting on http://{}", APP_NAME, addr);
    info!("");
    info!("Endpoints:");
    info!("  POST /api/estimate   - Value a domain");
    info!("  GET  /api/history    - Past valuations (?domain=&limit=)");
    info!("  GET  /health         - Health check & cache stats");
    info!("");
    info!("Press Ctrl+C for graceful shutdown");

    let listener = TcpListener::bind(addr).await?;

    let shutdown_signal = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("⚠️ Failed to listen for Ctrl+C: {}", e);
        }
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await?;

    info!("🛑 Shutdown signal received, cleaning up...");
    sweeper.shutdown().await;

    let stats = state.estimator.cache().stats();
    info!(
        "   Cache: {} entries, {:.1}% hit rate ({} hits / {} misses)",
        stats.entries, stats.hit_rate, stats.hits, stats.misses
    );
    info!("   History: {} valuations recorded", state.history.len());
    info!("👋 {} API shutdown complete", APP_NAME);

    Ok(())
}

fn print_banner() {
    println!(
        r#"
    +--------------------------------------------------+
    |                                                  |
    |          D O M A I N   A P P R A I S E R         |
    |                                                  |
    |                 A P I   v{:<8}               |
    |                                                  |
    +--------------------------------------------------+
    "#,
        APP_VERSION
    );
}
