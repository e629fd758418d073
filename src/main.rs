//! storefront entry point: configuration, tracing, actors, HTTP server.

use anyhow::Context;
use axum::http::{HeaderValue, Method};
use storefront::app_system::{seed_demo_data, setup_tracing, StoreSystem};
use storefront::config::{Config, CorsConfig};
use storefront::http::build_router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; production injects variables directly.
    let _ = dotenvy::dotenv();

    let config = Config::from_env().context("loading configuration")?;
    setup_tracing(&config.server.log_level);

    info!("Starting storefront");
    let system = StoreSystem::new(&config);

    if config.seed.enabled {
        let admin = seed_demo_data(&system, &config.seed).await?;
        info!(admin_id = %admin.id, "Seed data loaded");
    }

    let app = build_router(system.state())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors(&config.cors));

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    info!("storefront listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server crashed")?;

    system
        .shutdown()
        .await
        .map_err(anyhow::Error::msg)
        .context("shutting down actors")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for ctrl-c, running until killed");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

fn cors(config: &CorsConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .origins
        .iter()
        .filter_map(|o| HeaderValue::from_str(o).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}
