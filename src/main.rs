//! Access gateway server binary.

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use access_gateway::adapters::{
    gateway_router, FlatFileSubscriptionStore, FlatFileUserStore, GatewayAppState,
    HttpSubscriptionStatusSource,
};
use access_gateway::config::{AppConfig, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config = AppConfig::load()?;
    init_tracing(&config.server);

    let users = Arc::new(FlatFileUserStore::new(&config.storage.user_db_path));
    let subscriptions = Arc::new(FlatFileSubscriptionStore::new(
        &config.storage.subscription_db_path,
    ));

    // Fail fast on unreadable or malformed store files.
    let user_count = users.load().await?.len();
    let subscription_count = subscriptions.load().await?.len();
    tracing::info!(
        users = user_count,
        subscriptions = subscription_count,
        "Loaded flat-file stores"
    );

    let mut state = GatewayAppState::new(users, subscriptions, config.redirect.links())
        .with_overrides(config.subscription.overrides());

    if let Some(endpoint) = config.subscription.status_endpoint() {
        if let Some(source) = HttpSubscriptionStatusSource::from_endpoint(endpoint) {
            tracing::info!("Subscription status endpoint: {}", source.endpoint());
            state = state.with_status_source(Arc::new(source));
        }
    }

    let app = gateway_router(state)
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(TraceLayer::new_for_http());

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Access gateway listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

fn init_tracing(server: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    if server.json_logs() {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();
    }
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
