//! Rendimiento Server - entry point

use std::net::SocketAddr;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rendimiento_server::{
    config::Config,
    create_router,
    model::{ModelLoader, ModelStore},
    AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    // Initialize logging
    init_tracing(&config);

    tracing::info!("Rendimiento server starting ({})...", config.environment);
    tracing::info!("Model artifact: {}", config.model_path.display());
    if let Some(url) = &config.model_url {
        tracing::info!("Model fallback URL: {}", url);
    }

    // Load the model once up front; failure degrades to "unavailable"
    let models = ModelStore::new(ModelLoader::from_config(&config));
    if !models.is_loaded().await {
        tracing::warn!("Serving without a model: /predict will answer 500 until restart");
    }

    let addr: SocketAddr = format!("{}:{}", config.bind_address, config.port)
        .parse()
        .with_context(|| format!("invalid bind address {}:{}", config.bind_address, config.port))?;

    let app = create_router(AppState::new(models, config));

    tracing::info!("🚀 Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rendimiento_server=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(filter);

    if config.json_logs() {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
