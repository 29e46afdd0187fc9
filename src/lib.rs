//! Academic Performance Prediction Service
//!
//! Serves a pre-trained classifier over ten student survey answers, through
//! an HTML form and a JSON API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   RENDIMIENTO SERVER                        │
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌───────────┐  ┌───────────┐  ┌─────────────────────────┐ │
//! │  │  Form UI  │  │  /predict │  │  /health                │ │
//! │  │  (GET /)  │  │  (Axum)   │  │                         │ │
//! │  └─────┬─────┘  └─────┬─────┘  └────────────┬────────────┘ │
//! │        │     features → predictor → recommendations        │
//! │        └──────────────┼──────────────────────┘              │
//! │                       ▼                                     │
//! │      ┌──────────────────────────────────┐                  │
//! │      │ ModelStore (load once, read-only) │                  │
//! │      │  local artifact → remote URL      │                  │
//! │      └──────────────────────────────────┘                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod features;
pub mod handlers;
pub mod model;
pub mod predictor;
pub mod recommendations;

#[cfg(test)]
pub(crate) mod fixtures;

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::{
    cors::{CorsLayer, Any},
    trace::TraceLayer,
    compression::CompressionLayer,
};

pub use error::{AppError, AppResult};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub models: Arc<model::ModelStore>,
    pub config: config::Config,
}

impl AppState {
    pub fn new(models: model::ModelStore, config: config::Config) -> Self {
        Self {
            models: Arc::new(models),
            config,
        }
    }
}

/// Create the main router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::ui::index))
        .route("/health", get(handlers::health::check))
        .route("/predict", post(handlers::predict::predict))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any)
        )
        .with_state(state)
}

// ============================================================================
// TESTS
// ============================================================================
