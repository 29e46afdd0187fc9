//! Error handling

use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde_json::json;

use crate::features::FeatureError;
use crate::predictor::PredictError;

/// Message returned whenever no model bundle is available
pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Modelo no disponible";

pub type AppResult<T> = Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    // Request errors
    ValidationError(String),

    // Model errors
    ModelUnavailable,
    PredictionError(String),

    // Generic errors
    InternalError(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::PredictionError(_) => StatusCode::BAD_REQUEST,
            AppError::ModelUnavailable => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "{}", msg),
            AppError::ModelUnavailable => write!(f, "{}", MODEL_UNAVAILABLE_MESSAGE),
            AppError::PredictionError(msg) => write!(f, "Error de prediccion: {}", msg),
            AppError::InternalError(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for AppError {}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match &self {
            AppError::ValidationError(msg) => {
                tracing::warn!("Validation error: {}", msg);
                self.to_string()
            }
            AppError::ModelUnavailable => {
                tracing::warn!("Prediction requested without a loaded model");
                self.to_string()
            }
            AppError::PredictionError(msg) => {
                tracing::error!("Classifier error: {}", msg);
                self.to_string()
            }
            AppError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
            "status": status.as_u16()
        }));

        (status, body).into_response()
    }
}

impl From<FeatureError> for AppError {
    fn from(err: FeatureError) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<PredictError> for AppError {
    fn from(err: PredictError) -> Self {
        match err {
            PredictError::ModelUnavailable => AppError::ModelUnavailable,
            PredictError::Classifier(e) => AppError::PredictionError(e.to_string()),
        }
    }
}
