//! Prediction handler

use axum::{
    extract::{FromRequest, Request, State},
    http::header,
    Form, Json,
};
use serde::Serialize;
use uuid::Uuid;

use crate::features::{assemble, RawFeatures};
use crate::predictor;
use crate::recommendations::{self, RecommendationBlock};
use crate::{AppError, AppResult, AppState};

/// Survey answers from either a URL-encoded form or a JSON body
#[derive(Debug)]
pub struct SurveyInput(pub RawFeatures);

#[axum::async_trait]
impl<S> FromRequest<S> for SurveyInput
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map_or(false, |ct| ct.starts_with("application/json"));

        if is_json {
            let Json(raw) = Json::<RawFeatures>::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            Ok(Self(raw))
        } else {
            let Form(raw) = Form::<RawFeatures>::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            Ok(Self(raw))
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: String,
    pub probabilities: Vec<(String, f64)>,
    pub recommendations: &'static RecommendationBlock,
}

/// POST /predict
///
/// Model availability is checked before the body, so without a model every
/// request is answered 500.
pub async fn predict(
    State(state): State<AppState>,
    input: Result<SurveyInput, AppError>,
) -> AppResult<Json<PredictResponse>> {
    let bundle = state.models.get().await.ok_or(AppError::ModelUnavailable)?;
    let SurveyInput(raw) = input?;

    let record = assemble(&raw)?;
    let result = predictor::predict(Some(bundle.as_ref()), &record)?;
    let recommendations = recommendations::resolve(&result.prediction);

    let request_id = Uuid::new_v4();
    tracing::info!(
        %request_id,
        prediction = %result.prediction,
        confidence = result.probabilities.first().map(|(_, p)| *p).unwrap_or_default(),
        "Prediction served"
    );

    Ok(Json(PredictResponse {
        prediction: result.prediction,
        probabilities: result.probabilities,
        recommendations,
    }))
}
