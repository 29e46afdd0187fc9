//! Predictor - one record in, ranked labels out

use serde::Serialize;
use thiserror::Error;

use crate::error::MODEL_UNAVAILABLE_MESSAGE;
use crate::features::FeatureRecord;
use crate::model::{ClassifierError, ModelBundle};

/// Allowed drift of the probability sum from 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    pub prediction: String,
    /// `(label, probability)`, highest first
    pub probabilities: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    #[error("{}", MODEL_UNAVAILABLE_MESSAGE)]
    ModelUnavailable,

    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Run the classifier once and rank its output
///
/// The predicted class is the first arg-max of the probability vector. The
/// ranking sort is stable, so equal probabilities keep label-encoder order and
/// the predicted label always comes first.
pub fn predict(bundle: Option<&ModelBundle>, record: &FeatureRecord) -> Result<PredictionResult, PredictError> {
    let bundle = bundle.ok_or(PredictError::ModelUnavailable)?;
    let encoder = bundle.label_encoder();

    let proba = bundle.classifier().predict_proba(record)?;
    check_distribution(&proba, encoder.n_classes())?;

    let predicted = proba
        .iter()
        .enumerate()
        .fold(0, |best, (i, p)| if *p > proba[best] { i } else { best });

    let prediction = encoder
        .decode(predicted)
        .ok_or_else(|| ClassifierError::Inference(format!("class index {} has no label", predicted)))?
        .to_string();

    let mut probabilities: Vec<(String, f64)> = encoder
        .classes()
        .iter()
        .cloned()
        .zip(proba)
        .collect();
    probabilities.sort_by(|a, b| b.1.total_cmp(&a.1));

    Ok(PredictionResult { prediction, probabilities })
}

fn check_distribution(proba: &[f64], n_classes: usize) -> Result<(), ClassifierError> {
    if proba.len() != n_classes {
        return Err(ClassifierError::Inference(format!(
            "expected {} probabilities, got {}",
            n_classes,
            proba.len()
        )));
    }
    if proba.iter().any(|p| !p.is_finite() || *p < 0.0 || *p > 1.0) {
        return Err(ClassifierError::Inference(format!("invalid probabilities {:?}", proba)));
    }
    let total: f64 = proba.iter().sum();
    if (total - 1.0).abs() > PROBABILITY_TOLERANCE {
        return Err(ClassifierError::Inference(format!("probabilities sum to {}", total)));
    }
    Ok(())
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{FeatureRecord, SocialNetwork, YesNo};
    use crate::fixtures::{bundle_with, sample_bundle, sample_record, FailingClassifier, FixedClassifier};

    fn assert_valid(result: &PredictionResult) {
        let total: f64 = result.probabilities.iter().map(|(_, p)| p).sum();
        assert!((total - 1.0).abs() <= PROBABILITY_TOLERANCE);
        assert!(result.probabilities.iter().all(|(_, p)| (0.0..=1.0).contains(p)));
        assert!(result.probabilities.windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(result.probabilities[0].0, result.prediction);
    }

    #[test]
    fn test_predict_sample() {
        let bundle = sample_bundle();
        let result = predict(Some(&bundle), &sample_record()).unwrap();

        assert_eq!(result.prediction, "Promedio");
        let labels: Vec<&str> = result.probabilities.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(labels, ["Promedio", "Bajo", "Alto"]);
        assert!((result.probabilities[0].1 - 0.55).abs() < 1e-9);
        assert_valid(&result);
    }

    #[test]
    fn test_predict_properties_over_inputs() {
        let bundle = sample_bundle();
        for network in SocialNetwork::ALL {
            for strategies in YesNo::ALL {
                for hours in [0.5, 3.0, 4.0, 7.5, 12.0] {
                    let record = FeatureRecord {
                        red_social_principal: *network,
                        usa_estrategias: *strategies,
                        horas_redes_sociales: hours,
                        horas_estudio: 10.5 - hours.min(10.0),
                        ..sample_record()
                    };
                    let result = predict(Some(&bundle), &record).unwrap();
                    assert_eq!(result.probabilities.len(), 3);
                    assert!(["Alto", "Promedio", "Bajo"].contains(&result.prediction.as_str()));
                    assert_valid(&result);
                }
            }
        }
    }

    #[test]
    fn test_predict_is_deterministic() {
        let bundle = sample_bundle();
        let record = sample_record();
        assert_eq!(predict(Some(&bundle), &record), predict(Some(&bundle), &record));
    }

    #[test]
    fn test_ties_keep_encoder_order() {
        // classes: Alto, Bajo, Promedio
        let bundle = bundle_with(Box::new(FixedClassifier(vec![0.25, 0.5, 0.25])));
        let result = predict(Some(&bundle), &sample_record()).unwrap();
        assert_eq!(result.prediction, "Bajo");
        assert_eq!(
            result.probabilities,
            vec![("Bajo".to_string(), 0.5), ("Alto".to_string(), 0.25), ("Promedio".to_string(), 0.25)]
        );

        let bundle = bundle_with(Box::new(FixedClassifier(vec![0.4, 0.2, 0.4])));
        let result = predict(Some(&bundle), &sample_record()).unwrap();
        assert_eq!(result.prediction, "Alto");
        assert_eq!(result.probabilities[1].0, "Promedio");
    }

    #[test]
    fn test_model_unavailable() {
        assert_eq!(predict(None, &sample_record()), Err(PredictError::ModelUnavailable));
        assert_eq!(PredictError::ModelUnavailable.to_string(), "Modelo no disponible");
    }

    #[test]
    fn test_classifier_failure_wrapped() {
        let bundle = bundle_with(Box::new(FailingClassifier));
        let err = predict(Some(&bundle), &sample_record()).unwrap_err();
        assert!(matches!(err, PredictError::Classifier(ClassifierError::Inference(_))));
    }

    #[test]
    fn test_bad_distribution_rejected() {
        let bundle = bundle_with(Box::new(FixedClassifier(vec![0.2, 0.2, 0.2])));
        assert!(predict(Some(&bundle), &sample_record()).is_err());

        let bundle = bundle_with(Box::new(FixedClassifier(vec![f64::NAN, 0.5, 0.5])));
        assert!(predict(Some(&bundle), &sample_record()).is_err());
    }
}
