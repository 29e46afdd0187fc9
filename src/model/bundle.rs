//! Model Bundle - classifier + label encoder
//!
//! A bundle is built once from a trusted artifact and only read afterwards.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::features::FeatureRecord;
use super::forest::{ColumnTransformer, ForestClassifier, RandomForest};
use super::{ModelError, ARTIFACT_FORMAT_VERSION};

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClassifierError {
    #[error("missing feature column '{0}'")]
    MissingFeature(String),

    #[error("{0}")]
    Inference(String),
}

/// Trait for probabilistic classifiers over a single `FeatureRecord`
///
/// `predict_proba` returns one probability per class, in label-encoder index
/// order.
pub trait Classifier: Send + Sync + std::fmt::Debug {
    fn predict_proba(&self, record: &FeatureRecord) -> Result<Vec<f64>, ClassifierError>;

    fn n_classes(&self) -> usize;

    /// Human readable model family, shown in the UI
    fn model_type(&self) -> &str {
        "classifier"
    }

    /// Number of ensemble members, for ensembles
    fn n_estimators(&self) -> Option<usize> {
        None
    }
}

// ============================================================================
// LABEL ENCODER
// ============================================================================

/// Class index <-> label mapping fitted at training time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Result<Self, ModelError> {
        if classes.is_empty() {
            return Err(ModelError::Malformed("label encoder has no classes".to_string()));
        }
        let mut seen = HashSet::new();
        for class in &classes {
            if !seen.insert(class.as_str()) {
                return Err(ModelError::Malformed(format!("duplicate class label '{}'", class)));
            }
        }
        Ok(Self { classes })
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn n_classes(&self) -> usize {
        self.classes.len()
    }

    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }
}

// ============================================================================
// METADATA
// ============================================================================

/// Where and when the bundle came from
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelMetadata {
    pub source: String,
    pub model_type: String,
    pub format_version: u32,
    pub n_classes: usize,
    pub n_trees: Option<usize>,
    /// SHA-256 of the artifact bytes
    pub checksum: String,
    pub loaded_at: DateTime<Utc>,
}

// ============================================================================
// BUNDLE
// ============================================================================

#[derive(Debug)]
pub struct ModelBundle {
    classifier: Box<dyn Classifier>,
    label_encoder: LabelEncoder,
    metadata: ModelMetadata,
}

/// On-disk JSON layout
#[derive(Debug, Deserialize)]
struct ArtifactFile {
    format_version: u32,
    label_encoder: LabelEncoderFile,
    preprocessor: ColumnTransformer,
    classifier: ClassifierSpec,
}

#[derive(Debug, Deserialize)]
struct LabelEncoderFile {
    classes: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum ClassifierSpec {
    RandomForest(RandomForest),
}

impl ModelBundle {
    pub fn new(
        classifier: Box<dyn Classifier>,
        label_encoder: LabelEncoder,
        source: impl Into<String>,
        checksum: impl Into<String>,
    ) -> Result<Self, ModelError> {
        if classifier.n_classes() != label_encoder.n_classes() {
            return Err(ModelError::Malformed(format!(
                "classifier predicts {} classes but the label encoder knows {}",
                classifier.n_classes(),
                label_encoder.n_classes()
            )));
        }

        let metadata = ModelMetadata {
            source: source.into(),
            model_type: classifier.model_type().to_string(),
            format_version: ARTIFACT_FORMAT_VERSION,
            n_classes: label_encoder.n_classes(),
            n_trees: classifier.n_estimators(),
            checksum: checksum.into(),
            loaded_at: Utc::now(),
        };

        Ok(Self { classifier, label_encoder, metadata })
    }

    /// Deserialize and validate a JSON artifact
    pub fn from_artifact(bytes: &[u8], source: impl Into<String>, checksum: impl Into<String>) -> Result<Self, ModelError> {
        let artifact: ArtifactFile = serde_json::from_slice(bytes)?;

        if artifact.format_version != ARTIFACT_FORMAT_VERSION {
            return Err(ModelError::UnsupportedVersion(artifact.format_version));
        }

        let label_encoder = LabelEncoder::new(artifact.label_encoder.classes)?;
        let classifier: Box<dyn Classifier> = match artifact.classifier {
            ClassifierSpec::RandomForest(forest) => {
                Box::new(ForestClassifier::new(artifact.preprocessor, forest)?)
            }
        };

        Self::new(classifier, label_encoder, source, checksum)
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    pub fn label_encoder(&self) -> &LabelEncoder {
        &self.label_encoder
    }

    pub fn metadata(&self) -> &ModelMetadata {
        &self.metadata
    }
}
