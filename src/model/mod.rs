//! Model Module - Trained Classifier Bundle
//!
//! Artifact loading is kept apart from inference so the classifier
//! implementation can be swapped without touching the request path.

pub mod bundle;
pub mod forest;
pub mod loader;
pub mod store;

use thiserror::Error;

// Re-export common types
pub use bundle::{Classifier, ClassifierError, LabelEncoder, ModelBundle, ModelMetadata};
pub use forest::{ColumnTransformer, ForestClassifier, RandomForest};
pub use loader::ModelLoader;
pub use store::ModelStore;

/// Artifact format understood by this build
pub const ARTIFACT_FORMAT_VERSION: u32 = 1;

/// Why a single load attempt failed
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read artifact: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse artifact: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("artifact checksum mismatch (expected {expected}, got {actual})")]
    Checksum { expected: String, actual: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("remote server answered HTTP {0}")]
    HttpStatus(u16),

    #[error("unsupported artifact format version {0}")]
    UnsupportedVersion(u32),

    #[error("malformed artifact: {0}")]
    Malformed(String),
}
