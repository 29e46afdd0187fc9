//! Model Artifact Loader
//!
//! Local file first, remote URL second. Every failure is logged and folded
//! into `None`; nothing escapes `ModelLoader::load`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use sha2::{Digest, Sha256};

use crate::config::Config;
use super::{ModelBundle, ModelError};

/// Default timeout for the remote fetch
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct ModelLoader {
    local_path: PathBuf,
    remote_url: Option<String>,
    timeout: Duration,
    expected_sha256: Option<String>,
}

impl ModelLoader {
    /// Local-only loader
    pub fn new(local_path: impl Into<PathBuf>) -> Self {
        Self {
            local_path: local_path.into(),
            remote_url: None,
            timeout: DEFAULT_FETCH_TIMEOUT,
            expected_sha256: None,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        let mut loader = Self::new(&config.model_path);
        if let Some(url) = &config.model_url {
            loader = loader.with_remote(url.clone(), config.model_fetch_timeout());
        }
        if let Some(sha) = &config.model_sha256 {
            loader = loader.with_checksum(sha.clone());
        }
        loader
    }

    /// Enable the networked fallback
    pub fn with_remote(mut self, url: impl Into<String>, timeout: Duration) -> Self {
        self.remote_url = Some(url.into());
        self.timeout = timeout;
        self
    }

    /// Require the artifact bytes to hash to `sha256` (hex)
    pub fn with_checksum(mut self, sha256: impl Into<String>) -> Self {
        self.expected_sha256 = Some(sha256.into().to_ascii_lowercase());
        self
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn remote_url(&self) -> Option<&str> {
        self.remote_url.as_deref()
    }

    /// Try every configured source once, in order
    pub async fn load(&self) -> Option<ModelBundle> {
        match self.load_local().await {
            Ok(bundle) => {
                log_loaded(&bundle);
                return Some(bundle);
            }
            Err(e) => {
                tracing::warn!("Local model artifact {} unusable: {}", self.local_path.display(), e);
            }
        }

        let Some(url) = self.remote_url.as_deref() else {
            tracing::error!("Model unavailable: local artifact failed and no MODEL_URL is configured");
            return None;
        };

        match self.load_remote(url).await {
            Ok(bundle) => {
                log_loaded(&bundle);
                Some(bundle)
            }
            Err(e) => {
                tracing::warn!("Remote model artifact {} unusable: {}", url, e);
                tracing::error!("Model unavailable: every artifact source failed");
                None
            }
        }
    }

    pub async fn load_local(&self) -> Result<ModelBundle, ModelError> {
        let bytes = tokio::fs::read(&self.local_path).await?;
        self.decode(&bytes, format!("file://{}", self.local_path.display()))
    }

    pub async fn load_remote(&self, url: &str) -> Result<ModelBundle, ModelError> {
        tracing::info!("Fetching model artifact from {}", url);

        let client = reqwest::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        if !response.status().is_success() {
            return Err(ModelError::HttpStatus(response.status().as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        self.decode(&bytes, url.to_string())
    }

    fn decode(&self, bytes: &[u8], source: String) -> Result<ModelBundle, ModelError> {
        let checksum = sha256_hex(bytes);

        if let Some(expected) = &self.expected_sha256 {
            if *expected != checksum {
                return Err(ModelError::Checksum {
                    expected: expected.clone(),
                    actual: checksum,
                });
            }
        }

        ModelBundle::from_artifact(bytes, source, checksum)
    }
}

/// Lowercase hex SHA-256
pub fn sha256_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}

fn log_loaded(bundle: &ModelBundle) {
    let meta = bundle.metadata();
    tracing::info!(
        source = %meta.source,
        model_type = %meta.model_type,
        classes = ?bundle.label_encoder().classes(),
        n_trees = ?meta.n_trees,
        checksum = %meta.checksum,
        "Model loaded successfully"
    );
}

// ============================================================================
// TESTS
// ============================================================================
