//! Process-wide model cache
//!
//! The first caller runs the loader; everyone else waits on the same cell and
//! then shares the result. A failed load is cached too, so the service stays
//! "unavailable" until restarted. Deploying a new artifact means restarting
//! the process.

use std::sync::Arc;

use tokio::sync::OnceCell;

use super::{ModelBundle, ModelLoader};

#[derive(Debug)]
pub struct ModelStore {
    loader: Option<ModelLoader>,
    cell: OnceCell<Option<Arc<ModelBundle>>>,
}

impl ModelStore {
    pub fn new(loader: ModelLoader) -> Self {
        Self {
            loader: Some(loader),
            cell: OnceCell::new(),
        }
    }

    /// Store around an already loaded bundle
    pub fn with_bundle(bundle: ModelBundle) -> Self {
        Self {
            loader: None,
            cell: OnceCell::from(Some(Arc::new(bundle))),
        }
    }

    /// Store that never has a model
    pub fn unavailable() -> Self {
        Self {
            loader: None,
            cell: OnceCell::from(None),
        }
    }

    /// Loaded bundle, running the loader on first use
    pub async fn get(&self) -> Option<Arc<ModelBundle>> {
        self.cell
            .get_or_init(|| async {
                match &self.loader {
                    Some(loader) => loader.load().await.map(Arc::new),
                    None => None,
                }
            })
            .await
            .clone()
    }

    pub async fn is_loaded(&self) -> bool {
        self.get().await.is_some()
    }
}
