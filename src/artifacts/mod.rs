//! Model and scaler artifacts: remote fetch, local load, process-wide cache

pub mod fetch;
pub mod provider;

use crate::error::Result;
use crate::models::loader::ModelLoader;
use crate::models::traits::{Regressor, Scaler};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

pub use fetch::{direct_download_url, ArtifactFetcher, HttpFetcher};
pub use provider::ArtifactProvider;

/// Loaded model and scaler, shared read-only for the process lifetime
#[derive(Clone)]
pub struct Artifacts {
    pub model: Arc<dyn Regressor>,
    pub scaler: Arc<dyn Scaler>,
}

impl fmt::Debug for Artifacts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifacts")
            .field("model", &self.model.name())
            .field("scaler", &self.scaler.name())
            .finish()
    }
}

/// Turns local artifact files into model capabilities
pub trait ArtifactLoader: Send + Sync {
    fn load_regressor(&self, path: &Path) -> Result<Arc<dyn Regressor>>;

    fn load_feature_scaler(&self, path: &Path) -> Result<Arc<dyn Scaler>>;
}

impl ArtifactLoader for ModelLoader {
    fn load_regressor(&self, path: &Path) -> Result<Arc<dyn Regressor>> {
        Ok(Arc::new(self.load_model(path)?))
    }

    fn load_feature_scaler(&self, path: &Path) -> Result<Arc<dyn Scaler>> {
        self.load_scaler(path)
    }
}
