//! Load-once artifact context

use crate::artifacts::fetch::{ArtifactFetcher, HttpFetcher};
use crate::artifacts::{ArtifactLoader, Artifacts};
use crate::config::{ArtifactsConfig, FetchConfig};
use crate::error::{FurnaceError, Result};
use crate::models::loader::ModelLoader;
use std::path::Path;
use tokio::sync::OnceCell;
use tracing::info;

/// Resolves the model and scaler once per process.
///
/// Missing local files are fetched from their configured URL before loading.
/// Concurrent first callers share one initialization; a failed
/// initialization is not cached.
pub struct ArtifactProvider<F = HttpFetcher, L = ModelLoader> {
    config: ArtifactsConfig,
    fetcher: F,
    loader: L,
    artifacts: OnceCell<Artifacts>,
}

impl ArtifactProvider {
    /// Provider backed by HTTP downloads and the ONNX loader
    pub fn from_config(artifacts: &ArtifactsConfig, fetch: &FetchConfig) -> Result<Self> {
        Ok(Self::new(
            artifacts.clone(),
            HttpFetcher::new(fetch)?,
            ModelLoader::new()?,
        ))
    }
}

impl<F: ArtifactFetcher, L: ArtifactLoader> ArtifactProvider<F, L> {
    pub fn new(config: ArtifactsConfig, fetcher: F, loader: L) -> Self {
        Self {
            config,
            fetcher,
            loader,
            artifacts: OnceCell::new(),
        }
    }

    /// Get the cached artifacts, fetching and loading them on first use.
    pub async fn get_artifacts(&self) -> Result<Artifacts> {
        self.artifacts
            .get_or_try_init(|| self.initialize())
            .await
            .cloned()
    }

    /// Whether artifacts have been loaded in this process
    pub fn is_loaded(&self) -> bool {
        self.artifacts.initialized()
    }

    async fn initialize(&self) -> Result<Artifacts> {
        let ArtifactsConfig {
            model_path,
            scaler_path,
            model_url,
            scaler_url,
        } = &self.config;

        self.ensure_local(model_path, model_url.as_deref()).await?;
        self.ensure_local(scaler_path, scaler_url.as_deref()).await?;

        let model = self.loader.load_regressor(model_path)?;
        let scaler = self.loader.load_feature_scaler(scaler_path)?;

        info!(
            model = %model.name(),
            scaler = %scaler.name(),
            "Artifacts loaded"
        );
        Ok(Artifacts { model, scaler })
    }

    async fn ensure_local(&self, path: &Path, url: Option<&str>) -> Result<()> {
        if tokio::fs::try_exists(path).await.unwrap_or(false) {
            return Ok(());
        }

        let url = url.ok_or_else(|| {
            FurnaceError::artifact(
                path.display().to_string(),
                "file not found and no remote URL configured",
            )
        })?;

        info!(path = %path.display(), url, "Downloading artifact (first run only)");
        self.fetcher.fetch(url, path).await?;
        Ok(())
    }
}
