//! Remote artifact download with retry, exponential backoff and timeout.

use crate::config::FetchConfig;
use crate::error::{FurnaceError, Result};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::Url;
use std::future::Future;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// Downloads one artifact to a local path, returning the byte count.
pub trait ArtifactFetcher: Send + Sync {
    fn fetch(&self, url: &str, dest: &Path) -> impl Future<Output = Result<u64>> + Send;
}

/// Rewrite a Google Drive share link into its direct-download form.
///
/// Accepts `/file/d/<id>/view`, `open?id=<id>` and `uc?id=<id>` links. Other
/// URLs are returned unchanged.
pub fn direct_download_url(url: &str) -> String {
    let Ok(parsed) = Url::parse(url) else {
        return url.to_string();
    };
    if parsed.host_str() != Some("drive.google.com") {
        return url.to_string();
    }

    let from_path = parsed.path_segments().and_then(|mut segments| {
        match (segments.next(), segments.next(), segments.next()) {
            (Some("file"), Some("d"), Some(id)) if !id.is_empty() => Some(id.to_string()),
            _ => None,
        }
    });
    let id = from_path.or_else(|| {
        parsed
            .query_pairs()
            .find(|(key, _)| key == "id")
            .map(|(_, value)| value.into_owned())
    });

    match id {
        Some(id) => format!(
            "https://drive.usercontent.google.com/download?id={id}&export=download&confirm=t"
        ),
        None => url.to_string(),
    }
}

fn part_path(dest: &Path) -> PathBuf {
    let mut part = dest.as_os_str().to_owned();
    part.push(".part");
    PathBuf::from(part)
}

fn artifact_name(dest: &Path) -> String {
    dest.display().to_string()
}

enum Attempt {
    /// Worth retrying (network error, 5xx)
    Transient(String),
    /// Retrying cannot help (4xx, HTML page instead of the file, local I/O)
    Permanent(String),
}

/// HTTP artifact fetcher over reqwest
pub struct HttpFetcher {
    client: reqwest::Client,
    config: FetchConfig,
}

impl HttpFetcher {
    pub fn new(config: &FetchConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| FurnaceError::artifact("http client", e))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    async fn attempt(&self, url: &str, part: &Path) -> std::result::Result<u64, Attempt> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| Attempt::Transient(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            return Err(Attempt::Permanent(format!("HTTP {status}")));
        }
        if !status.is_success() {
            return Err(Attempt::Transient(format!("HTTP {status}")));
        }

        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("text/html"));
        if is_html {
            return Err(Attempt::Permanent(
                "received an HTML page instead of the artifact; check that the link is public"
                    .to_string(),
            ));
        }

        let mut file = tokio::fs::File::create(part)
            .await
            .map_err(|e| Attempt::Permanent(format!("cannot create {}: {e}", part.display())))?;

        let mut written = 0u64;
        let mut body = response.bytes_stream();
        while let Some(chunk) = body.next().await {
            let chunk = chunk.map_err(|e| Attempt::Transient(e.to_string()))?;
            file.write_all(&chunk)
                .await
                .map_err(|e| Attempt::Permanent(e.to_string()))?;
            written += chunk.len() as u64;
        }
        file.flush()
            .await
            .map_err(|e| Attempt::Permanent(e.to_string()))?;

        Ok(written)
    }
}

impl ArtifactFetcher for HttpFetcher {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        let url = direct_download_url(url);
        let name = artifact_name(dest);
        let part = part_path(dest);

        if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| FurnaceError::artifact(&name, e))?;
        }

        let mut backoff = self.config.initial_backoff();
        let mut last_err = String::new();

        for attempt in 0..=self.config.max_retries {
            if attempt > 0 {
                debug!(
                    "fetch: retry attempt {}/{} after {:?}",
                    attempt, self.config.max_retries, backoff
                );
                tokio::time::sleep(backoff).await;
                backoff = (backoff * 2).min(self.config.max_backoff());
            }

            match self.attempt(&url, &part).await {
                Ok(bytes) => {
                    tokio::fs::rename(&part, dest)
                        .await
                        .map_err(|e| FurnaceError::artifact(&name, e))?;
                    info!(artifact = %name, bytes, "Artifact downloaded");
                    return Ok(bytes);
                }
                Err(Attempt::Permanent(reason)) => {
                    let _ = tokio::fs::remove_file(&part).await;
                    return Err(FurnaceError::artifact(&name, reason));
                }
                Err(Attempt::Transient(reason)) => {
                    warn!(artifact = %name, attempt, error = %reason, "Artifact download failed");
                    last_err = reason;
                }
            }
        }

        let _ = tokio::fs::remove_file(&part).await;
        Err(FurnaceError::artifact(
            &name,
            format!(
                "all {} retries exhausted: {last_err}",
                self.config.max_retries
            ),
        ))
    }
}
