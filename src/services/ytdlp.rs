//! yt-dlp metadata client.
//!
//! All platform lookups go through the [`InfoProvider`] trait so the
//! resolution pipeline can be driven by a scripted provider in tests. The
//! production implementation shells out to the `yt-dlp` binary and parses
//! its `--dump-single-json` output.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;
use tokio::process::Command;

/// Errors raised by an info provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Per-item platform failure (video removed, private, transient).
    /// Callers may catch this and skip the item.
    #[error("download error for {url}: {message}")]
    Download { url: String, message: String },

    #[error("yt-dlp executable not found at {0}")]
    BinaryNotFound(String),

    #[error("unparseable yt-dlp output for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ProviderError {
    /// Whether this error concerns a single item and the batch may continue.
    pub fn is_per_item(&self) -> bool {
        matches!(self, ProviderError::Download { .. })
    }
}

/// A flat child reference inside a playlist/tab listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlatEntry {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
}

impl FlatEntry {
    /// The entry's URL, reconstructing a canonical watch URL from the id
    /// when the listing omitted it.
    pub fn resolved_url(&self) -> Option<String> {
        if let Some(url) = &self.url {
            if !url.is_empty() {
                return Some(url.clone());
            }
        }
        self.id
            .as_ref()
            .map(|id| format!("https://www.youtube.com/watch?v={}", id))
    }
}

/// Metadata record returned by a lookup.
///
/// Flat lookups fill `entries` and the shallow fields; full lookups add
/// description, duration and upload date. Fields the platform omits stay
/// `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InfoRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub webpage_url: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel: Option<String>,
    #[serde(default)]
    pub channel_url: Option<String>,
    #[serde(default)]
    pub uploader: Option<String>,
    #[serde(default)]
    pub uploader_id: Option<String>,
    #[serde(default)]
    pub uploader_url: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub duration: Option<f64>,
    /// Platform format `YYYYMMDD`.
    #[serde(default)]
    pub upload_date: Option<String>,
    #[serde(default)]
    pub entries: Vec<FlatEntry>,
}

/// Platform metadata lookup.
///
/// Implementations must be safe to call strictly sequentially; the pipeline
/// never issues concurrent lookups.
#[async_trait]
pub trait InfoProvider: Send + Sync {
    /// Shallow lookup: for collection pages, returns the child entry list
    /// without fetching per-child metadata.
    async fn extract_flat(&self, url: &str) -> Result<InfoRecord, ProviderError>;

    /// Full lookup for a single item, including description, duration and
    /// upload date.
    async fn extract_full(&self, url: &str) -> Result<InfoRecord, ProviderError>;
}

/// Production provider driving the `yt-dlp` binary.
pub struct YtDlpClient {
    binary: PathBuf,
}

impl YtDlpClient {
    pub fn new() -> Self {
        Self {
            binary: PathBuf::from("yt-dlp"),
        }
    }

    pub fn with_binary<P: Into<PathBuf>>(binary: P) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    async fn extract(&self, url: &str, flat: bool) -> Result<InfoRecord, ProviderError> {
        let mut command = Command::new(&self.binary);
        command.arg("--dump-single-json");
        command.arg("--no-warnings");
        command.arg("--quiet");
        if flat {
            command.arg("--flat-playlist");
        }
        command.arg(url);

        tracing::debug!("running yt-dlp (flat={}) for {}", flat, url);
        let output = command.output().await.map_err(|err| {
            if err.kind() == std::io::ErrorKind::NotFound {
                ProviderError::BinaryNotFound(self.binary.display().to_string())
            } else {
                ProviderError::Io(err)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(ProviderError::Download {
                url: url.to_string(),
                message: stderr.trim().to_string(),
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|err| ProviderError::Parse {
            url: url.to_string(),
            message: err.to_string(),
        })
    }
}

impl Default for YtDlpClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl InfoProvider for YtDlpClient {
    async fn extract_flat(&self, url: &str) -> Result<InfoRecord, ProviderError> {
        self.extract(url, true).await
    }

    async fn extract_full(&self, url: &str) -> Result<InfoRecord, ProviderError> {
        self.extract(url, false).await
    }
}
