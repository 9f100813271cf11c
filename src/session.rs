//! External catalog session boundary
//!
//! The core never talks to a live catalog site directly. Everything a
//! provider knows about a page arrives through [`CatalogSession`]: the
//! final URL, the visible text and any tables, already flattened to cell
//! strings. DOM traversal, selector heuristics, navigation and anti-bot
//! handling all live behind this trait, outside this crate's scope.
//!
//! [`ReplaySession`] is the bundled implementation: it serves page
//! snapshots captured to disk as JSON, keyed by the provider's request
//! label. The batch binary and the integration tests run against it.

use std::path::PathBuf;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A provider's request for one page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRequest {
    pub url: String,
    /// Stable label identifying the navigation step, e.g. `REALOEM_START`.
    pub label: String,
}

impl PageRequest {
    pub fn new(url: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
        }
    }
}

/// One table on a fetched page, flattened to rows of cell texts.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageTable {
    pub rows: Vec<Vec<String>>,
}

/// Everything the core sees of a fetched page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageContent {
    /// Final URL after any redirects/navigation.
    pub url: String,
    /// Visible page text.
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub tables: Vec<PageTable>,
}

/// Errors surfaced by a session implementation.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("page fetch failed: {0}")]
    Fetch(String),
    #[error("no snapshot for label '{0}'")]
    MissingSnapshot(String),
    #[error("snapshot read failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot parse failed: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The external fetch boundary shared by all providers of one resolution
/// run. Implementations own their timeouts and retry policy; the core
/// never retries.
#[async_trait]
pub trait CatalogSession: Send + Sync {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageContent, SessionError>;
}

/// Session that replays captured page snapshots from a directory.
///
/// A request with label `REALOEM_START` is served from
/// `<dir>/realoem_start.json`, a [`PageContent`] document.
pub struct ReplaySession {
    dir: PathBuf,
}

impl ReplaySession {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }
}

#[async_trait]
impl CatalogSession for ReplaySession {
    async fn fetch_page(&self, request: &PageRequest) -> Result<PageContent, SessionError> {
        let path = self
            .dir
            .join(format!("{}.json", request.label.to_lowercase()));
        if !path.exists() {
            return Err(SessionError::MissingSnapshot(request.label.clone()));
        }
        let bytes = tokio::fs::read(&path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
