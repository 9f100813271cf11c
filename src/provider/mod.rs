//! Provider contract and concrete source variants
//!
//! A provider is a capability descriptor over one external parts source:
//! the canonical brands it can serve (empty = unrestricted), a predicate
//! deciding whether it applies to a parsed query, and a fetch operation
//! that turns session page content into [`OemCandidate`]s. Providers are
//! stateless and registered once at startup; new sources are added by
//! registering a new variant, never by touching the fusion engine.

pub mod autodoc;
pub mod extract;
pub mod fallback;
pub mod partsouq;
pub mod real_oem;
pub mod registry;
pub mod seven_zap;

use async_trait::async_trait;

use crate::session::{CatalogSession, SessionError};
use crate::types::{OemCandidate, ParsedQuery, ProviderId};

pub use autodoc::AutodocProvider;
pub use fallback::FallbackSearchProvider;
pub use partsouq::PartsouqProvider;
pub use real_oem::RealOemProvider;
pub use registry::ProviderRegistry;
pub use seven_zap::SevenZapProvider;

/// Shared execution context handed to every provider invocation of one
/// query. The session is the single external fetch channel all providers
/// of a run share.
pub struct ProviderContext<'a> {
    pub session: &'a dyn CatalogSession,
}

/// Errors a provider surfaces to the execution boundary. Recovered there;
/// a failing provider contributes zero candidates and never aborts the
/// query.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("extraction failed: {0}")]
    Extraction(String),
}

/// Contract every external parts source satisfies.
#[async_trait]
pub trait Provider: Send + Sync {
    fn id(&self) -> ProviderId;

    /// Canonical brands this provider can serve. Empty = unrestricted.
    fn supported_brands(&self) -> &[&str] {
        &[]
    }

    /// Applicability predicate over the parsed query.
    fn can_handle(&self, query: &ParsedQuery) -> bool;

    /// Fetch candidates for the query through the shared session.
    async fn fetch(
        &self,
        query: &ParsedQuery,
        ctx: &ProviderContext<'_>,
    ) -> Result<Vec<OemCandidate>, ProviderError>;
}

/// Provenance metadata echoed onto candidates: the query fields the page
/// was reached with.
pub(crate) fn query_meta(
    brand: Option<&str>,
    query: &ParsedQuery,
) -> std::collections::HashMap<String, serde_json::Value> {
    let mut meta = std::collections::HashMap::new();
    if let Some(brand) = brand {
        meta.insert("brand".to_string(), serde_json::Value::from(brand));
    }
    if let Some(vin) = &query.vin {
        meta.insert("vin".to_string(), serde_json::Value::from(vin.as_str()));
    }
    if let Some(model) = &query.model {
        meta.insert("model".to_string(), serde_json::Value::from(model.as_str()));
    }
    if let Some(year) = query.year {
        meta.insert("year".to_string(), serde_json::Value::from(year));
    }
    meta
}
