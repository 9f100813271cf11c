//! Autodoc provider: brand-agnostic OEM cross-reference listings

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;
use url::Url;

use crate::normalize::{looks_like_oem, normalize_oem};
use crate::provider::{query_meta, Provider, ProviderContext, ProviderError};
use crate::session::PageRequest;
use crate::types::{OemCandidate, ParsedQuery, ProviderId, SourceKind};

const SEARCH_BASE: &str = "https://www.autodoc.de/auto-teile/";

/// Cross-references stabilize fusion; boosted later when an EPC source
/// agrees.
const BASE_CONFIDENCE: f64 = 0.7;

/// Queries carrying a 5+ digit run are already OEM-shaped and searchable
/// without a brand.
static OEM_SHAPED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d{5,}").expect("digit run pattern is valid"));

/// Lines worth scanning for cross-referenced numbers.
static OEM_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)OEM|OE\s*number").expect("oem block pattern is valid"));

/// Token separators inside a cross-reference block.
static TOKEN_SPLIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s,;/]+").expect("token split pattern is valid"));

/// Aftermarket catalog whose product pages list the OEM numbers a part
/// replaces. Works as a cross-reference for most brands.
pub struct AutodocProvider;

#[async_trait]
impl Provider for AutodocProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Autodoc
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        let Some(part_query) = query.part_query.as_deref() else {
            return false;
        };
        query.normalized_brand.is_some() || OEM_SHAPED_RE.is_match(part_query)
    }

    async fn fetch(
        &self,
        query: &ParsedQuery,
        ctx: &ProviderContext<'_>,
    ) -> Result<Vec<OemCandidate>, ProviderError> {
        let Some(part_query) = query.part_query.as_deref() else {
            return Ok(Vec::new());
        };

        let search_url = Url::parse(SEARCH_BASE)
            .and_then(|base| base.join(part_query))
            .map_err(|e| ProviderError::Extraction(format!("invalid search url: {e}")))?;

        debug!(part = part_query, "autodoc: searching cross-references");
        let page = ctx
            .session
            .fetch_page(&PageRequest::new(search_url.as_str(), "AUTODOC_SEARCH"))
            .await?;

        let mut seen = std::collections::HashSet::new();
        let mut results = Vec::new();

        for line in page.text.lines() {
            if !OEM_BLOCK_RE.is_match(line) {
                continue;
            }
            for token in TOKEN_SPLIT_RE.split(line) {
                if !looks_like_oem(token) {
                    continue;
                }
                let oem = normalize_oem(token);
                if oem.is_empty() || !seen.insert(oem.clone()) {
                    continue;
                }
                results.push(OemCandidate {
                    oem,
                    raw_oem: Some(token.to_string()),
                    description: Some("Autodoc cross-reference".to_string()),
                    group_path: None,
                    provider: self.id(),
                    url: Some(page.url.clone()),
                    confidence: Some(BASE_CONFIDENCE),
                    source_kind: SourceKind::CrossRef,
                    meta: query_meta(query.normalized_brand.as_deref(), query),
                });
            }
        }

        Ok(results)
    }
}
