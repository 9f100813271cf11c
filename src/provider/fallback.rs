//! Fallback provider: free-text web search for OEM-shaped tokens
//!
//! Trades precision for recall: scans search result pages for anything
//! OEM-shaped. Only engages when no brand or VIN signal is present, so it
//! never competes with the structured catalogs.

use async_trait::async_trait;
use tracing::debug;
use url::Url;

use crate::provider::extract::extract_oem_tokens;
use crate::provider::{Provider, ProviderContext, ProviderError};
use crate::session::PageRequest;
use crate::types::{OemCandidate, ParsedQuery, ProviderId, SourceKind};

const SEARCH_BASE: &str = "https://www.google.com/search";

/// Free-text extraction is the least trusted source.
const BASE_CONFIDENCE: f64 = 0.4;

/// Catch-all provider for queries no structured source can serve.
pub struct FallbackSearchProvider;

impl FallbackSearchProvider {
    /// Search terms tried in order, deduplicated.
    fn search_terms(query: &ParsedQuery) -> Vec<String> {
        let brand = query
            .normalized_brand
            .as_deref()
            .or(query.brand.as_deref())
            .unwrap_or("");
        let model = query.model.as_deref().unwrap_or("");
        let part = query.part_query.as_deref().unwrap_or("");

        let raw_terms = [
            format!("{brand} {model} {part}"),
            format!("{part} {model}"),
        ];

        let mut seen = std::collections::HashSet::new();
        raw_terms
            .iter()
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .filter(|t| !t.is_empty())
            .filter(|t| seen.insert(t.clone()))
            .collect()
    }
}

#[async_trait]
impl Provider for FallbackSearchProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Fallback
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        let has_text = query.part_query.is_some() || !query.raw_query.is_empty();
        let has_brand_or_vin =
            query.vin.is_some() || query.normalized_brand.is_some() || query.brand.is_some();
        has_text && !has_brand_or_vin
    }

    async fn fetch(
        &self,
        query: &ParsedQuery,
        ctx: &ProviderContext<'_>,
    ) -> Result<Vec<OemCandidate>, ProviderError> {
        let mut results = Vec::new();

        for term in Self::search_terms(query) {
            let search_url = Url::parse_with_params(
                SEARCH_BASE,
                &[("q", format!("site:7zap.com {term}"))],
            )
            .map_err(|e| ProviderError::Extraction(format!("invalid search url: {e}")))?;

            debug!(%term, "fallback: scanning search results");
            let page = ctx
                .session
                .fetch_page(&PageRequest::new(search_url.as_str(), "FALLBACK_SEARCH"))
                .await?;

            for token in extract_oem_tokens(&page.text) {
                let mut meta = std::collections::HashMap::new();
                meta.insert("term".to_string(), serde_json::Value::from(term.as_str()));

                results.push(OemCandidate {
                    oem: token.oem,
                    raw_oem: Some(token.raw_oem),
                    description: Some("Fallback extracted OEM-like string".to_string()),
                    group_path: None,
                    provider: self.id(),
                    url: Some(page.url.clone()),
                    confidence: Some(BASE_CONFIDENCE),
                    source_kind: SourceKind::FreeText,
                    meta,
                });
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engages_only_without_brand_or_vin_signal() {
        let provider = FallbackSearchProvider;

        let bare = ParsedQuery {
            raw_query: "mystery part 06H905611".to_string(),
            part_query: Some("06H905611".to_string()),
            ..Default::default()
        };
        assert!(provider.can_handle(&bare));

        let branded = ParsedQuery {
            normalized_brand: Some("VOLKSWAGEN".to_string()),
            ..bare.clone()
        };
        assert!(!provider.can_handle(&branded));

        let with_vin = ParsedQuery {
            vin: Some("WVWZZZ1KZAW000001".to_string()),
            ..bare
        };
        assert!(!provider.can_handle(&with_vin));
    }

    #[test]
    fn search_terms_are_deduplicated_and_trimmed() {
        let query = ParsedQuery {
            part_query: Some("oil filter".to_string()),
            ..Default::default()
        };
        // Without brand and model both templates collapse to the same term.
        let terms = FallbackSearchProvider::search_terms(&query);
        assert_eq!(terms, vec!["oil filter".to_string()]);
    }
}
