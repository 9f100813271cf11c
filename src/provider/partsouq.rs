//! Partsouq provider: Asian-brand EPC catalog with VIN search

use async_trait::async_trait;
use tracing::debug;

use crate::normalize::{looks_like_oem, normalize_oem};
use crate::provider::{query_meta, Provider, ProviderContext, ProviderError};
use crate::session::PageRequest;
use crate::types::{OemCandidate, ParsedQuery, ProviderId, SourceKind};

const BASE_URL: &str = "https://partsouq.com";
const VIN_URL: &str = "https://partsouq.com/en/vin";

const SUPPORTED_BRANDS: &[&str] = &[
    "TOYOTA",
    "LEXUS",
    "NISSAN",
    "INFINITI",
    "HYUNDAI",
    "KIA",
    "MITSUBISHI",
    "SUBARU",
    "MAZDA",
    "HONDA",
    "SUZUKI",
];

const CONFIDENCE_WITH_VIN: f64 = 0.94;
const CONFIDENCE_WITHOUT_VIN: f64 = 0.87;

/// Part names that pass the description filter even when they do not
/// contain the queried part text verbatim; catalog rows often abbreviate
/// ("element" for filter inserts).
const DESCRIPTION_ALLOWLIST: &[&str] = &["spark plug", "air filter", "element"];

/// Asian-brand catalog. Diagram tables link the part number in the first
/// cell with the part name beside it.
pub struct PartsouqProvider;

#[async_trait]
impl Provider for PartsouqProvider {
    fn id(&self) -> ProviderId {
        ProviderId::Partsouq
    }

    fn supported_brands(&self) -> &[&str] {
        SUPPORTED_BRANDS
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        let brand_supported = query
            .normalized_brand
            .as_deref()
            .map(|b| SUPPORTED_BRANDS.contains(&b))
            .unwrap_or(false);
        query.part_query.is_some() && brand_supported
    }

    async fn fetch(
        &self,
        query: &ParsedQuery,
        ctx: &ProviderContext<'_>,
    ) -> Result<Vec<OemCandidate>, ProviderError> {
        let Some(brand) = query.normalized_brand.as_deref() else {
            return Ok(Vec::new());
        };

        let (url, base_confidence) = if query.vin.is_some() {
            (VIN_URL, CONFIDENCE_WITH_VIN)
        } else {
            (BASE_URL, CONFIDENCE_WITHOUT_VIN)
        };

        debug!(brand, part = ?query.part_query, "partsouq: fetching diagram table");
        let page = ctx
            .session
            .fetch_page(&PageRequest::new(url, "PARTSOUQ_START"))
            .await?;

        let part_filter = query
            .normalized_part_query
            .as_deref()
            .unwrap_or("")
            .to_lowercase();

        let mut results = Vec::new();
        for table in &page.tables {
            for cells in &table.rows {
                if cells.len() < 2 {
                    continue;
                }
                let raw_oem = cells[0].trim();
                let name = cells[1].trim();
                if raw_oem.is_empty() || !looks_like_oem(raw_oem) {
                    continue;
                }

                let name_lower = name.to_lowercase();
                if !part_filter.is_empty()
                    && !name_lower.contains(&part_filter)
                    && !DESCRIPTION_ALLOWLIST
                        .iter()
                        .any(|allowed| name_lower.contains(allowed))
                {
                    continue;
                }

                let oem = normalize_oem(raw_oem);
                if oem.is_empty() {
                    continue;
                }

                results.push(OemCandidate {
                    oem,
                    raw_oem: Some(raw_oem.to_string()),
                    description: Some(name.to_string()),
                    group_path: query.part_group_path.clone(),
                    provider: self.id(),
                    url: Some(page.url.clone()),
                    confidence: Some(base_confidence),
                    source_kind: SourceKind::Epc,
                    meta: query_meta(Some(brand), query),
                });
            }
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toyota_query() -> ParsedQuery {
        ParsedQuery {
            raw_query: "toyota corolla air filter".to_string(),
            normalized_brand: Some("TOYOTA".to_string()),
            part_query: Some("air filter".to_string()),
            normalized_part_query: Some("air filter".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn handles_asian_brands_with_part_query() {
        let provider = PartsouqProvider;
        assert!(provider.can_handle(&toyota_query()));

        let mut european = toyota_query();
        european.normalized_brand = Some("VOLKSWAGEN".to_string());
        assert!(!provider.can_handle(&european));
    }
}
