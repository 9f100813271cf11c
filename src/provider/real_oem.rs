//! RealOEM provider: BMW EPC catalog

use async_trait::async_trait;
use tracing::debug;

use crate::normalize::{looks_like_oem, normalize_oem};
use crate::provider::{query_meta, Provider, ProviderContext, ProviderError};
use crate::session::PageRequest;
use crate::types::{OemCandidate, ParsedQuery, ProviderId, SourceKind};

const BASE_URL: &str = "https://www.realoem.com";
const SUPPORTED_BRANDS: &[&str] = &["BMW"];

/// VIN-anchored lookups pin the exact vehicle, so they score higher.
const CONFIDENCE_WITH_VIN: f64 = 0.97;
const CONFIDENCE_WITHOUT_VIN: f64 = 0.92;

/// BMW-only structured catalog. Extracts part rows from the parts table
/// ("Part Number" column) and keeps those whose description mentions the
/// queried part.
pub struct RealOemProvider;

#[async_trait]
impl Provider for RealOemProvider {
    fn id(&self) -> ProviderId {
        ProviderId::RealOem
    }

    fn supported_brands(&self) -> &[&str] {
        SUPPORTED_BRANDS
    }

    fn can_handle(&self, query: &ParsedQuery) -> bool {
        query.part_query.is_some() && query.normalized_brand.as_deref() == Some("BMW")
    }

    async fn fetch(
        &self,
        query: &ParsedQuery,
        ctx: &ProviderContext<'_>,
    ) -> Result<Vec<OemCandidate>, ProviderError> {
        let base_confidence = if query.vin.is_some() {
            CONFIDENCE_WITH_VIN
        } else {
            CONFIDENCE_WITHOUT_VIN
        };

        debug!(part = ?query.part_query, "realoem: fetching parts table");
        let page = ctx
            .session
            .fetch_page(&PageRequest::new(BASE_URL, "REALOEM_START"))
            .await?;

        let part_filter = query
            .normalized_part_query
            .as_deref()
            .unwrap_or("")
            .to_lowercase();

        let mut results = Vec::new();
        for table in &page.tables {
            for cells in &table.rows {
                // Parts tables carry description in the second text cell and
                // the part number second from the end (quantity trails it).
                let texts: Vec<&str> = cells
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect();
                if texts.is_empty() {
                    continue;
                }

                let description = texts.get(1).copied().unwrap_or_default();
                let raw_oem = if texts.len() >= 2 {
                    texts[texts.len() - 2]
                } else {
                    texts[texts.len() - 1]
                };

                if !looks_like_oem(raw_oem) {
                    continue;
                }

                let description_lower = description.to_lowercase();
                if !part_filter.is_empty()
                    && !description_lower.contains(&part_filter)
                    && !description_lower.contains("spark plug")
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
                    description: Some(description.to_string()),
                    group_path: query.part_group_path.clone(),
                    provider: self.id(),
                    url: Some(page.url.clone()),
                    confidence: Some(base_confidence),
                    source_kind: SourceKind::Epc,
                    meta: query_meta(Some("BMW"), query),
                });
            }
        }

        Ok(results)
    }
}
