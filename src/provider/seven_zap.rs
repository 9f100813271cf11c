//! 7zap provider: European-brand EPC catalogs

use async_trait::async_trait;
use tracing::debug;

use crate::normalize::{looks_like_oem, normalize_oem};
use crate::provider::extract::{extract_oem_rows, TableExtractOptions};
use crate::provider::{query_meta, Provider, ProviderContext, ProviderError};
use crate::session::PageRequest;
use crate::types::{OemCandidate, ParsedQuery, ProviderId, SourceKind};

const BASE_URL: &str = "https://7zap.com";

const SUPPORTED_BRANDS: &[&str] = &[
    "VOLKSWAGEN",
    "AUDI",
    "SEAT",
    "SKODA",
    "MERCEDES-BENZ",
    "OPEL",
    "FORD",
    "RENAULT",
    "PEUGEOT",
    "CITROEN",
    "FIAT",
    "MAZDA",
    "TOYOTA",
];

const CONFIDENCE_WITH_VIN: f64 = 0.93;
const CONFIDENCE_WITHOUT_VIN: f64 = 0.84;

/// Multi-brand European EPC mirror. Parts tables carry the description in
/// the second cell and the part number in the last.
pub struct SevenZapProvider;

#[async_trait]
impl Provider for SevenZapProvider {
    fn id(&self) -> ProviderId {
        ProviderId::SevenZap
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

        let base_confidence = if query.vin.is_some() {
            CONFIDENCE_WITH_VIN
        } else {
            CONFIDENCE_WITHOUT_VIN
        };

        debug!(brand, part = ?query.part_query, "7zap: fetching parts table");
        let page = ctx
            .session
            .fetch_page(&PageRequest::new(BASE_URL, "SEVENZAP_START"))
            .await?;

        let options = TableExtractOptions::default();
        let mut results = Vec::new();
        for table in &page.tables {
            for row in extract_oem_rows(table, &options) {
                if !looks_like_oem(&row.raw_oem) {
                    continue;
                }
                let oem = normalize_oem(&row.raw_oem);
                if oem.is_empty() {
                    continue;
                }
                results.push(OemCandidate {
                    oem,
                    raw_oem: Some(row.raw_oem.clone()),
                    description: if row.description.is_empty() {
                        None
                    } else {
                        Some(row.description.clone())
                    },
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
