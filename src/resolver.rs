//! Resolution entry point and provider execution boundary
//!
//! Drives one query end to end: parse, select providers, invoke each one
//! sequentially over the shared session, fuse the surviving candidates.
//! Provider failures are recovered here: logged with the provider identity
//! and error, contributing zero candidates, never aborting the query or
//! affecting other providers. Partial provider failure degrades coverage,
//! not correctness.

use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use crate::fusion::FusionEngine;
use crate::parser::QueryParser;
use crate::provider::{ProviderContext, ProviderRegistry};
use crate::session::CatalogSession;
use crate::types::{
    BatchInput, OemCandidate, ParsedSummary, ProviderId, ResolutionOutput, ResolverInput,
};
use crate::vocab::Vocabulary;

/// The core's only propagated failure mode: malformed batch input.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    #[error("invalid resolver input: {0}")]
    InvalidInput(String),
}

/// Parse and validate a JSON batch: one query object or
/// `{"queries": [...]}`. Fails before any provider work begins.
pub fn parse_batch(json: &str) -> Result<BatchInput, ResolverError> {
    serde_json::from_str(json).map_err(|e| ResolverError::InvalidInput(e.to_string()))
}

/// Resolves queries against a constructed-once registry and vocabulary.
pub struct OemResolver {
    parser: QueryParser,
    registry: ProviderRegistry,
    fusion: FusionEngine,
}

impl OemResolver {
    pub fn new(vocab: Arc<Vocabulary>, registry: ProviderRegistry, fusion: FusionEngine) -> Self {
        Self {
            parser: QueryParser::new(vocab),
            registry,
            fusion,
        }
    }

    /// Resolver with the standard provider set and baseline scoring.
    pub fn with_default_providers(vocab: Arc<Vocabulary>) -> Self {
        Self::new(
            vocab,
            ProviderRegistry::with_default_providers(),
            FusionEngine::default(),
        )
    }

    /// Resolve one query. Never fails: provider errors degrade coverage
    /// and an empty eligible set yields an explicit empty result.
    #[instrument(skip(self, input, session), fields(query = %input.raw_query))]
    pub async fn resolve(
        &self,
        input: &ResolverInput,
        session: &dyn CatalogSession,
    ) -> ResolutionOutput {
        let parsed = self.parser.parse(input);
        debug!(
            brand = ?parsed.normalized_brand,
            part = ?parsed.part_query,
            year = ?parsed.year,
            "parsed input"
        );

        let selected = self.registry.select(&parsed);
        if selected.is_empty() {
            info!(
                brand = ?parsed.brand,
                vin = ?parsed.vin,
                "no provider can handle query"
            );
            return ResolutionOutput {
                parsed_input: ParsedSummary::from(&parsed),
                candidates: Vec::new(),
                primary: None,
            };
        }

        let ctx = ProviderContext { session };
        let mut all_candidates: Vec<OemCandidate> = Vec::new();

        for provider in selected {
            debug!(provider = %provider.id(), "running provider");
            match provider.fetch(&parsed, &ctx).await {
                Ok(candidates) => {
                    log_provider_result(provider.id(), &candidates);
                    all_candidates.extend(candidates);
                }
                Err(error) => {
                    warn!(provider = %provider.id(), %error, "provider failed");
                }
            }
        }

        let ranked = self
            .fusion
            .fuse(&all_candidates, parsed.part_group_path.as_deref());
        let primary = ranked.first().cloned();

        ResolutionOutput {
            parsed_input: ParsedSummary::from(&parsed),
            candidates: ranked,
            primary,
        }
    }

    /// Resolve a batch sequentially: each query completes, providers and
    /// all, before the next begins (one shared session in flight).
    pub async fn resolve_batch(
        &self,
        batch: BatchInput,
        session: &dyn CatalogSession,
    ) -> Vec<ResolutionOutput> {
        let mut outputs = Vec::new();
        for input in batch.into_queries() {
            outputs.push(self.resolve(&input, session).await);
        }
        outputs
    }
}

/// Per-provider outcome line: count and a small OEM sample.
fn log_provider_result(id: ProviderId, candidates: &[OemCandidate]) {
    if candidates.is_empty() {
        debug!(provider = %id, "no OEM rows");
        return;
    }
    let sample: Vec<&str> = candidates.iter().take(3).map(|c| c.oem.as_str()).collect();
    info!(
        provider = %id,
        count = candidates.len(),
        ?sample,
        "provider produced candidates"
    );
}
