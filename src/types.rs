//! Core data model for OEM resolution
//!
//! Wire shapes follow the original batch JSON contract (camelCase field
//! names, `REALOEM`/`7ZAP`/... provider tags). `ParsedQuery` is the
//! immutable normalized view of one input query; `OemCandidate` is one
//! provider observation; `FusedOemResult` is one scored group of
//! observations that agree on a normalized OEM.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// INPUT
// ============================================================================

/// One raw resolution query: required free text plus optional structured
/// hints. Immutable input.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolverInput {
    /// Free-text query, e.g. "2014 VW Golf spark plug".
    pub raw_query: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub engine_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub part_query: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locale: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country_code: Option<String>,
}

impl ResolverInput {
    /// Convenience constructor for a bare free-text query.
    pub fn from_text(raw_query: impl Into<String>) -> Self {
        Self {
            raw_query: raw_query.into(),
            vin: None,
            brand: None,
            model: None,
            year: None,
            engine_code: None,
            part_query: None,
            locale: None,
            country_code: None,
        }
    }
}

/// Batch input: either one query object or `{"queries": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum BatchInput {
    Single(ResolverInput),
    Many { queries: Vec<ResolverInput> },
}

impl BatchInput {
    pub fn into_queries(self) -> Vec<ResolverInput> {
        match self {
            BatchInput::Single(input) => vec![input],
            BatchInput::Many { queries } => queries,
        }
    }
}

// ============================================================================
// PARSED QUERY
// ============================================================================

/// Normalized view of one [`ResolverInput`]. Created once per input and
/// never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct ParsedQuery {
    pub raw_query: String,
    pub vin: Option<String>,
    /// Brand as resolved (explicit hint surface form, or canonical on a
    /// free-text match).
    pub brand: Option<String>,
    /// Canonical brand name, e.g. `VOLKSWAGEN`.
    pub normalized_brand: Option<String>,
    /// Derived model, at most 5 tokens, upper-cased.
    pub model: Option<String>,
    /// Extracted year in `[1980, 2035]`, or the explicit hint.
    pub year: Option<i32>,
    pub engine_code: Option<String>,
    pub part_query: Option<String>,
    /// Canonical part name, or bare normalized text when no synonym matched.
    pub normalized_part_query: Option<String>,
    /// Taxonomy path (1-3 labels) of the canonical part, if known.
    pub part_group_path: Option<Vec<String>>,
    pub locale: Option<String>,
    pub country_code: Option<String>,
}

/// The echoed subset of a [`ParsedQuery`] carried in the output.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub part_query: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vin: Option<String>,
}

impl From<&ParsedQuery> for ParsedSummary {
    fn from(parsed: &ParsedQuery) -> Self {
        Self {
            brand: parsed
                .brand
                .clone()
                .or_else(|| parsed.normalized_brand.clone()),
            model: parsed.model.clone(),
            year: parsed.year,
            engine_code: parsed.engine_code.clone(),
            part_query: parsed.part_query.clone(),
            vin: parsed.vin.clone(),
        }
    }
}

// ============================================================================
// PROVIDERS AND CANDIDATES
// ============================================================================

/// Identity of a data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ProviderId {
    #[serde(rename = "REALOEM")]
    RealOem,
    #[serde(rename = "7ZAP")]
    SevenZap,
    #[serde(rename = "PARTSOUQ")]
    Partsouq,
    #[serde(rename = "AUTODOC")]
    Autodoc,
    #[serde(rename = "FALLBACK")]
    Fallback,
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            ProviderId::RealOem => "REALOEM",
            ProviderId::SevenZap => "7ZAP",
            ProviderId::Partsouq => "PARTSOUQ",
            ProviderId::Autodoc => "AUTODOC",
            ProviderId::Fallback => "FALLBACK",
        };
        f.write_str(tag)
    }
}

/// How a candidate was obtained. Structured catalog lookups are trusted
/// more than free-text fallback scraping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceKind {
    /// Structured parts-catalog (EPC) lookup.
    #[serde(rename = "EPC")]
    Epc,
    /// Cross-reference listing on an aftermarket site.
    #[serde(rename = "CROSSREF")]
    CrossRef,
    /// OEM-shaped tokens scanned out of arbitrary page text.
    #[serde(rename = "FREETEXT")]
    FreeText,
}

/// One provider's raw observation of an OEM.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OemCandidate {
    /// Normalized OEM string.
    pub oem: String,
    /// The OEM as it appeared on the page, before normalization.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_oem: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Taxonomy path, if the source exposed one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub group_path: Option<Vec<String>>,
    pub provider: ProviderId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Per-observation confidence in `[0, 1)`. `None` when the provider did
    /// not self-assess; fusion then falls back to its static trust weight.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    pub source_kind: SourceKind,
    /// Arbitrary provenance metadata (query echoes, search terms).
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub meta: HashMap<String, serde_json::Value>,
}

// ============================================================================
// FUSED RESULTS
// ============================================================================

/// One normalized OEM with every observation that agreed on it and the
/// combined confidence, always clamped to `[0, 0.99]`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FusedOemResult {
    pub oem: String,
    pub confidence: f64,
    /// Distinct providers that contributed to this group.
    pub providers: BTreeSet<ProviderId>,
    /// Description of the highest individually-confident member.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_path: Option<Vec<String>>,
    /// The contributing observations, normalized.
    pub candidates: Vec<OemCandidate>,
}

/// Result for one input query: the parsed snapshot, the ranked fused list
/// and the top-ranked entry as primary (absent when the list is empty).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolutionOutput {
    pub parsed_input: ParsedSummary,
    pub candidates: Vec<FusedOemResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary: Option<FusedOemResult>,
}
