//! OEM Resolver - Multi-source part number resolution
//!
//! Resolves free-text or partially-structured vehicle-part queries
//! ("2014 VW Golf spark plug") into canonical manufacturer part numbers by
//! querying several independent, unreliable catalog sources and fusing
//! their noisy, overlapping outputs into one ranked, confidence-scored
//! answer set.
//!
//! # Architecture
//!
//! ```text
//! Raw query + hints
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  QueryParser                            │
//! │  brand/part aliases, year, engine,      │
//! │  model → ParsedQuery                    │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  ProviderRegistry                       │
//! │  capability filter → eligible providers │
//! └─────────────────────────────────────────┘
//!       │ sequential, failure-isolated
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  Providers over CatalogSession          │
//! │  REALOEM │ 7ZAP │ PARTSOUQ │ AUTODOC │  │
//! │  FALLBACK → OemCandidates               │
//! └─────────────────────────────────────────┘
//!       │
//!       ▼
//! ┌─────────────────────────────────────────┐
//! │  FusionEngine                           │
//! │  group by normalized OEM, score, rank   │
//! │  → FusedOemResults + primary            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use oem_resolver::{OemResolver, ReplaySession, ResolverInput, Vocabulary};
//!
//! let vocab = Arc::new(Vocabulary::builtin());
//! let resolver = OemResolver::with_default_providers(vocab);
//! let session = ReplaySession::new("snapshots");
//!
//! let output = resolver
//!     .resolve(&ResolverInput::from_text("2014 VW Golf spark plug"), &session)
//!     .await;
//! ```

pub mod fusion;
pub mod normalize;
pub mod parser;
pub mod provider;
pub mod resolver;
pub mod session;
pub mod types;
pub mod vocab;

// Re-export main types
pub use fusion::{FusionConfig, FusionEngine};
pub use parser::QueryParser;
pub use provider::{
    AutodocProvider, FallbackSearchProvider, PartsouqProvider, Provider, ProviderContext,
    ProviderError, ProviderRegistry, RealOemProvider, SevenZapProvider,
};
pub use resolver::{parse_batch, OemResolver, ResolverError};
pub use session::{CatalogSession, PageContent, PageRequest, PageTable, ReplaySession, SessionError};
pub use types::{
    BatchInput, FusedOemResult, OemCandidate, ParsedQuery, ParsedSummary, ProviderId,
    ResolutionOutput, ResolverInput, SourceKind,
};
pub use vocab::{Vocabulary, VocabularyError};
