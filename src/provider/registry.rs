//! Provider registry and selection policy
//!
//! An explicit, constructed-once registry passed to the resolution entry
//! point. Read-only after startup; selection filters the registered
//! providers down to those capable of servicing one parsed query.

use std::sync::Arc;

use crate::provider::{
    AutodocProvider, FallbackSearchProvider, PartsouqProvider, Provider, RealOemProvider,
    SevenZapProvider,
};
use crate::types::ParsedQuery;

/// Registry of providers in registration order.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn Provider>>,
}

impl ProviderRegistry {
    /// An empty registry; register providers explicitly.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard provider set in its canonical order: structured
    /// catalogs first, cross-reference next, free-text fallback last.
    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(RealOemProvider));
        registry.register(Arc::new(SevenZapProvider));
        registry.register(Arc::new(PartsouqProvider));
        registry.register(Arc::new(AutodocProvider));
        registry.register(Arc::new(FallbackSearchProvider));
        registry
    }

    pub fn register(&mut self, provider: Arc<dyn Provider>) {
        self.providers.push(provider);
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Providers eligible for the query: brand-compatible (an empty
    /// supported set means unrestricted) and willing per `can_handle`.
    pub fn select(&self, query: &ParsedQuery) -> Vec<Arc<dyn Provider>> {
        self.providers
            .iter()
            .filter(|provider| {
                let brands = provider.supported_brands();
                if !brands.is_empty() {
                    match query.normalized_brand.as_deref() {
                        Some(brand) if brands.contains(&brand) => {}
                        _ => return false,
                    }
                }
                provider.can_handle(query)
            })
            .cloned()
            .collect()
    }
}
