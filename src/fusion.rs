//! Candidate fusion: grouping, scoring and ranking
//!
//! Turns the bag of noisy observations collected from all providers for one
//! query into a ranked, confidence-scored result list. Pure function of the
//! candidate list and the expected taxonomy path: the outcome is identical
//! regardless of how many providers ran or in what order, as long as the
//! candidate multiset is the same.
//!
//! Scoring formula: per-group base confidence is the maximum of each
//! member's own reported confidence (static per-provider trust weight when
//! a member has none), plus additive bonuses for corroboration, provider
//! diversity, taxonomy agreement and structured-source membership, clamped
//! to `[0, 0.99]`. Confidence 1.0 is never asserted.

use std::collections::{BTreeSet, HashMap};

use crate::normalize::{normalize_oem, OEM_MIN_LEN};
use crate::types::{FusedOemResult, OemCandidate, ProviderId, SourceKind};

/// Named scoring constants. Defaults are the documented baseline.
#[derive(Debug, Clone)]
pub struct FusionConfig {
    /// Increment per independent observation beyond the first.
    pub corroboration_step: f64,
    /// Cap on the total corroboration bonus.
    pub corroboration_cap: f64,
    /// Flat bonus when more than one distinct provider contributed.
    pub diversity_bonus: f64,
    /// Flat bonus when a member's taxonomy path intersects the expected one.
    pub taxonomy_bonus: f64,
    /// Flat bonus when a member came from a structured catalog lookup.
    pub structured_bonus: f64,
    /// Static trust weight per provider, used when a candidate carries no
    /// confidence of its own.
    pub provider_weights: HashMap<ProviderId, f64>,
    /// Floor weight for providers missing from the table.
    pub fallback_weight: f64,
    /// Combined confidence ceiling; 1.0 is reserved.
    pub max_confidence: f64,
}

impl Default for FusionConfig {
    fn default() -> Self {
        let provider_weights = [
            (ProviderId::RealOem, 0.92),
            (ProviderId::SevenZap, 0.88),
            (ProviderId::Partsouq, 0.90),
            (ProviderId::Autodoc, 0.72),
            (ProviderId::Fallback, 0.45),
        ]
        .into_iter()
        .collect();

        Self {
            corroboration_step: 0.05,
            corroboration_cap: 0.15,
            diversity_bonus: 0.05,
            taxonomy_bonus: 0.03,
            structured_bonus: 0.02,
            provider_weights,
            fallback_weight: 0.4,
            max_confidence: 0.99,
        }
    }
}

impl FusionConfig {
    /// Trust weight for a provider's unscored observations.
    pub fn trust_weight(&self, provider: ProviderId) -> f64 {
        self.provider_weights
            .get(&provider)
            .copied()
            .unwrap_or(self.fallback_weight)
    }
}

/// Groups, scores and ranks candidates.
#[derive(Debug, Clone, Default)]
pub struct FusionEngine {
    config: FusionConfig,
}

impl FusionEngine {
    pub fn new(config: FusionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &FusionConfig {
        &self.config
    }

    /// Fuse a completed candidate list into the ranked result list.
    ///
    /// The first entry of the returned list is the primary result.
    pub fn fuse(
        &self,
        candidates: &[OemCandidate],
        expected_group_path: Option<&[String]>,
    ) -> Vec<FusedOemResult> {
        // Group by normalized OEM key, preserving first-seen order so the
        // final ranking has a stable tie-break.
        let mut order: Vec<String> = Vec::new();
        let mut groups: HashMap<String, Vec<OemCandidate>> = HashMap::new();

        for candidate in candidates {
            let key = normalize_oem(&candidate.oem);
            if key.len() < OEM_MIN_LEN {
                continue;
            }
            let entry = groups.entry(key.clone()).or_default();
            if entry.is_empty() {
                order.push(key.clone());
            }
            let mut member = candidate.clone();
            member.oem = key;
            entry.push(member);
        }

        let mut results: Vec<FusedOemResult> = order
            .iter()
            .map(|key| self.score_group(key, &groups[key], expected_group_path))
            .collect();

        // Stable sort: equal confidences keep grouping order.
        results.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        results
    }

    fn score_group(
        &self,
        key: &str,
        members: &[OemCandidate],
        expected_group_path: Option<&[String]>,
    ) -> FusedOemResult {
        let cfg = &self.config;

        let providers: BTreeSet<ProviderId> = members.iter().map(|m| m.provider).collect();

        let base = members
            .iter()
            .map(|m| self.member_confidence(m))
            .fold(0.0_f64, f64::max);

        let corroboration =
            ((members.len().saturating_sub(1)) as f64 * cfg.corroboration_step)
                .min(cfg.corroboration_cap);

        let diversity = if providers.len() > 1 {
            cfg.diversity_bonus
        } else {
            0.0
        };

        let taxonomy = match expected_group_path {
            Some(expected) if !expected.is_empty() => {
                let matches = members.iter().any(|m| {
                    m.group_path
                        .as_deref()
                        .map(|path| path.iter().any(|label| expected.contains(label)))
                        .unwrap_or(false)
                });
                if matches {
                    cfg.taxonomy_bonus
                } else {
                    0.0
                }
            }
            _ => 0.0,
        };

        let structured = if members.iter().any(|m| m.source_kind == SourceKind::Epc) {
            cfg.structured_bonus
        } else {
            0.0
        };

        let combined = clamp(
            base + corroboration + diversity + taxonomy + structured,
            0.0,
            cfg.max_confidence,
        );

        // Representative record: the first highest individually-confident
        // member carries the description/URL.
        let mut best = &members[0];
        for member in &members[1..] {
            if member.confidence.unwrap_or(0.0) > best.confidence.unwrap_or(0.0) {
                best = member;
            }
        }

        FusedOemResult {
            oem: key.to_string(),
            confidence: combined,
            providers,
            description: best.description.clone(),
            url: best.url.clone(),
            group_path: best.group_path.clone(),
            candidates: members.to_vec(),
        }
    }

    /// A member's own confidence when it reported one (zero counts as
    /// unreported), else its provider's static trust weight.
    fn member_confidence(&self, member: &OemCandidate) -> f64 {
        member
            .confidence
            .filter(|c| *c > 0.0)
            .unwrap_or_else(|| self.config.trust_weight(member.provider))
    }
}

fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(oem: &str, provider: ProviderId, confidence: Option<f64>) -> OemCandidate {
        OemCandidate {
            oem: oem.to_string(),
            raw_oem: Some(oem.to_string()),
            description: Some(format!("{provider} row")),
            group_path: None,
            provider,
            url: None,
            confidence,
            source_kind: SourceKind::Epc,
            meta: Default::default(),
        }
    }

    #[test]
    fn punctuation_variants_collapse_into_one_group() {
        let engine = FusionEngine::default();
        let candidates = vec![
            candidate("12120037244", ProviderId::RealOem, Some(0.9)),
            candidate("12 12 0 037 244", ProviderId::SevenZap, Some(0.85)),
        ];

        let results = engine.fuse(&candidates, None);
        assert_eq!(results.len(), 1);

        let fused = &results[0];
        assert_eq!(fused.oem, "12120037244");
        assert_eq!(
            fused.providers,
            BTreeSet::from([ProviderId::RealOem, ProviderId::SevenZap])
        );
        // Corroboration + diversity bonuses push past the best member.
        assert!(fused.confidence > 0.9);
        assert!(fused.confidence <= 0.99);
    }

    #[test]
    fn ranking_is_descending_and_primary_is_first() {
        let engine = FusionEngine::default();
        let candidates = vec![
            candidate("AAA1111111", ProviderId::Autodoc, Some(0.6)),
            candidate("BBB2222222", ProviderId::RealOem, Some(0.9)),
        ];

        let results = engine.fuse(&candidates, None);
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].oem, "BBB2222222");
        assert!(results[0].confidence > results[1].confidence);
    }

    #[test]
    fn confidence_is_clamped_below_one() {
        let engine = FusionEngine::default();
        let candidates = vec![
            candidate("12120037244", ProviderId::RealOem, Some(0.97)),
            candidate("12120037244", ProviderId::SevenZap, Some(0.93)),
            candidate("12120037244", ProviderId::Partsouq, Some(0.94)),
            candidate("12120037244", ProviderId::Autodoc, Some(0.7)),
        ];

        let results = engine.fuse(&candidates, None);
        assert_eq!(results[0].confidence, 0.99);
    }

    #[test]
    fn short_oems_never_reach_the_output() {
        let engine = FusionEngine::default();
        let candidates = vec![
            candidate("AB12", ProviderId::Fallback, Some(0.4)),
            candidate("123456", ProviderId::Fallback, Some(0.4)),
        ];
        assert!(engine.fuse(&candidates, None).is_empty());
    }

    #[test]
    fn empty_input_yields_empty_output() {
        let engine = FusionEngine::default();
        assert!(engine.fuse(&[], None).is_empty());
    }

    #[test]
    fn unscored_members_fall_back_to_trust_weight() {
        let engine = FusionEngine::default();
        let candidates = vec![candidate("06H905611X", ProviderId::Partsouq, None)];

        let results = engine.fuse(&candidates, None);
        // Base 0.90 trust weight + 0.02 structured bonus.
        assert!((results[0].confidence - 0.92).abs() < 1e-9);
    }

    #[test]
    fn taxonomy_intersection_earns_bonus() {
        let engine = FusionEngine::default();
        let expected = vec![
            "Engine".to_string(),
            "Ignition".to_string(),
            "Spark plug".to_string(),
        ];

        let mut with_path = candidate("12120037244", ProviderId::RealOem, Some(0.9));
        with_path.group_path = Some(vec!["Engine".to_string(), "Ignition".to_string()]);
        let without_path = candidate("9091901210X", ProviderId::RealOem, Some(0.9));

        let results = engine.fuse(&[with_path, without_path], Some(&expected));
        let matched = results.iter().find(|r| r.oem == "12120037244").unwrap();
        let unmatched = results.iter().find(|r| r.oem == "9091901210X").unwrap();
        assert!(matched.confidence > unmatched.confidence);
        assert!((matched.confidence - unmatched.confidence - 0.03).abs() < 1e-9);
    }

    #[test]
    fn free_text_groups_get_no_structured_bonus() {
        let engine = FusionEngine::default();
        let mut free_text = candidate("06H905611X", ProviderId::Fallback, Some(0.4));
        free_text.source_kind = SourceKind::FreeText;

        let results = engine.fuse(&[free_text], None);
        assert!((results[0].confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn corroboration_bonus_is_capped() {
        let engine = FusionEngine::default();
        // Five low-confidence observations from one provider: base 0.4 +
        // capped corroboration 0.15, no diversity.
        let mut free_text: Vec<OemCandidate> = (0..5)
            .map(|_| candidate("06H905611X", ProviderId::Fallback, Some(0.4)))
            .collect();
        for c in &mut free_text {
            c.source_kind = SourceKind::FreeText;
        }

        let results = engine.fuse(&free_text, None);
        assert!((results[0].confidence - 0.55).abs() < 1e-9);
    }

    #[test]
    fn fusion_is_order_independent() {
        let engine = FusionEngine::default();
        let mut candidates = vec![
            candidate("12120037244", ProviderId::RealOem, Some(0.9)),
            candidate("12 12 0 037 244", ProviderId::SevenZap, Some(0.85)),
            candidate("06H905611", ProviderId::Autodoc, Some(0.7)),
        ];

        let forward = engine.fuse(&candidates, None);
        candidates.reverse();
        let backward = engine.fuse(&candidates, None);

        let forward_scores: Vec<(String, f64)> = forward
            .iter()
            .map(|r| (r.oem.clone(), r.confidence))
            .collect();
        let backward_scores: Vec<(String, f64)> = backward
            .iter()
            .map(|r| (r.oem.clone(), r.confidence))
            .collect();
        assert_eq!(forward_scores, backward_scores);
    }

    #[test]
    fn ties_keep_first_seen_order() {
        let engine = FusionEngine::default();
        let candidates = vec![
            candidate("AAAA111111", ProviderId::SevenZap, Some(0.84)),
            candidate("BBBB222222", ProviderId::SevenZap, Some(0.84)),
        ];

        let results = engine.fuse(&candidates, None);
        assert_eq!(results[0].oem, "AAAA111111");
        assert_eq!(results[1].oem, "BBBB222222");
    }

    #[test]
    fn representative_is_the_most_confident_member() {
        let engine = FusionEngine::default();
        let weak = candidate("12120037244", ProviderId::Autodoc, Some(0.7));
        let strong = candidate("12 12 0 037 244", ProviderId::RealOem, Some(0.92));

        let results = engine.fuse(&[weak, strong], None);
        assert_eq!(results[0].description.as_deref(), Some("REALOEM row"));
    }
}
