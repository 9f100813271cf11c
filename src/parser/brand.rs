//! Brand resolution from free text or explicit hints

use regex::RegexBuilder;

use crate::normalize::normalize_text;
use crate::vocab::Vocabulary;

/// Outcome of brand resolution for one query.
#[derive(Debug, Clone)]
pub struct BrandParse {
    /// Brand as resolved: the explicit hint's surface form, or the canonical
    /// name on a free-text match.
    pub brand: Option<String>,
    /// Canonical brand name.
    pub normalized_brand: Option<String>,
    /// Query text with every surface form of the resolved brand removed.
    pub remaining_text: String,
}

/// Resolve the brand for a query.
///
/// With an explicit hint the hint is canonicalized and all of its alias
/// surface forms are stripped from the query text. Without one, the alias
/// table is scanned in declared order and the first alias whose normalized
/// form is a substring of the normalized query decides the brand
/// (first-match, not longest-match).
pub fn parse_brand(raw_query: &str, explicit: Option<&str>, vocab: &Vocabulary) -> BrandParse {
    if let Some(hint) = explicit {
        let normalized = vocab.normalize_brand(hint);
        let remaining = remove_brand_tokens(raw_query, &normalized, vocab);
        return BrandParse {
            brand: Some(hint.to_string()),
            normalized_brand: Some(normalized),
            remaining_text: remaining,
        };
    }

    let normalized_query = normalize_text(raw_query);
    let found = vocab
        .brand_aliases()
        .iter()
        .find(|entry| normalized_query.contains(&normalize_text(&entry.alias)))
        .map(|entry| entry.canonical.clone());

    match found {
        Some(canonical) => {
            let remaining = remove_brand_tokens(raw_query, &canonical, vocab);
            BrandParse {
                brand: Some(canonical.clone()),
                normalized_brand: Some(canonical),
                remaining_text: remaining,
            }
        }
        None => BrandParse {
            brand: None,
            normalized_brand: None,
            remaining_text: raw_query.to_string(),
        },
    }
}

/// Strip the canonical brand and every alias mapping to it from the text,
/// case-insensitively, all occurrences.
fn remove_brand_tokens(text: &str, canonical: &str, vocab: &Vocabulary) -> String {
    let mut tokens = vec![canonical.to_string()];
    tokens.extend(
        vocab
            .aliases_for_brand(canonical)
            .into_iter()
            .map(|a| a.to_string()),
    );

    let mut result = text.to_string();
    for token in &tokens {
        let built = RegexBuilder::new(&regex::escape(token))
            .case_insensitive(true)
            .build();
        if let Ok(re) = built {
            result = re.replace_all(&result, " ").into_owned();
        }
    }

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}
