//! Query parsing: brand + part resolution and residual-field extraction
//!
//! Turns one [`ResolverInput`] into an immutable [`ParsedQuery`]: canonical
//! brand, canonical part with taxonomy path, and year / engine code / model
//! extracted from whatever text the brand and part matches left behind.
//! Explicit hints always take precedence over derived values.

pub mod brand;
pub mod part;

use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::types::{ParsedQuery, ResolverInput};
use crate::vocab::Vocabulary;

pub use brand::{parse_brand, BrandParse};
pub use part::{parse_part, PartParse};

/// Years outside this range are treated as non-year numbers (engine
/// displacement, part numbers, ...).
const YEAR_MIN: i32 = 1980;
const YEAR_MAX: i32 = 2035;

/// Model strings keep at most this many tokens.
const MODEL_MAX_TOKENS: usize = 5;

static YEAR_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?:19|20)\d{2}").expect("year pattern is valid")
});

/// Parses raw inputs against a fixed vocabulary.
pub struct QueryParser {
    vocab: Arc<Vocabulary>,
}

impl QueryParser {
    pub fn new(vocab: Arc<Vocabulary>) -> Self {
        Self { vocab }
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Build the normalized view of one input query.
    pub fn parse(&self, input: &ResolverInput) -> ParsedQuery {
        let brand = parse_brand(&input.raw_query, input.brand.as_deref(), &self.vocab);
        let part = parse_part(&input.raw_query, input.part_query.as_deref(), &self.vocab);

        // Residual text: whatever brand and part matching left behind,
        // concatenated. Year, engine code and model are derived from it.
        let residual = [brand.remaining_text.as_str(), part.remaining_text.as_str()]
            .iter()
            .filter(|s| !s.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        let year = input.year.or_else(|| extract_year(&residual));
        let engine_code = input
            .engine_code
            .clone()
            .or_else(|| extract_engine_code(&residual));
        let model = input
            .model
            .clone()
            .or_else(|| derive_model(&residual, year, engine_code.as_deref()));

        ParsedQuery {
            raw_query: input.raw_query.clone(),
            vin: input.vin.clone(),
            brand: brand.brand,
            normalized_brand: brand.normalized_brand,
            model,
            year,
            engine_code,
            part_query: part.part_query.or_else(|| input.part_query.clone()),
            normalized_part_query: part.normalized_part_query,
            part_group_path: part.group_path,
            locale: input.locale.clone(),
            country_code: input.country_code.clone(),
        }
    }
}

/// First `19xx`/`20xx` run in the text, accepted only inside
/// `[YEAR_MIN, YEAR_MAX]`.
fn extract_year(text: &str) -> Option<i32> {
    let matched = YEAR_RE.find(text)?;
    let year: i32 = matched.as_str().parse().ok()?;
    if (YEAR_MIN..=YEAR_MAX).contains(&year) {
        Some(year)
    } else {
        None
    }
}

/// First whitespace-delimited token that looks like an engine code: after
/// stripping everything outside `[A-Za-z0-9-]`, 3-8 chars of `[A-Z0-9-]`
/// with at least one digit and at least one letter.
fn extract_engine_code(text: &str) -> Option<String> {
    text.split_whitespace()
        .map(|token| {
            token
                .chars()
                .filter(|c| c.is_ascii_alphanumeric() || *c == '-')
                .collect::<String>()
        })
        .find(|cleaned| {
            (3..=8).contains(&cleaned.len())
                && cleaned
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-')
                && cleaned.chars().any(|c| c.is_ascii_digit())
                && cleaned.chars().any(|c| c.is_ascii_alphabetic())
        })
}

/// Residual text minus the year and engine-code substrings, collapsed,
/// truncated to the first [`MODEL_MAX_TOKENS`] tokens, upper-cased.
fn derive_model(text: &str, year: Option<i32>, engine_code: Option<&str>) -> Option<String> {
    let mut cleaned = text.to_string();

    if let Some(year) = year {
        cleaned = cleaned.replace(&year.to_string(), " ");
    }
    if let Some(code) = engine_code {
        let built = RegexBuilder::new(&regex::escape(code))
            .case_insensitive(true)
            .build();
        if let Ok(re) = built {
            cleaned = re.replace_all(&cleaned, " ").into_owned();
        }
    }

    let tokens: Vec<&str> = cleaned.split_whitespace().collect();
    if tokens.is_empty() {
        return None;
    }

    Some(
        tokens[..tokens.len().min(MODEL_MAX_TOKENS)]
            .join(" ")
            .to_uppercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parser() -> QueryParser {
        QueryParser::new(Arc::new(Vocabulary::builtin()))
    }

    #[test]
    fn parses_free_text_query() {
        let parsed = parser().parse(&ResolverInput::from_text("2014 VW Golf spark plug"));
        assert_eq!(parsed.normalized_brand.as_deref(), Some("VOLKSWAGEN"));
        assert_eq!(parsed.part_query.as_deref(), Some("spark plug"));
        assert_eq!(
            parsed.part_group_path,
            Some(vec![
                "Engine".to_string(),
                "Ignition".to_string(),
                "Spark plug".to_string()
            ])
        );
        assert_eq!(parsed.year, Some(2014));
        assert!(parsed.engine_code.is_none());
    }

    #[test]
    fn year_bounds_are_enforced() {
        assert_eq!(extract_year("golf 2014"), Some(2014));
        assert_eq!(extract_year("golf 1980"), Some(1980));
        assert_eq!(extract_year("golf 2035"), Some(2035));
        assert_eq!(extract_year("vintage 1955 part"), None);
        assert_eq!(extract_year("year 2054 concept"), None);
        assert_eq!(extract_year("no digits here"), None);
    }

    #[test]
    fn engine_code_needs_digits_letters_and_uppercase() {
        assert_eq!(
            extract_engine_code("e90 N47D20 touring").as_deref(),
            Some("N47D20")
        );
        // Too short, letters only, digits only, lowercase: all rejected.
        assert_eq!(extract_engine_code("passat B8 wagon"), None);
        assert_eq!(extract_engine_code("golf CJSA trendline"), None);
        assert_eq!(extract_engine_code("2014 1500"), None);
        assert_eq!(extract_engine_code("tdi105 lowercase"), None);
        // Punctuation is stripped before the shape check.
        assert_eq!(
            extract_engine_code("engine (N57D30)").as_deref(),
            Some("N57D30")
        );
    }

    #[test]
    fn explicit_hints_win_over_derived_values() {
        let input = ResolverInput {
            year: Some(2016),
            engine_code: Some("CJSA".to_string()),
            model: Some("Golf VII".to_string()),
            ..ResolverInput::from_text("2014 VW Golf spark plug")
        };
        let parsed = parser().parse(&input);
        assert_eq!(parsed.year, Some(2016));
        assert_eq!(parsed.engine_code.as_deref(), Some("CJSA"));
        assert_eq!(parsed.model.as_deref(), Some("Golf VII"));
    }

    #[test]
    fn model_is_truncated_and_uppercased() {
        let model = derive_model("golf gti clubsport s performance pack extra", None, None);
        assert_eq!(model.as_deref(), Some("GOLF GTI CLUBSPORT S PERFORMANCE"));
    }

    #[test]
    fn model_removes_year_and_engine_code() {
        let model = derive_model("2014 Golf n47d20 wagon", Some(2014), Some("N47D20"));
        assert_eq!(model.as_deref(), Some("GOLF WAGON"));
    }

    #[test]
    fn empty_residual_means_no_model() {
        assert_eq!(derive_model("  ", None, None), None);
        assert_eq!(derive_model("2014", Some(2014), None), None);
    }

    #[test]
    fn explicit_brand_hint_is_canonicalized() {
        let input = ResolverInput {
            brand: Some("vag".to_string()),
            ..ResolverInput::from_text("golf oil filter")
        };
        let parsed = parser().parse(&input);
        assert_eq!(parsed.brand.as_deref(), Some("vag"));
        assert_eq!(parsed.normalized_brand.as_deref(), Some("VOLKSWAGEN"));
    }
}
