//! Part resolution from free text or explicit hints

use regex::RegexBuilder;

use crate::normalize::normalize_text;
use crate::vocab::Vocabulary;

/// Outcome of part resolution for one query.
#[derive(Debug, Clone)]
pub struct PartParse {
    /// Canonical part name on a synonym match; the explicit hint's surface
    /// form otherwise.
    pub part_query: Option<String>,
    /// Canonical part name, or the bare normalized hint when no synonym
    /// matched.
    pub normalized_part_query: Option<String>,
    /// Taxonomy path of the canonical part.
    pub group_path: Option<Vec<String>>,
    /// Query text with the matched part tokens removed.
    pub remaining_text: String,
}

/// Resolve the part for a query.
///
/// With an explicit hint the hint is looked up in the synonym table; a miss
/// falls back to the bare normalized text with no taxonomy path. Without a
/// hint the synonym table is scanned in declared order against the
/// normalized query; the first substring match wins, mirroring brand
/// resolution.
pub fn parse_part(raw_query: &str, explicit: Option<&str>, vocab: &Vocabulary) -> PartParse {
    if let Some(hint) = explicit {
        let canonical = vocab.canonical_part(hint).map(|c| c.to_string());
        let normalized = canonical
            .clone()
            .unwrap_or_else(|| normalize_text(hint));
        let group_path = canonical
            .as_deref()
            .and_then(|c| vocab.group_path(c))
            .map(|p| p.to_vec());
        let remaining = remove_part_tokens(raw_query, &normalized);
        return PartParse {
            part_query: Some(hint.to_string()),
            normalized_part_query: Some(normalized),
            group_path,
            remaining_text: remaining,
        };
    }

    let normalized_query = normalize_text(raw_query);
    for entry in vocab.part_synonyms() {
        let alias_norm = normalize_text(&entry.alias);
        if normalized_query.contains(&alias_norm) {
            return PartParse {
                part_query: Some(entry.canonical.clone()),
                normalized_part_query: Some(entry.canonical.clone()),
                group_path: vocab.group_path(&entry.canonical).map(|p| p.to_vec()),
                remaining_text: remove_part_tokens(raw_query, &entry.alias),
            };
        }
    }

    PartParse {
        part_query: None,
        normalized_part_query: None,
        group_path: None,
        remaining_text: raw_query.to_string(),
    }
}

/// Strip the matched alias from the text. The alias is applied as a
/// whitespace-flexible pattern (each internal space matches one or more
/// whitespace characters) so spacing and case variations in the original
/// query are still removed.
fn remove_part_tokens(text: &str, token: &str) -> String {
    let norm = normalize_text(token);
    if norm.is_empty() {
        return text.split_whitespace().collect::<Vec<_>>().join(" ");
    }

    let pattern = norm
        .split(' ')
        .map(regex::escape)
        .collect::<Vec<_>>()
        .join(r"\s+");

    let result = match RegexBuilder::new(&pattern).case_insensitive(true).build() {
        Ok(re) => re.replace_all(text, " ").into_owned(),
        Err(_) => text.to_string(),
    };

    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_match_resolves_canonical_part() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("2014 VW Golf spark plug", None, &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("spark plug"));
        assert_eq!(parsed.normalized_part_query.as_deref(), Some("spark plug"));
        assert_eq!(
            parsed.group_path,
            Some(vec![
                "Engine".to_string(),
                "Ignition".to_string(),
                "Spark plug".to_string()
            ])
        );
        assert_eq!(parsed.remaining_text, "2014 VW Golf");
    }

    #[test]
    fn german_alias_resolves_to_english_canonical() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("golf 7 zundkerze", None, &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("spark plug"));
        assert_eq!(parsed.normalized_part_query.as_deref(), Some("spark plug"));
        assert_eq!(parsed.remaining_text, "golf 7");
    }

    #[test]
    fn umlaut_surface_form_still_resolves_canonical() {
        // Alias matching runs on normalized text, so the diacritic form maps
        // to the same canonical part; removal is textual and leaves the
        // umlaut token in place.
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("golf 7 zündkerze", None, &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("spark plug"));
        assert_eq!(parsed.remaining_text, "golf 7 zündkerze");
    }

    #[test]
    fn explicit_hint_with_synonym_match() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("e90 320d", Some("Brake Rotor"), &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("Brake Rotor"));
        assert_eq!(parsed.normalized_part_query.as_deref(), Some("brake disc"));
        assert_eq!(
            parsed.group_path,
            Some(vec!["Brakes".to_string(), "Discs".to_string()])
        );
    }

    #[test]
    fn explicit_hint_without_synonym_falls_back_to_bare_text() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("e90 320d", Some("Timing Chain"), &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("Timing Chain"));
        assert_eq!(parsed.normalized_part_query.as_deref(), Some("timing chain"));
        assert!(parsed.group_path.is_none());
    }

    #[test]
    fn removal_tolerates_flexible_whitespace_and_case() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("Golf Spark   PLUG set", None, &vocab);
        assert_eq!(parsed.part_query.as_deref(), Some("spark plug"));
        assert_eq!(parsed.remaining_text, "Golf set");
    }

    #[test]
    fn no_match_leaves_text_untouched() {
        let vocab = Vocabulary::builtin();
        let parsed = parse_part("W204 timing chain", None, &vocab);
        assert!(parsed.part_query.is_none());
        assert_eq!(parsed.remaining_text, "W204 timing chain");
    }
}
