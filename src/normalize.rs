//! Text normalization for query parsing and OEM canonicalization
//!
//! Provides the deterministic normalization primitives everything above it
//! relies on:
//! - Diacritic stripping (NFD fold, combining marks dropped)
//! - Free-text normalization for fuzzy substring matching
//! - OEM part-number canonicalization (the fusion grouping key)
//! - The "looks like a real part number" validity heuristic

use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Minimum normalized length for a string to count as a plausible OEM.
///
/// Shorter strings are incidental numeric/text noise picked up by free-text
/// scraping fallbacks and are silently discarded.
pub const OEM_MIN_LEN: usize = 7;

/// Strip diacritics by NFD-decomposing and dropping combining marks.
///
/// `"Zündkerze"` becomes `"Zundkerze"`; characters without a decomposition
/// (e.g. `ß`) pass through unchanged.
pub fn strip_diacritics(s: &str) -> String {
    s.nfd().filter(|c| !is_combining_mark(*c)).collect()
}

/// Normalize free text for fuzzy substring matching.
///
/// Strips diacritics, lower-cases, replaces every non-alphanumeric run with
/// a single space and trims.
pub fn normalize_text(s: &str) -> String {
    let stripped: String = strip_diacritics(s)
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                ' '
            }
        })
        .collect();

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Canonicalize an OEM part number: upper-case and keep only `[0-9A-Z]`.
///
/// Deterministic and idempotent; this is the key candidates are grouped by
/// during fusion, so raw punctuation/spacing variants collapse together.
pub fn normalize_oem(s: &str) -> String {
    s.to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .collect()
}

/// Validity heuristic for OEM-shaped strings.
///
/// True when the normalized form is at least [`OEM_MIN_LEN`] characters.
pub fn looks_like_oem(raw: &str) -> bool {
    normalize_oem(raw).len() >= OEM_MIN_LEN
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_diacritics() {
        assert_eq!(strip_diacritics("Zündkerze"), "Zundkerze");
        assert_eq!(strip_diacritics("Ölfilter"), "Olfilter");
        assert_eq!(strip_diacritics("Citroën"), "Citroen");
    }

    #[test]
    fn normalize_text_folds_case_and_punctuation() {
        assert_eq!(normalize_text("  Mercedes-Benz  W204 "), "mercedes benz w204");
        assert_eq!(normalize_text("Zündkerze"), "zundkerze");
        assert_eq!(normalize_text("A/C compressor!"), "a c compressor");
    }

    #[test]
    fn normalize_oem_strips_punctuation_and_case() {
        assert_eq!(normalize_oem("12 12 0 037 244"), "12120037244");
        assert_eq!(normalize_oem("12120037244"), "12120037244");
        assert_eq!(normalize_oem("06h-905-611"), "06H905611");
    }

    #[test]
    fn normalize_oem_is_idempotent() {
        let once = normalize_oem("bRm-12 yt/78 2");
        assert_eq!(normalize_oem(&once), once);
    }

    #[test]
    fn looks_like_oem_threshold() {
        assert!(looks_like_oem("12120037244"));
        assert!(looks_like_oem("06H 905 611"));
        assert!(!looks_like_oem("AB12"));
        assert!(!looks_like_oem("123456"));
        assert!(looks_like_oem("1234567"));
    }
}
