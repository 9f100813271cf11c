//! Shared extraction helpers for provider page content
//!
//! Two extraction styles cover every source: parts-table rows (structured
//! catalogs render part number + description columns) and OEM-shaped token
//! scanning over arbitrary page text (cross-reference blocks, search
//! result pages).

use once_cell::sync::Lazy;
use regex::Regex;

use crate::normalize::{looks_like_oem, normalize_oem};
use crate::session::PageTable;

/// OEM-shaped character runs: alphanumeric start, then alphanumerics,
/// dashes and spaces.
static OEM_RUN_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z0-9][A-Za-z0-9\-\s]{5,}").expect("oem run pattern is valid")
});

/// One extracted parts-table row.
#[derive(Debug, Clone)]
pub struct OemRow {
    pub raw_oem: String,
    pub description: String,
}

/// Options for table-row extraction.
#[derive(Debug, Clone, Default)]
pub struct TableExtractOptions {
    /// Cell index holding the human-readable description (default 1).
    pub description_cell_index: Option<usize>,
    /// Cell indices to probe for the OEM, first non-empty wins. Empty =
    /// use the last cell.
    pub oem_cell_indices: Vec<usize>,
}

/// Extract candidate rows from a parts table.
///
/// Rows without cells or without an OEM cell are skipped; no validity
/// filtering happens here, callers apply [`looks_like_oem`] themselves.
pub fn extract_oem_rows(table: &PageTable, options: &TableExtractOptions) -> Vec<OemRow> {
    let desc_idx = options.description_cell_index.unwrap_or(1);
    let mut rows = Vec::new();

    for cells in &table.rows {
        if cells.is_empty() {
            continue;
        }
        let texts: Vec<String> = cells.iter().map(|c| c.trim().to_string()).collect();

        let description = texts.get(desc_idx).cloned().unwrap_or_default();

        let raw_oem = if options.oem_cell_indices.is_empty() {
            texts.last().cloned().unwrap_or_default()
        } else {
            options
                .oem_cell_indices
                .iter()
                .filter_map(|idx| texts.get(*idx))
                .find(|t| !t.is_empty())
                .cloned()
                .unwrap_or_default()
        };

        if raw_oem.is_empty() {
            continue;
        }

        rows.push(OemRow {
            raw_oem,
            description,
        });
    }

    rows
}

/// One OEM-shaped token found in free text.
#[derive(Debug, Clone)]
pub struct ExtractedOem {
    /// Normalized form.
    pub oem: String,
    /// The run as it appeared in the text, trimmed.
    pub raw_oem: String,
}

/// Scan arbitrary text for OEM-shaped tokens.
///
/// Runs are validity-filtered and deduplicated by normalized form, in
/// first-seen order.
pub fn extract_oem_tokens(text: &str) -> Vec<ExtractedOem> {
    let mut seen = std::collections::HashSet::new();
    let mut result = Vec::new();

    for matched in OEM_RUN_RE.find_iter(text) {
        let trimmed = matched.as_str().trim();
        if !looks_like_oem(trimmed) {
            continue;
        }
        let oem = normalize_oem(trimmed);
        if oem.is_empty() || !seen.insert(oem.clone()) {
            continue;
        }
        result.push(ExtractedOem {
            oem,
            raw_oem: trimmed.to_string(),
        });
    }

    result
}
