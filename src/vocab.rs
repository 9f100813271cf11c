//! Vocabulary: brand aliases, part synonyms and part taxonomy
//!
//! Maintained lookup tables mapping the many surface forms seen in free-text
//! queries (including non-English terms) onto canonical brand and part names,
//! plus the fixed taxonomy path each canonical part belongs to.
//!
//! Alias order is significant: brand and part resolution scan the tables in
//! declared order and take the first substring match, so the compiled-in
//! baseline keeps the ordering it was authored with and the YAML format is a
//! sequence, not a map.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::normalize::{normalize_text, strip_diacritics};

/// One brand surface form and the canonical brand it maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrandAlias {
    pub alias: String,
    pub canonical: String,
}

/// One part surface form and the canonical part name it maps to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartSynonym {
    pub alias: String,
    pub canonical: String,
}

/// Errors raised while loading or validating a vocabulary file.
#[derive(Debug, thiserror::Error)]
pub enum VocabularyError {
    #[error("failed to read vocabulary file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse vocabulary file: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("invalid vocabulary: {0}")]
    Invalid(String),
}

/// On-disk vocabulary format (YAML).
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VocabularyFile {
    brands: Vec<BrandAlias>,
    parts: Vec<PartSynonym>,
    taxonomy: HashMap<String, Vec<String>>,
}

/// The resolved vocabulary, read-only after construction.
#[derive(Debug, Clone)]
pub struct Vocabulary {
    brands: Vec<BrandAlias>,
    /// Cleaned alias -> canonical brand, for exact lookups.
    brand_lookup: HashMap<String, String>,
    parts: Vec<PartSynonym>,
    /// Canonical part name -> taxonomy path (1-3 levels).
    taxonomy: HashMap<String, Vec<String>>,
}

impl Vocabulary {
    /// The compiled-in baseline tables.
    pub fn builtin() -> Self {
        let brands = BUILTIN_BRANDS
            .iter()
            .map(|(alias, canonical)| BrandAlias {
                alias: (*alias).to_string(),
                canonical: (*canonical).to_string(),
            })
            .collect();
        let parts = BUILTIN_PARTS
            .iter()
            .map(|(alias, canonical)| PartSynonym {
                alias: (*alias).to_string(),
                canonical: (*canonical).to_string(),
            })
            .collect();
        let taxonomy = BUILTIN_TAXONOMY
            .iter()
            .map(|(part, path)| {
                (
                    (*part).to_string(),
                    path.iter().map(|s| (*s).to_string()).collect(),
                )
            })
            .collect();

        Self::build(brands, parts, taxonomy)
    }

    /// Load a vocabulary from a YAML file, replacing the baseline tables.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, VocabularyError> {
        let raw = std::fs::read_to_string(path)?;
        let file: VocabularyFile = serde_yaml::from_str(&raw)?;

        for (part, path) in &file.taxonomy {
            if path.is_empty() || path.len() > 3 {
                return Err(VocabularyError::Invalid(format!(
                    "taxonomy path for '{}' must have 1-3 levels, got {}",
                    part,
                    path.len()
                )));
            }
        }

        Ok(Self::build(file.brands, file.parts, file.taxonomy))
    }

    fn build(
        brands: Vec<BrandAlias>,
        parts: Vec<PartSynonym>,
        taxonomy: HashMap<String, Vec<String>>,
    ) -> Self {
        let brand_lookup = brands
            .iter()
            .map(|b| (b.alias.clone(), b.canonical.clone()))
            .collect();
        Self {
            brands,
            brand_lookup,
            parts,
            taxonomy,
        }
    }

    /// Canonicalize a brand surface form.
    ///
    /// Strips diacritics, trims and upper-cases, then consults the alias
    /// table; unknown input passes through upper-cased.
    pub fn normalize_brand(&self, value: &str) -> String {
        let cleaned = strip_diacritics(value).trim().to_uppercase();
        self.brand_lookup
            .get(&cleaned)
            .cloned()
            .unwrap_or(cleaned)
    }

    /// Brand aliases in declared order.
    pub fn brand_aliases(&self) -> &[BrandAlias] {
        &self.brands
    }

    /// All surface forms that map to the given canonical brand.
    pub fn aliases_for_brand(&self, canonical: &str) -> Vec<&str> {
        self.brands
            .iter()
            .filter(|b| b.canonical == canonical)
            .map(|b| b.alias.as_str())
            .collect()
    }

    /// Part synonyms in declared order.
    pub fn part_synonyms(&self) -> &[PartSynonym] {
        &self.parts
    }

    /// Look up the canonical part name for a surface form, if any.
    ///
    /// Matches on normalized text so spacing, case and diacritics in the
    /// input do not matter.
    pub fn canonical_part(&self, value: &str) -> Option<&str> {
        let norm = normalize_text(value);
        self.parts
            .iter()
            .find(|p| normalize_text(&p.alias) == norm)
            .map(|p| p.canonical.as_str())
    }

    /// Taxonomy path for a canonical part name.
    pub fn group_path(&self, canonical_part: &str) -> Option<&[String]> {
        self.taxonomy.get(canonical_part).map(|v| v.as_slice())
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Baseline brand alias table. Order matters: first substring match wins
/// during free-text brand resolution.
const BUILTIN_BRANDS: &[(&str, &str)] = &[
    ("VW", "VOLKSWAGEN"),
    ("VOLKSWAGEN", "VOLKSWAGEN"),
    ("VAG", "VOLKSWAGEN"),
    ("MERCEDES-BENZ", "MERCEDES-BENZ"),
    ("MERCEDES BENZ", "MERCEDES-BENZ"),
    ("MERCEDES", "MERCEDES-BENZ"),
    ("BENZ", "MERCEDES-BENZ"),
    ("MB", "MERCEDES-BENZ"),
    ("BMW", "BMW"),
    ("AUDI", "AUDI"),
    ("SEAT", "SEAT"),
    ("SKODA", "SKODA"),
    ("OPEL", "OPEL"),
    ("GM", "OPEL"),
    ("FORD", "FORD"),
    ("PEUGEOT", "PEUGEOT"),
    ("CITROEN", "CITROEN"),
    ("RENAULT", "RENAULT"),
    ("DACIA", "DACIA"),
    ("FIAT", "FIAT"),
    ("ALFA", "ALFA ROMEO"),
    ("ALFA ROMEO", "ALFA ROMEO"),
    ("LANCIA", "LANCIA"),
    ("TOYOTA", "TOYOTA"),
    ("LEXUS", "LEXUS"),
    ("NISSAN", "NISSAN"),
    ("INFINITI", "INFINITI"),
    ("HYUNDAI", "HYUNDAI"),
    ("KIA", "KIA"),
    ("MITSUBISHI", "MITSUBISHI"),
    ("SUBARU", "SUBARU"),
    ("MAZDA", "MAZDA"),
    ("HONDA", "HONDA"),
    ("SUZUKI", "SUZUKI"),
    ("ISUZU", "ISUZU"),
    ("CHEVROLET", "CHEVROLET"),
    ("CHEVY", "CHEVROLET"),
    ("CADILLAC", "CADILLAC"),
    ("BUICK", "BUICK"),
    ("GMC", "GMC"),
    ("VOLVO", "VOLVO"),
    ("SAAB", "SAAB"),
    ("TESLA", "TESLA"),
    ("PORSCHE", "PORSCHE"),
    ("JAGUAR", "JAGUAR"),
    ("LANDROVER", "LAND ROVER"),
    ("LAND ROVER", "LAND ROVER"),
    ("MINI", "MINI"),
];

/// Baseline part synonym table, including common German surface forms.
/// Order matters for free-text part resolution.
const BUILTIN_PARTS: &[(&str, &str)] = &[
    ("spark plug", "spark plug"),
    ("zundkerze", "spark plug"),
    ("zündkerze", "spark plug"),
    ("ignition plug", "spark plug"),
    ("oil filter", "oil filter"),
    ("olfilter", "oil filter"),
    ("ölfilter", "oil filter"),
    ("luftfilter", "air filter"),
    ("air filter", "air filter"),
    ("cabin filter", "cabin filter"),
    ("pollenfilter", "cabin filter"),
    ("fuel filter", "fuel filter"),
    ("bremsbelag", "brake pad"),
    ("bremsbelage", "brake pad"),
    ("brake pad", "brake pad"),
    ("brake pads", "brake pad"),
    ("bremsscheibe", "brake disc"),
    ("bremsscheiben", "brake disc"),
    ("brake disc", "brake disc"),
    ("brake rotor", "brake disc"),
    ("shock absorber", "shock absorber"),
    ("stoßdämpfer", "shock absorber"),
    ("stossdampfer", "shock absorber"),
    ("rear shocks", "shock absorber"),
    ("front shocks", "shock absorber"),
    ("motorlager", "engine mount"),
    ("engine mount", "engine mount"),
    ("aircon compressor", "ac compressor"),
    ("ac compressor", "ac compressor"),
    ("wasserpumpe", "water pump"),
    ("water pump", "water pump"),
];

/// Baseline taxonomy: canonical part -> System > Subsystem > Part path.
const BUILTIN_TAXONOMY: &[(&str, &[&str])] = &[
    ("spark plug", &["Engine", "Ignition", "Spark plug"]),
    ("oil filter", &["Engine", "Lubrication", "Oil filter"]),
    ("air filter", &["Engine", "Air intake", "Air filter"]),
    ("cabin filter", &["HVAC", "Filter"]),
    ("fuel filter", &["Fuel system", "Filter"]),
    ("brake pad", &["Brakes", "Pads"]),
    ("brake disc", &["Brakes", "Discs"]),
    ("shock absorber", &["Suspension", "Shock absorber"]),
    ("engine mount", &["Engine", "Mounting"]),
    ("water pump", &["Engine", "Cooling", "Water pump"]),
    ("ac compressor", &["HVAC", "Compressor"]),
];
