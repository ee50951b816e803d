//! Product identity and extraction records

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::RepresentativeColor;
use crate::AnalysisError;

/// Logical product identity, supplied already validated by the caller
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductKey {
    pub brand: String,
    pub option: String,
}

impl ProductKey {
    pub fn new(brand: impl Into<String>, option: impl Into<String>) -> Self {
        Self {
            brand: brand.into(),
            option: option.into(),
        }
    }
}

impl fmt::Display for ProductKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.brand, self.option)
    }
}

/// Which extraction strategy produced a record
///
/// Serialized with the catalog labels `A_normal` / `B_hardcase`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CaseType {
    #[serde(rename = "A_normal")]
    Normal,
    #[serde(rename = "B_hardcase")]
    Hardcase,
}

impl CaseType {
    pub const fn label(self) -> &'static str {
        match self {
            CaseType::Normal => "A_normal",
            CaseType::Hardcase => "B_hardcase",
        }
    }
}

impl fmt::Display for CaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CaseType {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A_normal" => Ok(CaseType::Normal),
            "B_hardcase" => Ok(CaseType::Hardcase),
            other => Err(AnalysisError::UnknownCaseType {
                label: other.to_string(),
            }),
        }
    }
}

/// One extraction result for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub key: ProductKey,
    pub color: RepresentativeColor,
    pub case_type: CaseType,
    /// Opaque pass-through fields (product_id, category, ...)
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl ProductRecord {
    pub fn new(key: ProductKey, color: RepresentativeColor, case_type: CaseType) -> Self {
        Self {
            key,
            color,
            case_type,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Metadata value, or the empty string when absent
    pub fn meta(&self, field: &str) -> &str {
        self.metadata.get(field).map(String::as_str).unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_type_labels() {
        assert_eq!(CaseType::Normal.to_string(), "A_normal");
        assert_eq!("B_hardcase".parse::<CaseType>().unwrap(), CaseType::Hardcase);
        assert!(matches!(
            "C_other".parse::<CaseType>(),
            Err(AnalysisError::UnknownCaseType { .. })
        ));
        assert_eq!(
            serde_json::to_string(&CaseType::Hardcase).unwrap(),
            "\"B_hardcase\""
        );
    }

    #[test]
    fn test_product_key_ordering_and_display() {
        let a = ProductKey::new("acme", "01");
        let b = ProductKey::new("acme", "02");
        assert!(a < b);
        assert_eq!(a.to_string(), "acme/01");
    }

    #[test]
    fn test_meta_defaults_to_empty() {
        let mut metadata = BTreeMap::new();
        metadata.insert("category".to_string(), "lip".to_string());
        let record = ProductRecord::new(
            ProductKey::new("acme", "01"),
            RepresentativeColor::neutral_fallback(),
            CaseType::Normal,
        )
        .with_metadata(metadata);
        assert_eq!(record.meta("category"), "lip");
        assert_eq!(record.meta("product_id"), "");
    }
}
