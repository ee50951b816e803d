//! Catalog rows regenerated from the record table

use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::merge::RecordTable;
use super::record::{CaseType, ProductRecord};
use crate::color::{ColorConverter, ColorSample, LabColor, Measured};
use crate::recommend::Candidate;

/// Column names of the persisted catalog, in order
pub const CATALOG_HEADER: [&str; 13] = [
    "product_id",
    "category",
    "brand",
    "option",
    "r",
    "g",
    "b",
    "L",
    "a",
    "b",
    "hex",
    "case_type",
    "timestamp",
];

/// Timestamp format of the `timestamp` column
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One persisted catalog row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogRow {
    pub product_id: String,
    pub category: String,
    pub brand: String,
    pub option: String,
    pub rgb: ColorSample,
    /// Damped Lab as stored on the record
    pub lab: [f64; 3],
    pub hex: String,
    pub case_type: CaseType,
    pub timestamp: String,
}

impl CatalogRow {
    pub fn from_record(record: &ProductRecord, generated_at: NaiveDateTime) -> Self {
        Self {
            product_id: record.meta("product_id").to_string(),
            category: record.meta("category").to_string(),
            brand: record.key.brand.clone(),
            option: record.key.option.clone(),
            rgb: record.color.rgb,
            lab: record.color.lab.to_array(),
            hex: record.color.hex.clone(),
            case_type: record.case_type,
            timestamp: generated_at.format(TIMESTAMP_FORMAT).to_string(),
        }
    }

    /// Field values in [`CATALOG_HEADER`] order
    pub fn to_fields(&self) -> Vec<String> {
        let [l, a, b] = self.lab;
        vec![
            self.product_id.clone(),
            self.category.clone(),
            self.brand.clone(),
            self.option.clone(),
            self.rgb.r.to_string(),
            self.rgb.g.to_string(),
            self.rgb.b.to_string(),
            l.to_string(),
            a.to_string(),
            b.to_string(),
            self.hex.clone(),
            self.case_type.to_string(),
            self.timestamp.clone(),
        ]
    }

    /// Identifier used when ranking: product_id, or `brand_option` when absent
    pub fn candidate_id(&self) -> String {
        if self.product_id.is_empty() {
            format!("{}_{}", self.brand, self.option)
        } else {
            self.product_id.clone()
        }
    }

    /// Ranker input with Lab recomputed undamped from the stored RGB
    pub fn candidate(&self, converter: &ColorConverter) -> Candidate {
        let lab: LabColor<Measured> = converter.rgb_to_lab(self.rgb);
        Candidate::new(self.candidate_id(), lab)
    }
}

/// Rows for every surviving record, stamped with `generated_at`
pub fn export_rows(table: &RecordTable, generated_at: NaiveDateTime) -> Vec<CatalogRow> {
    table
        .records()
        .map(|record| CatalogRow::from_record(record, generated_at))
        .collect()
}

/// Rows stamped with the current local time
pub fn export_rows_now(table: &RecordTable) -> Vec<CatalogRow> {
    export_rows(table, Local::now().naive_local())
}
