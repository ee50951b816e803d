//! Per-key reconciliation of extraction attempts
//!
//! A Normal result replaces an existing Hardcase result for the same key.
//! Every other combination keeps what is already there, including two
//! records of the same case type (first arrival wins).

use std::collections::BTreeMap;

use log::debug;

use super::record::{CaseType, ProductKey, ProductRecord};

/// Resolve one incoming record against the current one for its key
pub fn merge(existing: Option<ProductRecord>, incoming: ProductRecord) -> ProductRecord {
    match existing {
        None => incoming,
        Some(current) if supersedes(current.case_type, incoming.case_type) => incoming,
        Some(current) => current,
    }
}

/// Whether a record of case `incoming` replaces one of case `existing`
pub fn supersedes(existing: CaseType, incoming: CaseType) -> bool {
    existing == CaseType::Hardcase && incoming == CaseType::Normal
}

/// Owned per-key record table threaded through a batch run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    records: BTreeMap<ProductKey, ProductRecord>,
}

/// What happened to a record passed to [`RecordTable::apply`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeAction {
    Inserted,
    Replaced,
    Retained,
}

impl RecordTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge `incoming` into the table
    pub fn apply(&mut self, incoming: ProductRecord) -> MergeAction {
        let key = incoming.key.clone();
        let existing = self.records.remove(&key);
        let action = match &existing {
            None => MergeAction::Inserted,
            Some(current) if supersedes(current.case_type, incoming.case_type) => {
                MergeAction::Replaced
            }
            Some(_) => MergeAction::Retained,
        };
        if let Some(current) = &existing {
            debug!(
                "[merge] {} ({} <- {}): {:?}",
                key, current.case_type, incoming.case_type, action
            );
        }
        self.records.insert(key, merge(existing, incoming));
        action
    }

    pub fn get(&self, key: &ProductKey) -> Option<&ProductRecord> {
        self.records.get(key)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in key order
    pub fn records(&self) -> impl Iterator<Item = &ProductRecord> {
        self.records.values()
    }

    pub fn into_records(self) -> Vec<ProductRecord> {
        self.records.into_values().collect()
    }
}

impl FromIterator<ProductRecord> for RecordTable {
    fn from_iter<I: IntoIterator<Item = ProductRecord>>(iter: I) -> Self {
        let mut table = RecordTable::new();
        for record in iter {
            table.apply(record);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{ColorConverter, ColorSample, RepresentativeColor};

    fn record(option: &str, case_type: CaseType, rgb: [u8; 3]) -> ProductRecord {
        ProductRecord::new(
            ProductKey::new("acme", option),
            RepresentativeColor::from_rgb(ColorSample::from(rgb), &ColorConverter::new()),
            case_type,
        )
    }

    #[test]
    fn test_merge_truth_table() {
        let x = [10, 20, 30];
        let y = [40, 50, 60];

        let incoming = record("01", CaseType::Hardcase, y);
        assert_eq!(merge(None, incoming.clone()), incoming);

        let merged = merge(
            Some(record("01", CaseType::Hardcase, x)),
            record("01", CaseType::Normal, y),
        );
        assert_eq!(merged, record("01", CaseType::Normal, y));

        let merged = merge(
            Some(record("01", CaseType::Normal, x)),
            record("01", CaseType::Hardcase, y),
        );
        assert_eq!(merged, record("01", CaseType::Normal, x));
    }

    #[test]
    fn test_same_type_duplicates_keep_first() {
        let x = [10, 20, 30];
        let y = [40, 50, 60];
        for case in [CaseType::Normal, CaseType::Hardcase] {
            let merged = merge(Some(record("01", case, x)), record("01", case, y));
            assert_eq!(merged.color.rgb, ColorSample::from(x));
        }
    }

    #[test]
    fn test_table_converges_regardless_of_order() {
        let normal = record("01", CaseType::Normal, [1, 2, 3]);
        let hard_a = record("01", CaseType::Hardcase, [4, 5, 6]);
        let other = record("02", CaseType::Hardcase, [7, 8, 9]);

        let orders = [
            vec![normal.clone(), hard_a.clone(), other.clone()],
            vec![hard_a.clone(), normal.clone(), other.clone()],
            vec![other.clone(), hard_a.clone(), normal.clone()],
        ];
        let tables: Vec<RecordTable> = orders.into_iter().map(RecordTable::from_iter).collect();
        for table in &tables {
            assert_eq!(table, &tables[0]);
            assert_eq!(table.len(), 2);
            assert_eq!(table.get(&ProductKey::new("acme", "01")), Some(&normal));
        }
    }

    #[test]
    fn test_apply_reports_action() {
        let mut table = RecordTable::new();
        assert_eq!(table.apply(record("01", CaseType::Hardcase, [1, 1, 1])), MergeAction::Inserted);
        assert_eq!(table.apply(record("01", CaseType::Normal, [2, 2, 2])), MergeAction::Replaced);
        assert_eq!(table.apply(record("01", CaseType::Hardcase, [3, 3, 3])), MergeAction::Retained);
        assert_eq!(table.into_records().len(), 1);
    }
}
