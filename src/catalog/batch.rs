//! Batch extraction driver
//!
//! Extraction is pure, so items are processed in parallel. The results are
//! then folded into the owned [`RecordTable`] one at a time, in input order,
//! which serializes every same-key merge.

use std::collections::BTreeMap;
use std::time::Instant;

use image::RgbImage;
use log::{debug, info};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::merge::{MergeAction, RecordTable};
use super::record::{CaseType, ProductKey, ProductRecord};
use crate::config::EngineConfig;
use crate::extraction::{ColorExtractor, DominantColorExtractor, ExtremeChromaExtractor};

/// One image to extract, with identity and case type already resolved
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub key: ProductKey,
    pub case_type: CaseType,
    pub metadata: BTreeMap<String, String>,
    pub image: RgbImage,
}

impl BatchItem {
    pub fn new(key: ProductKey, case_type: CaseType, image: RgbImage) -> Self {
        Self {
            key,
            case_type,
            metadata: BTreeMap::new(),
            image,
        }
    }

    pub fn with_metadata(mut self, metadata: BTreeMap<String, String>) -> Self {
        self.metadata = metadata;
        self
    }
}

/// Counts for one batch run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    /// Items extracted
    pub processed: usize,
    pub normal: usize,
    pub hardcase: usize,
    /// Items that resolved to the neutral gray
    pub fallbacks: usize,
    /// Incoming records that replaced an existing one
    pub replaced: usize,
    /// Incoming records discarded in favor of an existing one
    pub retained: usize,
    /// Records in the table after the run
    pub records: usize,
}

/// Runs both extractors over a batch and reconciles the results per key
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    normal: DominantColorExtractor,
    hardcase: ExtremeChromaExtractor,
}

impl BatchProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        let converter = config.classifier.converter();
        Self {
            normal: DominantColorExtractor::with_config(config.normal.clone(), converter),
            hardcase: ExtremeChromaExtractor::with_config(config.hardcase.clone(), converter),
        }
    }

    /// Extractor responsible for `case_type`
    pub fn extractor(&self, case_type: CaseType) -> &dyn ColorExtractor {
        match case_type {
            CaseType::Normal => &self.normal,
            CaseType::Hardcase => &self.hardcase,
        }
    }

    /// Extract one item into a record; never fails
    pub fn process(&self, item: &BatchItem) -> (ProductRecord, bool) {
        let extractor = self.extractor(item.case_type);
        let outcome = extractor.try_extract(&item.image);
        let fell_back = !outcome.is_success();
        let source = format!("{} [{}]", item.key, item.case_type);
        let color = outcome.resolve(extractor.name(), &source);

        let record = ProductRecord::new(item.key.clone(), color, item.case_type)
            .with_metadata(item.metadata.clone());
        (record, fell_back)
    }

    /// Extract `items` and merge them into `table`
    ///
    /// Returns the updated table with the run's summary.
    pub fn run(&self, mut table: RecordTable, items: &[BatchItem]) -> (RecordTable, BatchSummary) {
        let start = Instant::now();
        info!("Processing {} items", items.len());

        let extracted: Vec<(ProductRecord, bool)> =
            items.par_iter().map(|item| self.process(item)).collect();

        let mut summary = BatchSummary::default();
        for (record, fell_back) in extracted {
            summary.processed += 1;
            match record.case_type {
                CaseType::Normal => summary.normal += 1,
                CaseType::Hardcase => summary.hardcase += 1,
            }
            if fell_back {
                summary.fallbacks += 1;
            }
            match table.apply(record) {
                MergeAction::Inserted => {}
                MergeAction::Replaced => summary.replaced += 1,
                MergeAction::Retained => summary.retained += 1,
            }
        }
        summary.records = table.len();

        debug!("{:?}", summary);
        info!(
            "Batch done: {} processed ({} normal, {} hardcase), {} fallbacks, {} records, {:.2}s",
            summary.processed,
            summary.normal,
            summary.hardcase,
            summary.fallbacks,
            summary.records,
            start.elapsed().as_secs_f64()
        );

        (table, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorSample;
    use image::Rgb;

    fn item(option: &str, case_type: CaseType, rgb: [u8; 3]) -> BatchItem {
        BatchItem::new(
            ProductKey::new("acme", option),
            case_type,
            RgbImage::from_pixel(64, 64, Rgb(rgb)),
        )
    }

    #[test]
    fn test_run_merges_per_key() {
        let items = vec![
            item("01", CaseType::Hardcase, [40, 80, 220]),
            item("01", CaseType::Normal, [120, 80, 60]),
            item("02", CaseType::Hardcase, [40, 80, 220]),
        ];
        let (table, summary) = BatchProcessor::new().run(RecordTable::new(), &items);

        assert_eq!(summary.processed, 3);
        assert_eq!(summary.normal, 1);
        assert_eq!(summary.hardcase, 2);
        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.records, 2);
        assert_eq!(summary.fallbacks, 0);

        let first = table.get(&ProductKey::new("acme", "01")).unwrap();
        assert_eq!(first.case_type, CaseType::Normal);
        assert_eq!(first.color.rgb, ColorSample::new(120, 80, 60));
    }

    #[test]
    fn test_run_extends_existing_table() {
        let processor = BatchProcessor::new();
        let (table, _) = processor.run(
            RecordTable::new(),
            &[item("01", CaseType::Normal, [120, 80, 60])],
        );
        let (table, summary) =
            processor.run(table, &[item("01", CaseType::Hardcase, [40, 80, 220])]);

        assert_eq!(summary.retained, 1);
        assert_eq!(summary.records, 1);
        let record = table.get(&ProductKey::new("acme", "01")).unwrap();
        assert_eq!(record.case_type, CaseType::Normal);
    }

    #[test]
    fn test_empty_image_counts_as_fallback() {
        let broken = BatchItem::new(
            ProductKey::new("acme", "09"),
            CaseType::Normal,
            RgbImage::new(0, 0),
        );
        let (table, summary) = BatchProcessor::new().run(RecordTable::new(), &[broken]);
        assert_eq!(summary.fallbacks, 1);
        assert!(table
            .get(&ProductKey::new("acme", "09"))
            .unwrap()
            .color
            .is_neutral_fallback());
    }
}
