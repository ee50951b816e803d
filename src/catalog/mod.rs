//! Product records, per-key merging and catalog export

pub mod batch;
pub mod export;
pub mod merge;
pub mod record;

pub use batch::{BatchItem, BatchProcessor, BatchSummary};
pub use export::{export_rows, export_rows_now, CatalogRow, CATALOG_HEADER};
pub use merge::{merge, MergeAction, RecordTable};
pub use record::{CaseType, ProductKey, ProductRecord};
