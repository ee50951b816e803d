//! Personal-color season classification

pub mod classifier;
pub mod input;
pub mod palette;

pub use classifier::{ClassificationResult, SeasonClassifier, SeasonDetail};
pub use input::SeasonInput;
pub use palette::{PalettePoint, PaletteTables, Season, SeasonPalette};
