//! Season labels and the reference palette

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::{Damped, LabColor, Measured};
use crate::{AnalysisError, Result};

/// Personal-color season
///
/// Declaration order is the tie-break priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl Season {
    pub const ALL: [Season; 4] = [Season::Spring, Season::Summer, Season::Autumn, Season::Winter];

    pub const fn as_str(self) -> &'static str {
        match self {
            Season::Spring => "spring",
            Season::Summer => "summer",
            Season::Autumn => "autumn",
            Season::Winter => "winter",
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self> {
        let lowered = s.trim().to_ascii_lowercase();
        Season::ALL
            .into_iter()
            .find(|season| season.as_str() == lowered)
            .ok_or_else(|| AnalysisError::UnknownSeason {
                label: s.to_string(),
            })
    }
}

/// Undamped palette rows per season, as supplied by the caller
pub type PaletteTables = BTreeMap<Season, Vec<[f64; 3]>>;

/// One labelled palette point in damped space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PalettePoint {
    pub season: Season,
    pub lab: LabColor<Damped>,
}

/// Immutable reference palette, damped once at construction
#[derive(Debug, Clone, PartialEq)]
pub struct SeasonPalette {
    points: Vec<PalettePoint>,
    damping: f64,
}

impl SeasonPalette {
    /// Build from undamped `(L, a, b)` rows
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidPalette` if a season is missing or
    /// empty, a row is not finite, or `damping` is not a positive finite number
    pub fn from_tables(tables: &PaletteTables, damping: f64) -> Result<Self> {
        if !(damping.is_finite() && damping > 0.0) {
            return Err(AnalysisError::InvalidPalette {
                reason: format!("lightness damping must be positive, got {}", damping),
            });
        }

        let mut points = Vec::new();
        for season in Season::ALL {
            let rows = tables.get(&season).filter(|rows| !rows.is_empty()).ok_or_else(|| {
                AnalysisError::InvalidPalette {
                    reason: format!("no palette rows for {}", season),
                }
            })?;
            for (i, &[l, a, b]) in rows.iter().enumerate() {
                let lab = LabColor::<Measured>::new(l, a, b);
                if !lab.is_finite() {
                    return Err(AnalysisError::InvalidPalette {
                        reason: format!("{} row {} is not finite: {:?}", season, i, [l, a, b]),
                    });
                }
                points.push(PalettePoint {
                    season,
                    lab: lab.damp(damping),
                });
            }
        }

        Ok(Self { points, damping })
    }

    /// Parse `{"spring": [[L, a, b], ...], ...}`
    pub fn from_json_str(content: &str, damping: f64) -> Result<Self> {
        let tables: PaletteTables = serde_json::from_str(content)
            .map_err(|e| AnalysisError::config("Failed to parse palette JSON", e))?;
        Self::from_tables(&tables, damping)
    }

    pub fn from_json_file(path: &Path, damping: f64) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AnalysisError::config(format!("Failed to read palette file {}", path.display()), e)
        })?;
        Self::from_json_str(&content, damping)
    }

    pub fn points(&self) -> &[PalettePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn damping(&self) -> f64 {
        self.damping
    }

    /// Damped points of one season
    pub fn season_points(&self, season: Season) -> impl Iterator<Item = &LabColor<Damped>> {
        self.points
            .iter()
            .filter(move |p| p.season == season)
            .map(|p| &p.lab)
    }

    pub fn season_len(&self, season: Season) -> usize {
        self.season_points(season).count()
    }
}
