//! Distance-weighted KNN season classifier
//!
//! All distances are Euclidean in damped-L Lab space. The k nearest palette
//! points vote with weight `1/d`. When the query coincides with one or more
//! of those points, only the coincident points vote, each with weight 1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::palette::{Season, SeasonPalette};
use crate::color::{Damped, LabColor, Measured};
use crate::config::ClassifierConfig;
use crate::constants::classifier::AFFINITY_EPSILON;
use crate::{AnalysisError, Result};

/// Per-season breakdown of one query
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeasonDetail {
    /// Palette points of this season
    pub vote_count: usize,
    /// Mean distance to all of this season's palette points
    pub average_distance: f64,
    /// Distance to this season's nearest palette point
    pub min_distance: f64,
}

/// Full classification of one query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassificationResult {
    pub predicted_season: Season,
    /// Weighted vote share per season, summing to 100
    pub vote_distribution: BTreeMap<Season, f64>,
    pub per_season_detail: BTreeMap<Season, SeasonDetail>,
}

#[derive(Debug, Clone, Copy, Default)]
struct Tally {
    weight: f64,
    distance_sum: f64,
    count: usize,
}

/// KNN classifier over an immutable [`SeasonPalette`]
#[derive(Debug, Clone)]
pub struct SeasonClassifier {
    palette: SeasonPalette,
    k: usize,
}

impl SeasonClassifier {
    /// Create a classifier voting over the `k` nearest points
    ///
    /// `k` larger than the palette is clamped to the palette size.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `k` is zero
    pub fn new(palette: SeasonPalette, k: usize) -> Result<Self> {
        if k == 0 {
            return Err(AnalysisError::invalid_input("k", k));
        }
        Ok(Self { palette, k })
    }

    pub fn with_config(palette: SeasonPalette, config: &ClassifierConfig) -> Result<Self> {
        Self::new(palette, config.k)
    }

    pub fn palette(&self) -> &SeasonPalette {
        &self.palette
    }

    pub fn k(&self) -> usize {
        self.k
    }

    /// Damp a caller-supplied `[L, a, b]` slice with the palette's factor
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` on wrong arity or non-finite values
    pub fn damp_values(&self, values: &[f64]) -> Result<LabColor<Damped>> {
        let lab = LabColor::<Measured>::try_from_slice(values)?;
        Ok(lab.damp(self.palette.damping()))
    }

    /// Most likely season for a damped query
    pub fn predict_season(&self, lab: &LabColor<Damped>) -> Result<Season> {
        let tallies = self.tally(lab)?;
        Ok(Self::winner(&tallies))
    }

    /// Weighted vote share per season, summing to 100
    pub fn vote_distribution(&self, lab: &LabColor<Damped>) -> Result<BTreeMap<Season, f64>> {
        let tallies = self.tally(lab)?;
        Ok(Self::shares(&tallies))
    }

    /// Point counts and distance statistics over the full palette; independent of k
    pub fn distance_summary(
        &self,
        lab: &LabColor<Damped>,
    ) -> Result<BTreeMap<Season, SeasonDetail>> {
        Self::check(lab)?;
        Ok(self.details(lab))
    }

    /// Prediction, vote distribution and per-season detail in one pass
    pub fn classify(&self, lab: &LabColor<Damped>) -> Result<ClassificationResult> {
        let tallies = self.tally(lab)?;
        Ok(ClassificationResult {
            predicted_season: Self::winner(&tallies),
            vote_distribution: Self::shares(&tallies),
            per_season_detail: self.details(lab),
        })
    }

    /// Similarity share per season from inverse distances to every palette point
    pub fn affinity_distribution(&self, lab: &LabColor<Damped>) -> Result<BTreeMap<Season, f64>> {
        Self::check(lab)?;
        let mut scores: BTreeMap<Season, f64> = Season::ALL.into_iter().map(|s| (s, 0.0)).collect();
        for point in self.palette.points() {
            let d = lab.distance(&point.lab);
            *scores.entry(point.season).or_default() += 1.0 / (d + AFFINITY_EPSILON);
        }
        let total: f64 = scores.values().sum();
        for score in scores.values_mut() {
            *score = *score / total * 100.0;
        }
        Ok(scores)
    }

    fn check(lab: &LabColor<Damped>) -> Result<()> {
        if lab.is_finite() {
            Ok(())
        } else {
            Err(AnalysisError::invalid_input(
                "lab",
                format!("{:?}", lab.to_array()),
            ))
        }
    }

    /// Indices and distances of the k nearest palette points; equal distances keep palette order
    fn nearest(&self, lab: &LabColor<Damped>) -> Vec<(usize, f64)> {
        let mut distances: Vec<(usize, f64)> = self
            .palette
            .points()
            .iter()
            .enumerate()
            .map(|(i, p)| (i, lab.distance(&p.lab)))
            .collect();
        distances.sort_by(|x, y| x.1.total_cmp(&y.1));
        distances.truncate(self.k.min(distances.len()));
        distances
    }

    fn tally(&self, lab: &LabColor<Damped>) -> Result<BTreeMap<Season, Tally>> {
        Self::check(lab)?;
        let neighbors = self.nearest(lab);
        let exact = neighbors.iter().any(|&(_, d)| d == 0.0);
        let points = self.palette.points();

        let mut tallies: BTreeMap<Season, Tally> =
            Season::ALL.into_iter().map(|s| (s, Tally::default())).collect();
        for &(i, d) in &neighbors {
            let weight = if exact {
                if d == 0.0 {
                    1.0
                } else {
                    0.0
                }
            } else {
                1.0 / d
            };
            let tally = tallies.entry(points[i].season).or_default();
            tally.weight += weight;
            tally.distance_sum += d;
            tally.count += 1;
        }
        Ok(tallies)
    }

    /// Highest weight; ties go to the lower distance sum, then season order
    fn winner(tallies: &BTreeMap<Season, Tally>) -> Season {
        let mut best: Option<(Season, Tally)> = None;
        for (&season, &tally) in tallies {
            if tally.count == 0 {
                continue;
            }
            best = match best {
                Some((_, top))
                    if tally.weight < top.weight
                        || (tally.weight == top.weight && tally.distance_sum >= top.distance_sum) =>
                {
                    best
                }
                _ => Some((season, tally)),
            };
        }
        best.map_or(Season::ALL[0], |(season, _)| season)
    }

    fn shares(tallies: &BTreeMap<Season, Tally>) -> BTreeMap<Season, f64> {
        let total: f64 = tallies.values().map(|t| t.weight).sum();
        tallies
            .iter()
            .map(|(&season, t)| {
                let share = if total > 0.0 { t.weight / total * 100.0 } else { 0.0 };
                (season, share)
            })
            .collect()
    }

    fn details(&self, lab: &LabColor<Damped>) -> BTreeMap<Season, SeasonDetail> {
        Season::ALL
            .into_iter()
            .map(|season| {
                let (sum, min, n) = self.palette.season_points(season).fold(
                    (0.0, f64::INFINITY, 0usize),
                    |(sum, min, n), p| {
                        let d = lab.distance(p);
                        (sum + d, min.min(d), n + 1)
                    },
                );
                let detail = SeasonDetail {
                    vote_count: n,
                    average_distance: if n > 0 { sum / n as f64 } else { f64::INFINITY },
                    min_distance: min,
                };
                (season, detail)
            })
            .collect()
    }
}
