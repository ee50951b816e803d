//! Catalog recommendation ranking
//!
//! Candidates are ordered by Euclidean distance to the target in undamped
//! Lab space. Damping only enters when candidates are assigned to seasons.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::color::{ColorConverter, LabColor, Measured};
use crate::config::RankerConfig;
use crate::season::{ClassificationResult, Season, SeasonClassifier, SeasonInput};
use crate::{AnalysisError, Result};

/// One catalog color offered to the ranker
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    /// Undamped Lab
    pub lab: LabColor<Measured>,
}

impl Candidate {
    pub fn new(id: impl Into<String>, lab: LabColor<Measured>) -> Self {
        Self { id: id.into(), lab }
    }
}

/// One ranked candidate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// 1-based position
    pub rank: usize,
    pub candidate_id: String,
    pub distance: f64,
}

/// Which candidates compete in a season-aware ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonScope {
    /// Only candidates classified into the target season
    #[default]
    Within,
    /// Every candidate
    Across,
}

/// Classification of a face plus the ranked catalog colors for it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationReport {
    pub classification: ClassificationResult,
    pub recommendations: Vec<Recommendation>,
}

/// Orders candidates by perceptual distance and keeps the top N
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecommendationRanker {
    top_n: usize,
}

impl Default for RecommendationRanker {
    fn default() -> Self {
        Self::with_config(&RankerConfig::default())
    }
}

impl RecommendationRanker {
    pub fn new(top_n: usize) -> Self {
        Self { top_n }
    }

    pub fn with_config(config: &RankerConfig) -> Self {
        Self::new(config.top_n)
    }

    pub fn top_n(&self) -> usize {
        self.top_n
    }

    /// Rank `candidates` by ascending distance to `target`
    ///
    /// Equal distances keep input order. Candidates with non-finite Lab are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::InvalidInput` if `target` is not finite
    pub fn rank(
        &self,
        target: &LabColor<Measured>,
        candidates: &[Candidate],
    ) -> Result<Vec<Recommendation>> {
        if !target.is_finite() {
            return Err(AnalysisError::invalid_input(
                "target",
                format!("{:?}", target.to_array()),
            ));
        }

        let mut scored: Vec<(&Candidate, f64)> = candidates
            .iter()
            .filter(|c| {
                let finite = c.lab.is_finite();
                if !finite {
                    warn!("Skipping candidate {} with non-finite Lab {:?}", c.id, c.lab.to_array());
                }
                finite
            })
            .map(|c| (c, target.distance(&c.lab)))
            .collect();
        scored.sort_by(|x, y| x.1.total_cmp(&y.1));

        Ok(scored
            .into_iter()
            .take(self.top_n)
            .enumerate()
            .map(|(i, (c, distance))| Recommendation {
                rank: i + 1,
                candidate_id: c.id.clone(),
                distance,
            })
            .collect())
    }

    /// Rank within `season` or across the whole catalog
    ///
    /// Candidates are assigned to seasons by `classifier` on their damped
    /// Lab. An empty season falls back to ranking across the catalog.
    pub fn rank_for_season(
        &self,
        classifier: &SeasonClassifier,
        season: Season,
        target: &LabColor<Measured>,
        candidates: &[Candidate],
        scope: SeasonScope,
    ) -> Result<Vec<Recommendation>> {
        if scope == SeasonScope::Across {
            return self.rank(target, candidates);
        }

        let damping = classifier.palette().damping();
        let mut in_season = Vec::new();
        for candidate in candidates.iter().filter(|c| c.lab.is_finite()) {
            if classifier.predict_season(&candidate.lab.damp(damping))? == season {
                in_season.push(candidate.clone());
            }
        }

        if in_season.is_empty() {
            debug!(
                "No candidates classified as {} among {}, ranking across seasons",
                season,
                candidates.len()
            );
            return self.rank(target, candidates);
        }
        self.rank(target, &in_season)
    }

    /// Classify a face and rank the catalog for its season
    pub fn recommend(
        &self,
        classifier: &SeasonClassifier,
        input: &SeasonInput,
        candidates: &[Candidate],
        scope: SeasonScope,
    ) -> Result<RecommendationReport> {
        let corrected = input.corrected()?;
        let converter = ColorConverter::with_damping(classifier.palette().damping());
        let classification = classifier.classify(&converter.damp_lightness(corrected))?;
        let recommendations = self.rank_for_season(
            classifier,
            classification.predicted_season,
            &corrected,
            candidates,
            scope,
        )?;
        Ok(RecommendationReport {
            classification,
            recommendations,
        })
    }
}
