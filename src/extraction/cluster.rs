//! Seeded k-means over RGB pixel populations
//!
//! Wraps `kmeans_colors` so both extractors get centroids and cluster
//! sizes in a fixed cluster order. Populations with no more distinct colors
//! than requested clusters are partitioned exactly (one cluster per distinct
//! color, in order of first appearance) without running k-means.

use std::collections::HashMap;

use kmeans_colors::get_kmeans;
use palette::Srgb;

use crate::color::ColorSample;
use crate::config::ClusteringConfig;
use crate::{AnalysisError, Result};

/// One cluster of a partitioned pixel population
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cluster {
    /// Centroid channels in [0, 255], unrounded
    pub centroid: [f64; 3],
    /// Number of member pixels
    pub size: usize,
}

impl Cluster {
    /// Centroid rounded to the nearest integer and clamped per channel
    pub fn centroid_sample(&self) -> ColorSample {
        let [r, g, b] = self.centroid;
        ColorSample::from_f64_channels(r, g, b)
    }
}

/// k-means partitioner with a fixed cluster count and seed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelClusterer {
    clusters: usize,
    config: ClusteringConfig,
}

impl PixelClusterer {
    pub fn new(clusters: usize, config: ClusteringConfig) -> Self {
        Self { clusters, config }
    }

    /// Partition `pixels` into at most `clusters` groups
    ///
    /// # Errors
    ///
    /// Returns `AnalysisError::ClusteringError` for an empty population or
    /// a cluster count outside 1..=255
    pub fn cluster(&self, pixels: &[ColorSample]) -> Result<Vec<Cluster>> {
        if pixels.is_empty() {
            return Err(AnalysisError::ClusteringError {
                reason: "no pixels to cluster".into(),
            });
        }
        if self.clusters == 0 || self.clusters > u8::MAX as usize {
            return Err(AnalysisError::ClusteringError {
                reason: format!("unsupported cluster count {}", self.clusters),
            });
        }

        let distinct = distinct_colors(pixels);
        if distinct.len() <= self.clusters {
            return Ok(distinct
                .into_iter()
                .map(|(color, size)| Cluster {
                    centroid: color.to_array().map(f64::from),
                    size,
                })
                .collect());
        }

        let buffer: Vec<Srgb> = pixels
            .iter()
            .map(|p| Srgb::new(p.r, p.g, p.b).into_format::<f32>())
            .collect();

        let result = get_kmeans(
            self.clusters,
            self.config.max_iterations,
            self.config.convergence,
            false,
            &buffer,
            self.config.seed,
        );

        let mut sizes = vec![0usize; result.centroids.len()];
        for &index in &result.indices {
            if let Some(size) = sizes.get_mut(usize::from(index)) {
                *size += 1;
            }
        }

        Ok(result
            .centroids
            .iter()
            .zip(sizes)
            .map(|(c, size)| Cluster {
                centroid: [
                    f64::from(c.red) * 255.0,
                    f64::from(c.green) * 255.0,
                    f64::from(c.blue) * 255.0,
                ],
                size,
            })
            .collect())
    }
}

/// Cluster with the most members; ties go to the lowest index
pub fn largest_cluster(clusters: &[Cluster]) -> Option<&Cluster> {
    clusters
        .iter()
        .fold(None, |best: Option<&Cluster>, c| match best {
            Some(b) if b.size >= c.size => Some(b),
            _ => Some(c),
        })
}

fn distinct_colors(pixels: &[ColorSample]) -> Vec<(ColorSample, usize)> {
    let mut order: Vec<(ColorSample, usize)> = Vec::new();
    let mut index: HashMap<ColorSample, usize> = HashMap::new();
    for &p in pixels {
        match index.get(&p) {
            Some(&i) => order[i].1 += 1,
            None => {
                index.insert(p, order.len());
                order.push((p, 1));
            }
        }
    }
    order
}
