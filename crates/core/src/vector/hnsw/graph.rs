//! HNSW graph structure and configuration.
//!
//! [`HnswConfig`] defines tuning parameters (M, ef_construction, ef_search, distance metric).
//! [`HnswIndex`] stores the graph using Struct-of-Arrays layout: one contiguous
//! f32 arena for vectors, with separate arrays for labels and per-layer neighbor lists.

use crate::config;
use crate::result::DocId;
use crate::vector::DistanceMetric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Configuration parameters for an HNSW index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HnswConfig {
    /// Number of bidirectional links per node (except layer 0, which uses `m_max0`).
    pub m: usize,
    /// Maximum links per node at layer 0 (typically `2 * m`).
    pub m_max0: usize,
    /// Candidate list size during index construction.
    pub ef_construction: usize,
    /// Candidate list size during search (higher = better recall, slower).
    pub ef_search: usize,
    /// Maximum number of layers in the graph.
    pub max_layers: usize,
    pub distance_metric: DistanceMetric,
    /// Seed for layer assignment. `None` seeds from OS entropy.
    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for HnswConfig {
    fn default() -> Self {
        Self {
            m: config::HNSW_DEFAULT_M,
            m_max0: config::HNSW_DEFAULT_M * 2,
            ef_construction: config::HNSW_DEFAULT_EF_CONSTRUCTION,
            ef_search: config::HNSW_DEFAULT_EF_SEARCH,
            max_layers: config::HNSW_DEFAULT_MAX_LAYERS,
            distance_metric: DistanceMetric::Cosine,
            seed: None,
        }
    }
}

/// HNSW index over f32 vectors, addressed internally by dense `u32` node ids
/// and externally by [`DocId`] labels.
#[derive(Debug)]
pub struct HnswIndex {
    pub config: HnswConfig,
    // SoA: vector arena, node_count * dimension floats
    pub(crate) vectors: Vec<f32>,
    pub(crate) labels: Vec<DocId>,
    pub(crate) label_to_node: HashMap<DocId, u32>,
    // SoA: graph structure
    pub(crate) neighbors: Vec<Vec<Vec<u32>>>, // [node_id][layer][neighbor_ids]
    pub(crate) entry_point: Option<u32>,
    pub(crate) max_layer: usize,
    pub(crate) dimension: usize,
    rng: StdRng,
}

impl HnswIndex {
    /// Creates a new empty HNSW index with the given dimension and configuration.
    pub fn new(dimension: usize, config: HnswConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            config,
            vectors: Vec::new(),
            labels: Vec::new(),
            label_to_node: HashMap::new(),
            neighbors: Vec::new(),
            entry_point: None,
            max_layer: 0,
            dimension,
            rng,
        }
    }

    /// Creates a new empty HNSW index with default configuration (cosine, M=16, ef_c=200).
    pub fn with_default_config(dimension: usize) -> Self {
        Self::new(dimension, HnswConfig::default())
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn contains(&self, label: DocId) -> bool {
        self.label_to_node.contains_key(&label)
    }

    /// Draws a layer for a new node from the exponential distribution `floor(-ln(U) / ln(M))`.
    pub(crate) fn random_level(&mut self) -> usize {
        let ml = 1.0 / (self.config.m.max(2) as f64).ln();
        // 1 - [0, 1) keeps the sample in (0, 1] so ln() stays finite.
        let r: f64 = 1.0 - self.rng.gen::<f64>();
        let level = (-r.ln() * ml).floor() as usize;
        level.min(self.config.max_layers.saturating_sub(1))
    }

    /// The stored vector of a node. O(1) slice into the arena.
    #[inline]
    pub(crate) fn vector(&self, node: u32) -> &[f32] {
        let start = node as usize * self.dimension;
        &self.vectors[start..start + self.dimension]
    }

    #[inline]
    pub(crate) fn label(&self, node: u32) -> DocId {
        self.labels[node as usize]
    }

    #[inline]
    pub(crate) fn distance_to_node(&self, query: &[f32], node: u32) -> f32 {
        self.config.distance_metric.distance(query, self.vector(node))
    }

    pub(crate) fn max_links(&self, layer: usize) -> usize {
        if layer == 0 {
            self.config.m_max0
        } else {
            self.config.m
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = HnswConfig::default();
        assert_eq!(config.m, config::HNSW_DEFAULT_M);
        assert_eq!(config.m_max0, 2 * config::HNSW_DEFAULT_M);
        assert!(config.seed.is_none());
    }

    #[test]
    fn test_config_from_json() {
        let config: HnswConfig = serde_json::from_str(
            r#"{"m": 8, "m_max0": 16, "ef_construction": 64, "ef_search": 32,
                "max_layers": 4, "distance_metric": "Euclidean"}"#,
        )
        .unwrap();
        assert_eq!(config.m, 8);
        assert_eq!(config.distance_metric, DistanceMetric::Euclidean);
        assert_eq!(config.seed, None);
    }

    #[test]
    fn test_random_level_is_bounded() {
        let config = HnswConfig {
            max_layers: 3,
            seed: Some(7),
            ..HnswConfig::default()
        };
        let mut index = HnswIndex::new(4, config);
        for _ in 0..1000 {
            assert!(index.random_level() < 3);
        }
    }
}
