//! HNSW insertion algorithm.
//!
//! Inserts a vector with bidirectional connections and heuristic neighbor
//! pruning (Algorithm 4 from the HNSW paper). All distances are exact f32.

use crate::config;
use crate::error::IndexError;
use crate::result::DocId;
use crate::vector::hnsw::graph::HnswIndex;
use crate::vector::hnsw::search::search_layer;
use crate::vector::hnsw::visited::VisitedSet;
use std::collections::HashSet;

impl HnswIndex {
    /// Adds `vector` under the external id `label`.
    pub fn add(&mut self, label: DocId, vector: &[f32]) -> Result<(), IndexError> {
        if self.dimension > config::MAX_DIMENSION {
            return Err(IndexError::DimensionTooLarge(self.dimension));
        }
        if vector.len() != self.dimension {
            return Err(IndexError::DimensionMismatch {
                expected: self.dimension,
                actual: vector.len(),
            });
        }
        if vector.iter().any(|x| !x.is_finite()) {
            return Err(IndexError::NonFiniteVector);
        }
        if self.contains(label) {
            return Err(IndexError::DuplicateId(label));
        }

        let node = self.labels.len() as u32;
        let level = self.random_level();

        let Some(entry_point) = self.entry_point else {
            self.push_node(label, vector, vec![Vec::new(); level + 1]);
            self.entry_point = Some(node);
            self.max_layer = level;
            return Ok(());
        };

        let mut visited = VisitedSet::new(self.len());
        let mut current_ep = entry_point;

        // Phase 1: greedy descent from the top layer down to level + 1
        for layer in (level + 1..=self.max_layer).rev() {
            let nearest = search_layer(
                self,
                vector,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, nearest)) = nearest.first() {
                current_ep = nearest;
            }
        }

        // Phase 2: collect neighbors on every layer the new node lives on
        let top = level.min(self.max_layer);
        let mut node_neighbors: Vec<Vec<u32>> = vec![Vec::new(); level + 1];
        let mut layer_eps: Vec<u32> = vec![current_ep];
        for layer in (0..=top).rev() {
            let candidates = search_layer(
                self,
                vector,
                &layer_eps,
                self.config.ef_construction,
                layer,
                &mut visited,
            );
            let selected = select_neighbors_heuristic(self, &candidates, self.max_links(layer));
            node_neighbors[layer] = selected.iter().map(|&(_, id)| id).collect();

            layer_eps.clear();
            layer_eps.extend(candidates.iter().map(|&(_, id)| id));
            if layer_eps.is_empty() {
                layer_eps.push(entry_point);
            }
        }

        self.push_node(label, vector, node_neighbors);

        // Phase 3: back-links, pruning neighbors that exceed their link limit
        for layer in 0..=top {
            let m_max = self.max_links(layer);
            let my_neighbors = self.neighbors[node as usize][layer].clone();
            for neighbor in my_neighbors {
                let nid = neighbor as usize;
                while self.neighbors[nid].len() <= layer {
                    self.neighbors[nid].push(Vec::new());
                }
                self.neighbors[nid][layer].push(node);

                if self.neighbors[nid][layer].len() > m_max {
                    let base = self.vector(neighbor);
                    let candidates: Vec<(f32, u32)> = self.neighbors[nid][layer]
                        .iter()
                        .map(|&cid| (self.config.distance_metric.distance(base, self.vector(cid)), cid))
                        .collect();
                    let pruned = select_neighbors_heuristic(self, &candidates, m_max);
                    self.neighbors[nid][layer] = pruned.iter().map(|&(_, id)| id).collect();
                }
            }
        }

        if level > self.max_layer {
            self.max_layer = level;
            self.entry_point = Some(node);
        }
        Ok(())
    }

    fn push_node(&mut self, label: DocId, vector: &[f32], links: Vec<Vec<u32>>) {
        let node = self.labels.len() as u32;
        self.vectors.extend_from_slice(vector);
        self.labels.push(label);
        self.label_to_node.insert(label, node);
        self.neighbors.push(links);
    }
}

/// Heuristic neighbor selection (Algorithm 4 from the HNSW paper).
///
/// A candidate is kept only if it is closer to the base node than to every
/// neighbor already kept; remaining slots are back-filled by plain distance.
fn select_neighbors_heuristic(
    index: &HnswIndex,
    candidates: &[(f32, u32)],
    m: usize,
) -> Vec<(f32, u32)> {
    let mut sorted = candidates.to_vec();
    sorted.sort_unstable_by(|a, b| a.0.total_cmp(&b.0));

    let metric = index.config.distance_metric;
    let mut selected: Vec<(f32, u32)> = Vec::with_capacity(m);
    for &(dist_to_base, cid) in &sorted {
        if selected.len() >= m {
            break;
        }
        let candidate = index.vector(cid);
        let is_diverse = selected
            .iter()
            .all(|&(_, sid)| dist_to_base <= metric.distance(candidate, index.vector(sid)));
        if is_diverse {
            selected.push((dist_to_base, cid));
        }
    }

    if selected.len() < m {
        let taken: HashSet<u32> = selected.iter().map(|&(_, id)| id).collect();
        for &(dist, cid) in &sorted {
            if selected.len() >= m {
                break;
            }
            if !taken.contains(&cid) {
                selected.push((dist, cid));
            }
        }
    }
    selected
}
