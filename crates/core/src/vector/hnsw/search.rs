//! HNSW search algorithms: single-layer search and multi-layer KNN.

use crate::vector::hnsw::graph::HnswIndex;
use crate::vector::hnsw::visited::VisitedSet;
use ordered_float::OrderedFloat;
use std::cell::RefCell;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

thread_local! {
    /// Per-thread visited set reused across queries.
    static SEARCH_VISITED: RefCell<VisitedSet> = RefCell::new(VisitedSet::new(0));
}

/// Search a single layer of the HNSW graph.
///
/// Returns up to `ef` `(distance, node)` pairs closest to `query`, ascending by distance.
/// `visited` is reset at the start of each call.
pub(crate) fn search_layer(
    index: &HnswIndex,
    query: &[f32],
    entry_points: &[u32],
    ef: usize,
    layer: usize,
    visited: &mut VisitedSet,
) -> Vec<(f32, u32)> {
    visited.reset();
    let ef = ef.max(1);
    // Min-heap of frontier candidates, max-heap of kept results.
    let mut candidates: BinaryHeap<Reverse<(OrderedFloat<f32>, u32)>> =
        BinaryHeap::with_capacity(ef * 2);
    let mut results: BinaryHeap<(OrderedFloat<f32>, u32)> = BinaryHeap::with_capacity(ef + 1);
    let mut worst_dist = f32::MAX;

    for &ep in entry_points {
        if visited.visit(ep) {
            let dist = index.distance_to_node(query, ep);
            candidates.push(Reverse((OrderedFloat(dist), ep)));
            results.push((OrderedFloat(dist), ep));
            if results.len() > ef {
                results.pop();
            }
            worst_dist = results.peek().map_or(f32::MAX, |r| r.0 .0);
        }
    }

    while let Some(Reverse((c_dist, node))) = candidates.pop() {
        // The closest frontier node is already farther than the worst kept result.
        if results.len() >= ef && c_dist.0 > worst_dist {
            break;
        }

        let Some(neighbor_list) = index.neighbors[node as usize].get(layer) else {
            continue;
        };
        for &neighbor in neighbor_list {
            if !visited.visit(neighbor) {
                continue;
            }
            let dist = index.distance_to_node(query, neighbor);
            if results.len() < ef || dist < worst_dist {
                candidates.push(Reverse((OrderedFloat(dist), neighbor)));
                results.push((OrderedFloat(dist), neighbor));
                if results.len() > ef {
                    results.pop();
                }
                worst_dist = results.peek().map_or(f32::MAX, |r| r.0 .0);
            }
        }
    }

    results
        .into_sorted_vec()
        .into_iter()
        .map(|(d, id)| (d.0, id))
        .collect()
}

/// Multi-layer KNN search through the HNSW graph.
///
/// Greedy descent with `ef = 1` down to layer 1, then a layer-0 search with
/// `max(ef, k)`. Returns up to `k` `(distance, node)` pairs, ascending by distance.
pub fn knn_search(index: &HnswIndex, query: &[f32], k: usize, ef: usize) -> Vec<(f32, u32)> {
    let Some(entry_point) = index.entry_point else {
        return Vec::new();
    };
    if k == 0 {
        return Vec::new();
    }

    SEARCH_VISITED.with(|cell| {
        let mut visited = cell.borrow_mut();
        visited.grow(index.len());

        let mut current_ep = entry_point;
        for layer in (1..=index.max_layer).rev() {
            let nearest = search_layer(
                index,
                query,
                std::slice::from_ref(&current_ep),
                1,
                layer,
                &mut visited,
            );
            if let Some(&(_, node)) = nearest.first() {
                current_ep = node;
            }
        }

        let mut results = search_layer(
            index,
            query,
            std::slice::from_ref(&current_ep),
            ef.max(k),
            0,
            &mut visited,
        );
        results.truncate(k);
        results
    })
}
