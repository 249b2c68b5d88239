mod common;

use common::{drain, ScriptedIndex};
use hybridknn_core::filter::IdListIterator;
use hybridknn_core::hybrid::{HybridIterator, TopKSet};
use hybridknn_core::result::{DistanceResult, HybridResult, IndexResult};
use hybridknn_core::{DocId, HybridPolicy, IndexIterator, QueryParams, TopKQuery};
use proptest::prelude::*;
use std::collections::{BTreeMap, BTreeSet};

/// Documents with pairwise-distinct distances, plus a filter over (mostly) the same id space.
fn corpus() -> impl Strategy<Value = (Vec<(DocId, f32)>, Vec<DocId>)> {
    prop::collection::btree_set(1u64..200, 1..80).prop_flat_map(|ids| {
        let n = ids.len();
        (
            Just(ids),
            Just((0..n as u32).collect::<Vec<u32>>()).prop_shuffle(),
            prop::collection::vec(1u64..220, 0..120),
        )
            .prop_map(|(ids, ranks, filter)| {
                let docs: Vec<(DocId, f32)> = ids
                    .into_iter()
                    .zip(ranks)
                    .map(|(id, rank)| (id, (rank + 1) as f32 / 256.0))
                    .collect();
                (docs, filter)
            })
    })
}

fn run(
    docs: &[(DocId, f32)],
    filter: &[DocId],
    k: usize,
    policy: HybridPolicy,
) -> Vec<(DocId, f32)> {
    let index = ScriptedIndex::new(docs);
    let params = QueryParams {
        hybrid_policy: policy,
        ..QueryParams::default()
    };
    let child: Box<dyn IndexIterator> = Box::new(IdListIterator::new(filter.to_vec()));
    let mut it =
        HybridIterator::new(&index, TopKQuery::new(vec![0.0], k), params, None, Some(child)).unwrap();
    drain(&mut it)
}

/// The k smallest-distance documents present in both inputs, sorted by id.
fn brute_force(docs: &[(DocId, f32)], filter: &[DocId], k: usize) -> Vec<(DocId, f32)> {
    let accepted: BTreeSet<DocId> = filter.iter().copied().collect();
    let mut matches: Vec<(DocId, f32)> = docs
        .iter()
        .copied()
        .filter(|(id, _)| accepted.contains(id))
        .collect();
    matches.sort_by(|a, b| a.1.total_cmp(&b.1));
    matches.truncate(k);
    matches.sort_by_key(|&(id, _)| id);
    matches
}

proptest! {
    #[test]
    fn prop_output_bounded_by_k((docs, filter) in corpus(), k in 1usize..20) {
        for policy in [HybridPolicy::ForceBatches, HybridPolicy::ForceAdhocBf] {
            prop_assert!(run(&docs, &filter, k, policy).len() <= k);
        }
    }

    #[test]
    fn prop_results_in_both_streams((docs, filter) in corpus(), k in 1usize..20) {
        let distances: BTreeMap<DocId, f32> = docs.iter().copied().collect();
        let accepted: BTreeSet<DocId> = filter.iter().copied().collect();
        for (id, distance) in run(&docs, &filter, k, HybridPolicy::ForceBatches) {
            prop_assert!(accepted.contains(&id), "doc {} not accepted by the filter", id);
            prop_assert_eq!(distances.get(&id).copied(), Some(distance));
        }
    }

    #[test]
    fn prop_matches_brute_force_top_k((docs, filter) in corpus(), k in 1usize..20) {
        let expected = brute_force(&docs, &filter, k);
        for policy in [HybridPolicy::ForceBatches, HybridPolicy::ForceAdhocBf] {
            let mut got = run(&docs, &filter, k, policy);
            got.sort_by_key(|&(id, _)| id);
            prop_assert_eq!(&got, &expected, "policy {:?}", policy);
        }
    }

    #[test]
    fn prop_no_duplicate_results((docs, filter) in corpus(), k in 1usize..20) {
        let got = run(&docs, &filter, k, HybridPolicy::ForceBatches);
        let unique: BTreeSet<DocId> = got.iter().map(|&(id, _)| id).collect();
        prop_assert_eq!(unique.len(), got.len());
    }

    #[test]
    fn prop_upper_bound_non_increasing(
        distances in prop::collection::vec(0.0f32..1.0, 1..200),
        k in 1usize..16,
    ) {
        let mut set = TopKSet::new(k);
        let mut bound = f32::INFINITY;
        for (i, d) in distances.into_iter().enumerate() {
            let id = i as DocId;
            let vector = DistanceResult { doc_id: id, distance: d, score_field: None };
            set.insert(HybridResult::new(vector, IndexResult::Virtual(id)));
            prop_assert!(set.len() <= k);
            let next = set.upper_bound();
            prop_assert!(next <= bound);
            bound = next;
        }
    }
}
