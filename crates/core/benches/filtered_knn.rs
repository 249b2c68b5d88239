//! Filtered KNN benchmark: batched merge vs. ad-hoc scan on a synthetic HNSW index.
//! Measures Recall@10 against an exact flat scan and QPS at several filter selectivities.
//!
//! Usage: cargo bench --bench filtered_knn
//! Set RUST_LOG=hybridknn_core=debug to see per-query mode selection.

use hybridknn_core::filter::IdListIterator;
use hybridknn_core::hybrid::HybridIterator;
use hybridknn_core::vector::{DistanceMetric, FlatIndex, HnswConfig, HnswIndex};
use hybridknn_core::{DocId, HybridPolicy, IndexIterator, QueryParams, TopKQuery, VectorIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashSet;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

const NUM_VECTORS: usize = 20_000;
const DIM: usize = 32;
const NUM_QUERIES: usize = 200;
const K: usize = 10;

fn random_vector(rng: &mut StdRng) -> Vec<f32> {
    (0..DIM).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

/// Runs one filtered query and returns the result ids.
fn filtered_query(
    index: &dyn VectorIndex,
    query: &[f32],
    allowed: &[DocId],
    policy: HybridPolicy,
) -> Vec<DocId> {
    let params = QueryParams {
        hybrid_policy: policy,
        ef_runtime: Some(64),
        ..QueryParams::default()
    };
    let filter: Box<dyn IndexIterator> = Box::new(IdListIterator::new(allowed.to_vec()));
    let mut it = HybridIterator::new(index, TopKQuery::new(query.to_vec(), K), params, None, Some(filter))
        .expect("valid query");
    let mut ids = Vec::with_capacity(K);
    while let Some(r) = it.read().expect("read") {
        ids.push(r.doc_id());
    }
    ids
}

fn recall(predicted: &[DocId], truth: &[DocId]) -> f64 {
    if truth.is_empty() {
        return 1.0;
    }
    let truth: HashSet<DocId> = truth.iter().copied().collect();
    predicted.iter().filter(|id| truth.contains(id)).count() as f64 / truth.len() as f64
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Filtered KNN Benchmark: {NUM_VECTORS} x {DIM}d, k={K} ===");
    println!();

    let mut rng = StdRng::seed_from_u64(42);
    let vectors: Vec<Vec<f32>> = (0..NUM_VECTORS).map(|_| random_vector(&mut rng)).collect();
    let queries: Vec<Vec<f32>> = (0..NUM_QUERIES).map(|_| random_vector(&mut rng)).collect();

    print!("Building indexes...");
    let config = HnswConfig {
        distance_metric: DistanceMetric::Euclidean,
        seed: Some(7),
        ..HnswConfig::default()
    };
    let mut hnsw = HnswIndex::new(DIM, config);
    let mut flat = FlatIndex::new(DIM, DistanceMetric::Euclidean);
    let t0 = Instant::now();
    for (i, v) in vectors.iter().enumerate() {
        hnsw.add(i as DocId, v).expect("insert");
        flat.add(i as DocId, v).expect("insert");
    }
    let build_time = t0.elapsed();
    println!(
        " {:.2}s ({:.0} inserts/s)",
        build_time.as_secs_f64(),
        NUM_VECTORS as f64 / build_time.as_secs_f64()
    );

    println!();
    println!("  selectivity | strategy |  Recall@10 |    QPS    | Avg latency");
    println!("  ------------+----------+------------+-----------+------------");

    for &selectivity in &[0.5, 0.1, 0.01, 0.001] {
        // Every doc whose id hashes into the bucket passes the filter.
        let stride = (1.0 / selectivity) as u64;
        let allowed: Vec<DocId> = (0..NUM_VECTORS as DocId)
            .filter(|id| id.wrapping_mul(2_654_435_761) % stride == 0)
            .collect();

        let truth: Vec<Vec<DocId>> = queries
            .iter()
            .map(|q| filtered_query(&flat, q, &allowed, HybridPolicy::ForceAdhocBf))
            .collect();

        for (label, policy) in [
            ("batches", HybridPolicy::ForceBatches),
            ("adhoc", HybridPolicy::ForceAdhocBf),
        ] {
            let t0 = Instant::now();
            let mut total_recall = 0.0f64;
            for (qi, q) in queries.iter().enumerate() {
                let ids = filtered_query(&hnsw, q, &allowed, policy);
                total_recall += recall(&ids, &truth[qi]);
            }
            let elapsed = t0.elapsed();
            let qps = NUM_QUERIES as f64 / elapsed.as_secs_f64();
            let avg_latency_us = elapsed.as_micros() as f64 / NUM_QUERIES as f64;
            println!(
                "  {:>10.1}% | {:<8} | {:.4}     | {:>9.1} | {:.0} us",
                selectivity * 100.0,
                label,
                total_recall / NUM_QUERIES as f64,
                qps,
                avg_latency_us
            );
        }
    }

    println!();
    println!("=== Benchmark complete ===");
}
