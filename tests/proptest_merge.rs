//! Property-based tests for the merge algorithms.
//!
//! Uses `proptest` to generate arbitrary per-collection score lists and
//! weights, and checks the ordering and cardinality guarantees that every
//! merge strategy must uphold.

use proptest::prelude::*;
use refract::aggregate::merger::{self, MergeOptions, MergeStrategy};
use refract::aggregate::{CollectionQueryConfig, CollectionResult};
use refract::backend::{Hit, ResponseEnvelope};
use std::collections::HashMap;
use std::sync::Arc;

fn collection_result(index: usize, scores: &[f32]) -> CollectionResult {
    let hits = scores
        .iter()
        .enumerate()
        .map(|(i, score)| Hit {
            id: format!("c{index}-h{i}"),
            score: *score,
            fields: HashMap::new(),
            highlight: None,
        })
        .collect::<Vec<_>>();
    let found = hits.len() as u64;

    CollectionResult {
        collection: format!("collection-{index}"),
        namespace: None,
        response: Arc::new(ResponseEnvelope {
            hits,
            found,
            facet_counts: vec![],
            search_time_ms: 1,
        }),
        elapsed_ms: 1,
    }
}

/// Up to 4 collections, each with up to 12 positive scores and a weight.
fn collections_strategy() -> impl Strategy<Value = Vec<(Vec<f32>, f32)>> {
    prop::collection::vec(
        (
            prop::collection::vec(0.01f32..100.0, 0..12),
            0.1f32..8.0,
        ),
        1..4,
    )
}

proptest! {
    #[test]
    fn relevance_merge_is_non_increasing(inputs in collections_strategy()) {
        let results: Vec<CollectionResult> = inputs
            .iter()
            .enumerate()
            .map(|(i, (scores, _))| collection_result(i, scores))
            .collect();
        let configs: Vec<CollectionQueryConfig> = inputs
            .iter()
            .enumerate()
            .map(|(i, (_, weight))| {
                CollectionQueryConfig::new(format!("collection-{i}"))
                    .with_weight(*weight)
                    .with_max_results(100)
            })
            .collect();

        let merged = merger::merge(&results, &configs, &MergeOptions::default());

        for pair in merged.windows(2) {
            prop_assert!(pair[0].merged_score >= pair[1].merged_score);
        }
    }

    #[test]
    fn normalized_scores_stay_in_unit_range(inputs in collections_strategy()) {
        let results: Vec<CollectionResult> = inputs
            .iter()
            .enumerate()
            .map(|(i, (scores, _))| collection_result(i, scores))
            .collect();
        let configs: Vec<CollectionQueryConfig> = inputs
            .iter()
            .enumerate()
            .map(|(i, _)| {
                CollectionQueryConfig::new(format!("collection-{i}")).with_max_results(100)
            })
            .collect();

        let merged = merger::merge(&results, &configs, &MergeOptions::default());

        for hit in &merged {
            prop_assert!(hit.normalized_score > 0.0);
            prop_assert!(hit.normalized_score <= 1.0 + f32::EPSILON);
        }
    }

    #[test]
    fn every_strategy_preserves_hit_count_up_to_cap(
        inputs in collections_strategy(),
        cap in prop::option::of(0usize..30),
    ) {
        let results: Vec<CollectionResult> = inputs
            .iter()
            .enumerate()
            .map(|(i, (scores, _))| collection_result(i, scores))
            .collect();
        let configs: Vec<CollectionQueryConfig> = inputs
            .iter()
            .enumerate()
            .map(|(i, (_, weight))| {
                CollectionQueryConfig::new(format!("collection-{i}"))
                    .with_weight(*weight)
                    .with_max_results(100)
            })
            .collect();
        let total: usize = inputs.iter().map(|(scores, _)| scores.len()).sum();

        for strategy in [
            MergeStrategy::Relevance,
            MergeStrategy::RoundRobin,
            MergeStrategy::CollectionOrder,
        ] {
            let options = MergeOptions {
                strategy,
                global_max_results: cap,
                ..MergeOptions::default()
            };
            let merged = merger::merge(&results, &configs, &options);
            let expected = cap.map_or(total, |c| total.min(c));
            prop_assert_eq!(merged.len(), expected);
        }
    }

    #[test]
    fn round_robin_preserves_within_collection_order(inputs in collections_strategy()) {
        let results: Vec<CollectionResult> = inputs
            .iter()
            .enumerate()
            .map(|(i, (scores, _))| collection_result(i, scores))
            .collect();
        let configs: Vec<CollectionQueryConfig> = inputs
            .iter()
            .enumerate()
            .map(|(i, _)| {
                CollectionQueryConfig::new(format!("collection-{i}")).with_max_results(100)
            })
            .collect();

        let options = MergeOptions {
            strategy: MergeStrategy::RoundRobin,
            ..MergeOptions::default()
        };
        let merged = merger::merge(&results, &configs, &options);

        // Within each source collection, merged output keeps ascending rank.
        for config in &configs {
            let ranks: Vec<usize> = merged
                .iter()
                .filter(|h| h.collection == config.collection)
                .map(|h| h.rank)
                .collect();
            prop_assert!(ranks.windows(2).all(|w| w[0] < w[1]));
        }
    }
}
