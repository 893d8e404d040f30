#[cfg(test)]
mod tests {
    use crate::algorithms::aggregation::{
        GreedyAggregator, ProximityThreshold, RepresentativePolicy,
    };
    use crate::error::GtModelError;
    use crate::api::RecordIndex as R;
    use crate::models::{DepositRecord, DistanceCache};
    use proptest::prelude::*;
    use qtty::Kilometers;
    use std::collections::BTreeSet;

    /// Helper to build a record of the "Porphyry copper" group
    fn site(index: usize, tonnage: f64, grade: f64) -> DepositRecord {
        DepositRecord {
            index: R(index),
            ms: format!("/derived/ms{}", index),
            ms_name: format!("Site {}", index),
            commodity: "Q578".to_string(),
            top1_deposit_name: "Porphyry copper".to_string(),
            lat: Some(qtty::Degrees::new(index as f64)),
            lon: Some(qtty::Degrees::new(-(index as f64))),
            total_grade: Some(grade),
            total_tonnage: Some(tonnage),
            total_contained_metal: Some(grade * tonnage / 100.0),
        }
    }

    fn cache(pairs: &[(usize, usize, f64)]) -> DistanceCache {
        DistanceCache::from_pairs(
            pairs
                .iter()
                .map(|&(i, j, d)| (R(i), R(j), Kilometers::new(d))),
        )
        .unwrap()
    }

    fn aggregator(km: f64) -> GreedyAggregator {
        GreedyAggregator::new(ProximityThreshold::new(km).unwrap())
    }

    #[test]
    fn test_repeated_index_rejected_at_every_threshold() {
        let mut twin = site(0, 20.0, 1.0);
        twin.ms_name = "Twin".to_string();
        let records = vec![site(0, 10.0, 2.0), twin, site(1, 30.0, 1.0)];
        let distances = cache(&[(0, 1, 0.5)]);

        for km in [0.0, 1.0, 100.0] {
            let result = aggregator(km).aggregate(&records, &distances);
            assert!(
                matches!(result, Err(GtModelError::DuplicateRecordIndex(R(0)))),
                "threshold {} km accepted a repeated index",
                km
            );
        }
    }

    #[test]
    fn test_two_close_records_merge_with_weighted_grade() {
        let records = vec![site(0, 10.0, 2.0), site(1, 30.0, 1.0)];
        let clusters = aggregator(10.0).aggregate(&records, &cache(&[(0, 1, 5.0)])).unwrap();

        assert_eq!(clusters.len(), 1);
        let c = &clusters[0];
        assert_eq!(c.total_tonnage, Some(40.0));
        assert!((c.total_grade.unwrap() - 1.25).abs() < 1e-12);
        assert_eq!(c.members, vec![R(0), R(1)]);
        assert_eq!(c.ms_name, "::Site 0::Site 1");
        assert_eq!(c.ms, "::/derived/ms0::/derived/ms1");
        assert!(!c.grade_fallback);
    }

    #[test]
    fn test_unknown_distance_never_merges() {
        let records = vec![site(0, 10.0, 2.0), site(1, 30.0, 1.0)];
        let clusters = aggregator(1_000_000.0)
            .aggregate(&records, &DistanceCache::new())
            .unwrap();

        assert_eq!(clusters.len(), 2);
        assert!(clusters.iter().all(|c| c.len() == 1));
        assert_eq!(clusters[0].ms_name, "Site 0");
    }

    #[test]
    fn test_isolated_record_is_a_singleton() {
        let records = vec![site(0, 1.0, 1.0), site(1, 1.0, 1.0), site(2, 1.0, 1.0)];
        let distances = cache(&[(0, 1, 3.0), (0, 2, 50.0), (1, 2, 48.0)]);
        let clusters = aggregator(10.0).aggregate(&records, &distances).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![R(0), R(1)]);
        assert_eq!(clusters[1].members, vec![R(2)]);
        assert_eq!(clusters[1].ms_name, "Site 2");
    }

    #[test]
    fn test_distance_equal_to_threshold_does_not_merge() {
        let records = vec![site(0, 1.0, 1.0), site(1, 1.0, 1.0)];
        let clusters = aggregator(5.0).aggregate(&records, &cache(&[(0, 1, 5.0)])).unwrap();
        assert_eq!(clusters.len(), 2);
    }

    #[test]
    fn test_zero_threshold_is_identity() {
        let records = vec![site(4, 1.0, 1.0), site(2, 2.0, 2.0), site(9, 3.0, 3.0)];
        let distances = cache(&[(4, 2, 0.1), (2, 9, 0.2)]);
        let clusters = GreedyAggregator::new(ProximityThreshold::DISABLED)
            .aggregate(&records, &distances)
            .unwrap();

        assert_eq!(clusters.len(), 3);
        let order: Vec<_> = clusters.iter().map(|c| c.members[0]).collect();
        assert_eq!(order, vec![R(4), R(2), R(9)]);
    }

    #[test]
    fn test_empty_group_yields_no_clusters() {
        let clusters = aggregator(10.0).aggregate(&[], &cache(&[(0, 1, 1.0)])).unwrap();
        assert!(clusters.is_empty());
    }

    #[test]
    fn test_closest_pair_seeds_first() {
        // Pair (2, 3) is closest, so record 2 opens the first cluster.
        let records: Vec<_> = (0..4).map(|i| site(i, 1.0, 1.0)).collect();
        let distances = cache(&[(0, 1, 4.0), (2, 3, 1.0)]);
        let clusters = aggregator(5.0).aggregate(&records, &distances).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![R(2), R(3)]);
        assert_eq!(clusters[1].members, vec![R(0), R(1)]);
    }

    #[test]
    fn test_members_join_in_seed_list_order_not_nearest_first() {
        // Seed list: 0, 1, 2, 3. Record 0 reaches 3 (2 km) and 2 (4 km);
        // 2 precedes 3 in the seed list, so it is added first.
        let records: Vec<_> = (0..4).map(|i| site(i, 1.0, 1.0)).collect();
        let distances = cache(&[(0, 1, 0.5), (1, 2, 0.6), (0, 3, 2.0), (0, 2, 4.0), (1, 3, 9.0)]);
        let clusters = aggregator(5.0).aggregate(&records, &distances).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![R(0), R(1), R(2), R(3)]);
    }

    #[test]
    fn test_no_transitive_chaining() {
        // 0-1 and 1-2 are close, 0-2 is not: the seed only collects its own neighbours.
        let records: Vec<_> = (0..3).map(|i| site(i, 1.0, 1.0)).collect();
        let distances = cache(&[(0, 1, 1.0), (1, 2, 1.5), (0, 2, 30.0)]);
        let clusters = aggregator(2.0).aggregate(&records, &distances).unwrap();

        assert_eq!(clusters.len(), 2);
        assert_eq!(clusters[0].members, vec![R(0), R(1)]);
        assert_eq!(clusters[1].members, vec![R(2)]);
    }

    #[test]
    fn test_pairs_outside_the_group_only_affect_seed_order() {
        // Record 7 is not in the group; its pair still ranks record 1 as a seed.
        let records = vec![site(0, 1.0, 1.0), site(1, 1.0, 1.0)];
        let distances = cache(&[(1, 7, 0.1), (0, 1, 3.0)]);
        let clusters = aggregator(5.0).aggregate(&records, &distances).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].members, vec![R(1), R(0)]);
    }

    #[test]
    fn test_representative_defaults_to_seed() {
        let mut heavy = site(1, 500.0, 1.0);
        heavy.commodity = "Q1".to_string();
        let records = vec![site(0, 1.0, 1.0), heavy];
        let clusters = aggregator(5.0).aggregate(&records, &cache(&[(0, 1, 1.0)])).unwrap();

        assert_eq!(clusters[0].commodity, "Q578");
        assert_eq!(clusters[0].lat.unwrap().value(), 0.0);
    }

    #[test]
    fn test_largest_tonnage_representative() {
        let mut heavy = site(1, 500.0, 1.0);
        heavy.commodity = "Q1".to_string();
        let records = vec![site(0, 1.0, 1.0), heavy];
        let clusters = aggregator(5.0)
            .with_policy(RepresentativePolicy::LargestTonnage)
            .aggregate(&records, &cache(&[(0, 1, 1.0)]))
            .unwrap();

        assert_eq!(clusters[0].commodity, "Q1");
        assert_eq!(clusters[0].lat.unwrap().value(), 1.0);
        // Membership order is unaffected by the policy.
        assert_eq!(clusters[0].members, vec![R(0), R(1)]);
    }

    #[test]
    fn test_centroid_representative() {
        let mut no_coords = site(2, 1.0, 1.0);
        no_coords.lat = None;
        let records = vec![site(0, 1.0, 1.0), site(4, 1.0, 1.0), no_coords];
        let distances = cache(&[(0, 4, 1.0), (0, 2, 1.5)]);
        let clusters = aggregator(5.0)
            .with_policy(RepresentativePolicy::Centroid)
            .aggregate(&records, &distances)
            .unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].lat.unwrap().value(), 2.0);
        assert_eq!(clusters[0].lon.unwrap().value(), -2.0);
    }

    #[test]
    fn test_zero_tonnage_cluster_uses_unweighted_mean() {
        let records = vec![site(0, 0.0, 2.0), site(1, 0.0, 4.0)];
        let clusters = aggregator(5.0).aggregate(&records, &cache(&[(0, 1, 1.0)])).unwrap();

        assert_eq!(clusters.len(), 1);
        assert_eq!(clusters[0].total_grade, Some(3.0));
        assert_eq!(clusters[0].total_tonnage, Some(0.0));
        assert!(clusters[0].grade_fallback);
    }

    #[test]
    fn test_aggregation_is_deterministic() {
        let records: Vec<_> = (0..6).map(|i| site(i, i as f64 + 1.0, 1.0)).collect();
        let distances = cache(&[
            (0, 1, 2.0),
            (2, 3, 2.0),
            (4, 5, 2.0),
            (1, 2, 2.0),
            (3, 4, 2.0),
        ]);
        let first = aggregator(3.0).aggregate(&records, &distances).unwrap();
        for _ in 0..10 {
            assert_eq!(aggregator(3.0).aggregate(&records, &distances).unwrap(), first);
        }
    }

    fn arb_case() -> impl Strategy<Value = (usize, Vec<(usize, usize, f64)>, f64)> {
        (1usize..12).prop_flat_map(|n| {
            let pairs = prop::collection::vec((0..n + 3, 0..n + 3, 0.0f64..50.0), 0..40);
            (Just(n), pairs, 0.0f64..30.0)
        })
    }

    proptest! {
        #[test]
        fn prop_clusters_partition_the_group((n, pairs, km) in arb_case()) {
            let records: Vec<_> = (0..n).map(|i| site(i, (i % 5) as f64 + 0.5, 1.0)).collect();
            let mut distances = DistanceCache::new();
            for (i, j, d) in pairs {
                if i != j {
                    distances.insert(R(i), R(j), Kilometers::new(d)).unwrap();
                }
            }

            let clusters = aggregator(km).aggregate(&records, &distances).unwrap();

            let mut seen = BTreeSet::new();
            let mut total = 0usize;
            for cluster in &clusters {
                total += cluster.members.len();
                seen.extend(cluster.members.iter().copied());
            }
            let expected: BTreeSet<_> = (0..n).map(R).collect();
            prop_assert_eq!(total, n);
            prop_assert_eq!(seen, expected);
        }

        #[test]
        fn prop_cluster_tonnage_is_member_sum((n, pairs, km) in arb_case()) {
            let records: Vec<_> = (0..n).map(|i| site(i, (i % 5) as f64 + 0.5, 1.0)).collect();
            let mut distances = DistanceCache::new();
            for (i, j, d) in pairs {
                if i != j {
                    distances.insert(R(i), R(j), Kilometers::new(d)).unwrap();
                }
            }

            for cluster in aggregator(km).aggregate(&records, &distances).unwrap() {
                let sum: f64 = cluster
                    .members
                    .iter()
                    .map(|m| records[m.0].total_tonnage.unwrap())
                    .sum();
                prop_assert_eq!(cluster.total_tonnage, Some(sum));
                if cluster.members.len() > 1 {
                    prop_assert!(cluster.ms_name.starts_with("::"));
                    prop_assert_eq!(
                        cluster.ms_name[2..].matches("::").count(),
                        cluster.members.len() - 1
                    );
                }
            }
        }
    }
}
