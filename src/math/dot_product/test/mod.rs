//! Tests for the reducers and the partition planner.

#[cfg(test)]
mod tests {
    use crate::config::{ReapPolicy, Tolerance};
    use crate::error::ReduceError;
    use crate::executor::{InlineExecutor, RayonExecutor, ThreadExecutor};
    use crate::math::dot_product::code::*;

    const EPSILON: f64 = 1e-6;

    fn assert_close(actual: f64, expected: f64, msg: &str) {
        let diff = (actual - expected).abs();
        assert!(
            diff < EPSILON,
            "{}: expected {}, got {}, diff = {}",
            msg,
            expected,
            actual,
            diff
        );
    }

    fn ranges(plan: &PartitionPlan) -> Vec<std::ops::Range<usize>> {
        plan.iter().map(|p| p.range()).collect()
    }

    // ---- partition planner ----

    #[test]
    fn test_plan_even_split() {
        let plan = plan(1000, 4).unwrap();
        assert_eq!(ranges(&plan), vec![0..250, 250..500, 500..750, 750..1000]);
        assert!(plan.is_exact_cover());
    }

    #[test]
    fn test_plan_last_partition_takes_remainder() {
        let plan = plan(7, 3).unwrap();
        assert_eq!(ranges(&plan), vec![0..2, 2..4, 4..7]);
        assert_eq!(plan.max_len(), 3);
    }

    #[test]
    fn test_plan_more_workers_than_elements() {
        let plan = plan(3, 5).unwrap();
        assert_eq!(plan.len(), 5);
        assert_eq!(ranges(&plan), vec![0..0, 0..0, 0..0, 0..0, 0..3]);
        assert!(plan.partitions()[0].is_empty());
        assert!(plan.is_exact_cover());
    }

    #[test]
    fn test_plan_single_worker() {
        let plan = plan(9, 1).unwrap();
        assert_eq!(ranges(&plan), vec![0..9]);
    }

    #[test]
    fn test_plan_rejects_zero() {
        assert!(matches!(plan(10, 0), Err(ReduceError::InvalidWorkerCount)));
        assert!(matches!(plan(0, 2), Err(ReduceError::EmptyInput)));
    }

    // ---- sequential ----

    #[test]
    fn test_sequential_basic() {
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        // 1*5 + 2*6 + 3*7 + 4*8 = 5 + 12 + 21 + 32 = 70
        assert_close(reduce_sequential(&a, &b, 4).unwrap(), 70.0, "sequential basic");
    }

    #[test]
    fn test_sequential_single() {
        assert_close(reduce_sequential(&[3.0], &[4.0], 1).unwrap(), 12.0, "sequential single");
    }

    #[test]
    fn test_sequential_uses_only_prefix() {
        let a = [1.0, 1.0, 100.0];
        let b = [2.0, 2.0, 100.0];
        assert_close(reduce_sequential(&a, &b, 2).unwrap(), 4.0, "sequential prefix");
    }

    #[test]
    fn test_sequential_bounds_error() {
        let err = reduce_sequential(&[1.0, 2.0], &[1.0, 2.0], 3).unwrap_err();
        assert!(matches!(
            err,
            ReduceError::Bounds {
                vector: "a",
                required: 3,
                actual: 2
            }
        ));
    }

    // ---- parallel ----

    #[test]
    fn test_small_example_every_worker_count() {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        assert_eq!(reduce_sequential(&a, &b, 3).unwrap(), 32.0);
        for k in 1..=3 {
            assert_eq!(reduce_parallel(&a, &b, 3, k).unwrap(), 32.0, "k = {}", k);
        }
    }

    #[test]
    fn test_single_worker_is_bit_identical() {
        let store = VectorStore::random(4097, 11).unwrap();
        let (a, b, n) = (store.a(), store.b(), store.len());
        let seq = reduce_sequential(a, b, n).unwrap();
        let par = reduce_parallel(a, b, n, 1).unwrap();
        assert_eq!(seq.to_bits(), par.to_bits());
    }

    #[test]
    fn test_partials_sum_to_sequential() {
        let store = VectorStore::random(1000, 5).unwrap();
        let (a, b) = (store.a(), store.b());
        let outcome = ParallelReducer::new(ThreadExecutor::default())
            .reduce_detailed(a, b, 1000, 4)
            .unwrap();

        assert_eq!(outcome.plan.len(), 4);
        assert_eq!(outcome.contributions, 4);
        assert!(outcome.is_complete());
        for (partition, partial) in outcome.plan.iter().zip(&outcome.partials) {
            let expected = reduce_sequential(&a[partition.range()], &b[partition.range()], 250).unwrap();
            assert_eq!(*partial, Some(expected), "worker {}", partition.worker);
        }
        let sum: f64 = outcome.partials.iter().flatten().sum();
        assert_close(sum, reduce_sequential(a, b, 1000).unwrap(), "partials");
        assert_close(outcome.value, sum, "accumulated");
    }

    #[test]
    fn test_more_workers_than_elements() {
        let a = [1.5, -2.0, 3.25];
        let b = [2.0, 0.5, 4.0];
        let at_n = reduce_parallel(&a, &b, 3, 3).unwrap();
        let beyond = reduce_parallel(&a, &b, 3, 8).unwrap();
        assert_close(beyond, at_n, "k > n");

        let outcome = ParallelReducer::new(InlineExecutor)
            .reduce_detailed(&a, &b, 3, 8)
            .unwrap();
        // Empty partitions still report, with a zero partial sum.
        assert_eq!(outcome.contributions, 8);
        assert_eq!(outcome.partials[0], Some(0.0));
    }

    #[test]
    fn test_inline_backend_matches_left_to_right_partials() {
        let store = VectorStore::random(999, 3).unwrap();
        let (a, b, n) = (store.a(), store.b(), store.len());
        let plan = plan(n, 7).unwrap();
        let expected = plan
            .iter()
            .map(|p| WorkerTask::new(*p, a, b).partial_sum())
            .fold(0.0, |acc, x| acc + x);
        let got = ParallelReducer::new(InlineExecutor).reduce(a, b, n, 7).unwrap();
        assert_eq!(got.to_bits(), expected.to_bits());
    }

    #[test]
    fn test_all_backends_agree_with_sequential() {
        let store = VectorStore::random(100_003, 21).unwrap();
        let (a, b, n) = (store.a(), store.b(), store.len());
        let seq = reduce_sequential(a, b, n).unwrap();
        let tol = Tolerance::scaled(n);

        for k in [1, 2, 3, 8, 16] {
            let threads = ParallelReducer::new(ThreadExecutor::default()).reduce(a, b, n, k).unwrap();
            let rayon = ParallelReducer::new(RayonExecutor::new(k).unwrap())
                .reduce(a, b, n, k)
                .unwrap();
            let inline = ParallelReducer::new(InlineExecutor).reduce(a, b, n, k).unwrap();
            for (name, value) in [("threads", threads), ("rayon", rayon), ("inline", inline)] {
                assert!(tol.accepts(seq, value), "{} k={}: {} vs {}", name, k, value, seq);
            }
        }
    }

    #[test]
    fn test_repeated_calls_agree() {
        let store = VectorStore::random(50_000, 8).unwrap();
        let (a, b, n) = (store.a(), store.b(), store.len());
        let first = reduce_parallel(a, b, n, 6).unwrap();
        let second = reduce_parallel(a, b, n, 6).unwrap();
        assert!(Tolerance::scaled(n).accepts(first, second));
    }

    #[test]
    fn test_parallel_input_errors() {
        let a = [1.0, 2.0];
        assert!(matches!(
            reduce_parallel(&a, &a, 2, 0),
            Err(ReduceError::InvalidWorkerCount)
        ));
        assert!(matches!(reduce_parallel(&a, &a, 0, 2), Err(ReduceError::EmptyInput)));
        assert!(matches!(
            reduce_parallel(&a, &[1.0], 2, 2),
            Err(ReduceError::Bounds { vector: "b", .. })
        ));
    }

    #[test]
    fn test_unreservable_worker_storage_is_allocation_error() {
        assert!(matches!(
            plan(1, usize::MAX),
            Err(ReduceError::Allocation { requested: usize::MAX, .. })
        ));

        let a = [1.0];
        let err = reduce_parallel(&a, &a, 1, usize::MAX / 2).unwrap_err();
        assert!(matches!(err, ReduceError::Allocation { .. }), "{:?}", err);
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_default_reap_policy_is_fatal() {
        let reducer = ParallelReducer::new(InlineExecutor);
        assert_eq!(reducer.reap_policy(), ReapPolicy::Fatal);
        assert_eq!(
            reducer.with_reap_policy(ReapPolicy::BestEffort).reap_policy(),
            ReapPolicy::BestEffort
        );
    }

    // ---- accumulator ----

    #[test]
    fn test_accumulator_counts_contributions() {
        let acc = Accumulator::new();
        std::thread::scope(|s| {
            for i in 0..8 {
                let acc = &acc;
                s.spawn(move || acc.add(i as f64));
            }
        });
        assert_eq!(acc.contributions(), 8);
        let total = acc.into_accumulated();
        assert_eq!(total.sum, 28.0);
        assert_eq!(total.contributions, 8);
    }

    // ---- vector store ----

    #[test]
    fn test_store_random_is_seeded_and_in_range() {
        let first = VectorStore::random(64, 123).unwrap();
        let second = VectorStore::random(64, 123).unwrap();
        assert_eq!(first, second);
        assert_ne!(first, VectorStore::random(64, 124).unwrap());
        for v in first.a().iter().chain(first.b()) {
            assert!(VectorStore::VALUE_RANGE.contains(v), "{} out of range", v);
        }
    }

    #[test]
    fn test_store_rejects_bad_input() {
        assert!(matches!(
            VectorStore::new(vec![1.0], vec![1.0, 2.0]),
            Err(ReduceError::LengthMismatch { a: 1, b: 2 })
        ));
        assert!(matches!(VectorStore::new(vec![], vec![]), Err(ReduceError::EmptyInput)));
        assert!(matches!(VectorStore::random(0, 1), Err(ReduceError::EmptyInput)));
    }

    #[test]
    fn test_store_preview() {
        let store = VectorStore::new(vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]).unwrap();
        assert_eq!(
            store.preview().unwrap(),
            "Vector A: [1.00, 2.00, 3.00]\nVector B: [4.00, 5.00, 6.00]\n"
        );
        assert!(VectorStore::random(PREVIEW_MAX_LEN + 1, 1).unwrap().preview().is_none());
    }
}

#[cfg(test)]
mod properties {
    use crate::config::Tolerance;
    use crate::math::dot_product::code::*;
    use proptest::prelude::*;

    fn arb_vectors(max_len: usize) -> impl Strategy<Value = (Vec<f64>, Vec<f64>)> {
        (1..=max_len).prop_flat_map(|n| {
            (
                prop::collection::vec(-10.0f64..10.0, n),
                prop::collection::vec(-10.0f64..10.0, n),
            )
        })
    }

    proptest! {
        /// Partitions are disjoint, ordered and cover [0, n) exactly.
        #[test]
        fn plan_is_exact_cover(n in 1usize..5_000, k in 1usize..64) {
            let plan = plan(n, k).unwrap();
            prop_assert_eq!(plan.len(), k);
            prop_assert!(plan.is_exact_cover());
            prop_assert_eq!(plan.iter().map(|p| p.len()).sum::<usize>(), n);
            for p in plan.iter().take(k - 1) {
                prop_assert_eq!(p.len(), n / k);
            }
            prop_assert_eq!(plan.partitions()[k - 1].len(), n / k + n % k);
        }

        /// Any worker count in [1, n] agrees with the sequential result.
        #[test]
        fn parallel_matches_sequential((a, b) in arb_vectors(300), k_seed in 0usize..1_000) {
            let n = a.len();
            let k = k_seed % n + 1;
            let seq = reduce_sequential(&a, &b, n).unwrap();
            let par = reduce_parallel(&a, &b, n, k).unwrap();
            prop_assert!(
                Tolerance::scaled(n).accepts(seq, par),
                "n={} k={} seq={} par={}", n, k, seq, par
            );
        }

        /// Beyond n workers the result does not change.
        #[test]
        fn extra_workers_do_not_change_result((a, b) in arb_vectors(40), extra in 1usize..20) {
            let n = a.len();
            let at_n = reduce_parallel(&a, &b, n, n).unwrap();
            let beyond = reduce_parallel(&a, &b, n, n + extra).unwrap();
            prop_assert!(Tolerance::scaled(n).accepts(at_n, beyond));
        }
    }
}
