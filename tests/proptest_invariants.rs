
use proptest::prelude::*;
use siftflow::{ConditionBuilder, Evaluator, MemoryQuery};
use strategies::{arb_accounts, arb_leaf, arb_sort, arb_steps, ids, replay, Account};

fn block_on<F: std::future::Future>(f: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(f)
}

// ---------------------------------------------------------------------------
// Invariant 1: Composition semantics
//
// `add(P); and(); add(Q)` behaves as `P && Q`, `add(P); or(); add(Q)` as
// `P || Q`, and the negated build is the complement of the build.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn and_is_conjunction(p in arb_leaf(), q in arb_leaf(), rows in arb_accounts()) {
        let built = ConditionBuilder::new()
            .add(p.clone()).unwrap()
            .and()
            .add(q.clone()).unwrap()
            .build();
        for row in &rows {
            prop_assert_eq!(built.evaluate(row), p.evaluate(row) && q.evaluate(row));
        }
    }

    #[test]
    fn or_is_disjunction(p in arb_leaf(), q in arb_leaf(), rows in arb_accounts()) {
        let built = ConditionBuilder::new()
            .add(p.clone()).unwrap()
            .or()
            .add(q.clone()).unwrap()
            .build();
        for row in &rows {
            prop_assert_eq!(built.evaluate(row), p.evaluate(row) || q.evaluate(row));
        }
    }

    #[test]
    fn negated_build_is_complement(steps in arb_steps(), rows in arb_accounts()) {
        let builder = replay(&steps);
        let built = builder.build();
        let negated = builder.build_negated();
        for row in &rows {
            prop_assert_eq!(negated.evaluate(row), !built.evaluate(row));
        }
    }

    #[test]
    fn build_is_deterministic(steps in arb_steps(), rows in arb_accounts()) {
        let builder = replay(&steps);
        let first = builder.build();
        let again = builder.build();
        prop_assert_eq!(first.to_string(), again.to_string());
        for row in &rows {
            prop_assert_eq!(first.evaluate(row), again.evaluate(row));
        }
    }

    #[test]
    fn duplicate_conjunct_changes_nothing(p in arb_leaf(), rows in arb_accounts()) {
        let once = ConditionBuilder::new().add(p.clone()).unwrap();
        let twice = once.clone().add(p.clone()).unwrap();
        prop_assert_eq!(twice.conjunct_count(), 1);
        for row in &rows {
            prop_assert_eq!(once.build().evaluate(row), twice.build().evaluate(row));
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Partitioning
//
// Matches and failures split the source; unique and duplicate groups split
// the matches.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn filter_and_failed_partition_source(steps in arb_steps(), rows in arb_accounts()) {
        let evaluator = Evaluator::from_builder(&replay(&steps));
        let passed = evaluator.filter_all(&rows).count();
        let failed = evaluator.failed_all(&rows).count();
        prop_assert_eq!(passed + failed, rows.len());
        prop_assert_eq!(passed, evaluator.count(&rows));
        prop_assert_eq!(evaluator.any(&rows), passed > 0);
    }

    #[test]
    fn uniques_and_duplicates_partition_matches(steps in arb_steps(), rows in arb_accounts()) {
        let evaluator = Evaluator::from_builder(&replay(&steps));
        let uniques = evaluator.uniques_by_group(&rows, |a| a.region);
        let dups = evaluator.duplicates_by_group(&rows, |a| a.region);
        let dup_members: usize = dups.values().map(Vec::len).sum();
        prop_assert_eq!(uniques.len() + dup_members, evaluator.count(&rows));
        for key in uniques.keys() {
            prop_assert!(!dups.contains_key(key));
        }
    }

    #[test]
    fn duplicates_empty_for_unique_keys(rows in arb_accounts()) {
        let evaluator = Evaluator::<Account>::all();
        prop_assert!(evaluator.duplicates(&rows, |a| a.id).is_empty());
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Ordering and paging
//
// Consecutive pages tile the ordered matches, `distinct` is idempotent, and
// a block page agrees with the plain page when pages tile blocks exactly.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn consecutive_pages_tile_matches(
        steps in arb_steps(),
        sort in arb_sort(),
        rows in arb_accounts(),
        size in 1_usize..8,
    ) {
        let evaluator = Evaluator::from_builder(&replay(&steps)).sort(sort);
        let mut joined = ids(evaluator.page(&rows, 1, size).unwrap());
        joined.extend(ids(evaluator.page(&rows, 2, size).unwrap()));
        let expected: Vec<u32> = ids(evaluator.filter_all(&rows).take(2 * size));
        prop_assert_eq!(joined, expected);
    }

    #[test]
    fn sorted_results_respect_order(sort in arb_sort(), rows in arb_accounts()) {
        let evaluator = Evaluator::<Account>::all().sort(sort.clone());
        let sorted: Vec<&Account> = evaluator.filter_all(&rows).collect();
        for pair in sorted.windows(2) {
            prop_assert_ne!(sort.compare(pair[0], pair[1]), std::cmp::Ordering::Greater);
        }
    }

    #[test]
    fn distinct_is_idempotent(steps in arb_steps(), rows in arb_accounts()) {
        let evaluator = Evaluator::from_builder(&replay(&steps));
        let once: Vec<Account> = evaluator
            .distinct(&rows, |a| a.region)
            .into_iter()
            .cloned()
            .collect();
        let twice = Evaluator::<Account>::all().distinct(&once, |a| a.region);
        prop_assert_eq!(ids(twice), ids(&once));
    }

    #[test]
    fn block_page_matches_page_when_aligned(
        sort in arb_sort(),
        rows in arb_accounts(),
        page_size in 1_usize..5,
        pages_per_block in 1_usize..4,
        page in 1_usize..10,
    ) {
        let evaluator = Evaluator::<Account>::all().sort(sort);
        let block_size = page_size * pages_per_block;
        let block = evaluator.block_page(&rows, block_size, page, page_size).unwrap();
        let plain = evaluator.page(&rows, page, page_size).unwrap();
        prop_assert_eq!(ids(block.items), ids(plain));
    }

    #[test]
    fn match_index_agrees_with_any(steps in arb_steps(), sort in arb_sort(), rows in arb_accounts()) {
        let evaluator = Evaluator::from_builder(&replay(&steps)).sort(sort);
        let first = evaluator.first_match_index(&rows);
        let last = evaluator.last_match_index(&rows);
        prop_assert_eq!(first.is_some(), evaluator.any(&rows));
        prop_assert!(first <= last);
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Local and deferred parity
//
// The same evaluator returns the same results over a slice and over a
// `MemoryQuery` holding the same rows.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn memory_query_matches_slice(
        steps in arb_steps(),
        sort in arb_sort(),
        rows in arb_accounts(),
        size in 1_usize..6,
    ) {
        let evaluator = Evaluator::from_builder(&replay(&steps)).sort(sort);
        let deferred = evaluator.on(MemoryQuery::new(rows.clone()));

        let (all, count, page, first_idx, last, sums) = block_on(async {
            (
                deferred.all().await.unwrap(),
                deferred.count().await.unwrap(),
                deferred.page(2, size).await.unwrap(),
                deferred.first_match_index().await.unwrap(),
                deferred.last().await.unwrap(),
                deferred.sum_by_group(|a| a.region, |a| a.balance).await.unwrap(),
            )
        });

        prop_assert_eq!(ids(&all), ids(evaluator.filter_all(&rows)));
        prop_assert_eq!(count, evaluator.count(&rows));
        prop_assert_eq!(ids(&page), ids(evaluator.page(&rows, 2, size).unwrap()));
        prop_assert_eq!(first_idx, evaluator.first_match_index(&rows));
        prop_assert_eq!(last.map(|a| a.id), evaluator.last(&rows).map(|a| a.id));
        prop_assert_eq!(sums, evaluator.sum_by_group(&rows, |a| a.region, |a| a.balance).unwrap());
    }
}
