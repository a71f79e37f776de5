// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;
use crate::catalog::{Catalog, TestId};
use yare::parameterized;

#[parameterized(
    zero = { 0, 1 },
    one = { 1, 1 },
    five = { 5, 120 },
    ten = { 10, 3_628_800 },
    twenty = { 20, 2_432_902_008_176_640_000 },
)]
fn factorial_values(n: u32, expected: u64) {
    assert_eq!(factorial(n), expected);
}

#[test]
fn factorial_saturates() {
    assert_eq!(factorial(21), u64::MAX);
}

#[test]
fn nth_permutation_enumerates_lexicographically() {
    let items = ['a', 'b', 'c'];
    let all: Vec<String> = (0..6)
        .map(|rank| nth_permutation(&items, rank).into_iter().collect())
        .collect();
    assert_eq!(all, ["abc", "acb", "bac", "bca", "cab", "cba"]);
}

#[test]
fn nth_permutation_wraps_rank() {
    let items = [1, 2, 3];
    assert_eq!(nth_permutation(&items, 7), nth_permutation(&items, 1));
}

#[test]
fn nth_permutation_of_empty_is_empty() {
    let items: [u8; 0] = [];
    assert!(nth_permutation(&items, 3).is_empty());
}

#[test]
fn team_order_is_deterministic() {
    let catalog = Catalog::standard().unwrap();
    let first = generate_test_order(TeamId::new(7), catalog.canonical_order());
    let second = generate_test_order(TeamId::new(7), catalog.canonical_order());
    assert_eq!(first, second);
}

#[test]
fn neighbouring_teams_share_anchors() {
    let catalog = Catalog::standard().unwrap();
    let canonical = catalog.canonical_order();
    let seven = generate_test_order(TeamId::new(7), canonical);
    let eight = generate_test_order(TeamId::new(8), canonical);

    assert_eq!(seven[0], TestId::PracArea);
    assert_eq!(eight[0], TestId::PracArea);
    assert_eq!(seven[6], TestId::PicCon);
    assert_eq!(eight[6], TestId::PicCon);
    assert_ne!(seven, eight);
}

#[test]
fn team_rank_wraps_at_interior_factorial() {
    let catalog = Catalog::standard().unwrap();
    let canonical = catalog.canonical_order();
    assert_eq!(
        generate_test_order(TeamId::new(3), canonical),
        generate_test_order(TeamId::new(123), canonical)
    );
    assert_eq!(generate_test_order(TeamId::new(120), canonical), canonical);
}

#[test]
fn short_orders_are_returned_unchanged() {
    assert_eq!(generate_test_order(TeamId::new(5), &[1]), vec![1]);
    assert_eq!(generate_test_order(TeamId::new(5), &[1, 2]), vec![1, 2]);
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn interior_is_a_permutation(team in 1u64..1_000_000) {
            let catalog = Catalog::standard().unwrap();
            let canonical = catalog.canonical_order();
            let order = generate_test_order(TeamId::new(team), canonical);

            prop_assert_eq!(order.len(), canonical.len());
            prop_assert_eq!(order[0], canonical[0]);
            prop_assert_eq!(order[order.len() - 1], canonical[canonical.len() - 1]);

            let mut interior = order[1..order.len() - 1].to_vec();
            let mut expected = canonical[1..canonical.len() - 1].to_vec();
            interior.sort();
            expected.sort();
            prop_assert_eq!(interior, expected);
        }

        #[test]
        fn distinct_ranks_give_distinct_permutations(a in 0u64..120, b in 0u64..120) {
            let items = [0u8, 1, 2, 3, 4];
            prop_assert_eq!(a == b, nth_permutation(&items, a) == nth_permutation(&items, b));
        }
    }
}
