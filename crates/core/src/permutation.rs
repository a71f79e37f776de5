// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Deterministic test ordering from a team identifier
//!
//! Ranks are mapped to orderings through the factorial number system
//! (Lehmer code), enumerating permutations of input positions in
//! lexicographic order.

use crate::record::TeamId;

/// `n!`, saturating at `u64::MAX` for `n > 20`
pub fn factorial(n: u32) -> u64 {
    (2..=u64::from(n)).fold(1u64, |acc, k| acc.saturating_mul(k))
}

/// The `rank`-th lexicographic permutation of `items`
///
/// Ranks outside `[0, n!)` wrap modulo `n!`.
pub fn nth_permutation<T: Clone>(items: &[T], rank: u64) -> Vec<T> {
    let n = items.len();
    let mut rank = rank % factorial(n as u32).max(1);
    let mut remaining: Vec<T> = items.to_vec();
    let mut result = Vec::with_capacity(n);

    for i in (0..n).rev() {
        let block = factorial(i as u32);
        let index = (rank / block) as usize;
        rank %= block;
        result.push(remaining.remove(index));
    }

    result
}

/// Per-team order: anchors stay put, the interior is permuted by
/// `team mod interior_count!`
pub fn generate_test_order<T: Clone>(team: TeamId, canonical: &[T]) -> Vec<T> {
    if canonical.len() < 2 {
        return canonical.to_vec();
    }
    let last = canonical.len() - 1;
    let interior = &canonical[1..last];
    let rank = team.get() % factorial(interior.len() as u32);

    let mut order = Vec::with_capacity(canonical.len());
    order.push(canonical[0].clone());
    order.extend(nth_permutation(interior, rank));
    order.push(canonical[last].clone());
    order
}

#[cfg(test)]
#[path = "permutation_tests.rs"]
mod tests;
