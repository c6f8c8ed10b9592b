// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Quadratic-cost node split.
//!
//! Seeds are the pair of branches whose union wastes the most cost. The
//! remaining branches are then classified one at a time, always taking the
//! branch with the strongest preference for one group, until one group must
//! take everything left to reach the minimum fill.

use alloc::vec::Vec;

use crate::node::Branch;
use crate::types::{Rect, Scalar};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Group {
    First,
    Second,
}

struct Side<T, V, const D: usize> {
    cover: Rect<T, D>,
    cost: f64,
    members: Vec<Branch<T, V, D>>,
}

impl<T: Scalar, V, const D: usize> Side<T, V, D> {
    fn seeded(seed: Branch<T, V, D>, capacity: usize) -> Self {
        let mut members = Vec::with_capacity(capacity);
        let cover = seed.rect;
        members.push(seed);
        Self {
            cover,
            cost: cover.cost(),
            members,
        }
    }

    fn growth(&self, rect: &Rect<T, D>) -> f64 {
        self.cover.union(rect).cost() - self.cost
    }

    fn take(&mut self, branch: Branch<T, V, D>) {
        self.cover = self.cover.union(&branch.rect);
        self.cost = self.cover.cost();
        self.members.push(branch);
    }
}

/// Partition an overflowing branch set into two groups of at least `min_children` each.
///
/// Every input branch ends up in exactly one of the returned groups.
pub(crate) fn quadratic_split<T: Scalar, V, const D: usize>(
    mut branches: Vec<Branch<T, V, D>>,
    min_children: usize,
) -> (Vec<Branch<T, V, D>>, Vec<Branch<T, V, D>>) {
    let total = branches.len();
    debug_assert!(
        total >= 2 && total >= 2 * min_children,
        "split needs enough branches to fill both groups"
    );
    let capacity = total - min_children;

    let (a, b) = pick_seeds(&branches);
    // `b > a`, so removing `b` first keeps `a` in place.
    let second_seed = branches.swap_remove(b);
    let first_seed = branches.swap_remove(a);
    let mut first = Side::seeded(first_seed, capacity);
    let mut second = Side::seeded(second_seed, capacity);

    while !branches.is_empty() {
        let remaining = branches.len();
        if first.members.len() + remaining <= min_children {
            for branch in branches.drain(..) {
                first.take(branch);
            }
            break;
        }
        if second.members.len() + remaining <= min_children {
            for branch in branches.drain(..) {
                second.take(branch);
            }
            break;
        }
        let (idx, group) = pick_next(&branches, &first, &second);
        let branch = branches.swap_remove(idx);
        match group {
            Group::First => first.take(branch),
            Group::Second => second.take(branch),
        }
    }

    log::trace!(
        "split {total} branches into {} + {}",
        first.members.len(),
        second.members.len()
    );
    (first.members, second.members)
}

/// The pair maximizing `cost(a ∪ b) - cost(a) - cost(b)`, as `(i, j)` with `i < j`.
fn pick_seeds<T: Scalar, V, const D: usize>(branches: &[Branch<T, V, D>]) -> (usize, usize) {
    let costs: Vec<f64> = branches.iter().map(|b| b.rect.cost()).collect();
    let mut best = (0, 1);
    let mut worst_waste = f64::NEG_INFINITY;
    for i in 0..branches.len() {
        for j in (i + 1)..branches.len() {
            let waste = branches[i].rect.union(&branches[j].rect).cost() - costs[i] - costs[j];
            if waste > worst_waste {
                worst_waste = waste;
                best = (i, j);
            }
        }
    }
    best
}

/// The unclassified branch with the largest growth difference, and the group it prefers.
fn pick_next<T: Scalar, V, const D: usize>(
    branches: &[Branch<T, V, D>],
    first: &Side<T, V, D>,
    second: &Side<T, V, D>,
) -> (usize, Group) {
    let mut chosen = 0;
    let mut chosen_group = Group::First;
    let mut biggest_diff = f64::NEG_INFINITY;
    for (i, branch) in branches.iter().enumerate() {
        let g1 = first.growth(&branch.rect);
        let g2 = second.growth(&branch.rect);
        let diff = (g1 - g2).abs();
        if diff > biggest_diff {
            biggest_diff = diff;
            chosen = i;
            chosen_group = select_group(first, second, g1, g2);
        }
    }
    (chosen, chosen_group)
}

/// Smaller growth wins; ties go to the smaller cover, then to the smaller group.
fn select_group<T: Scalar, V, const D: usize>(
    first: &Side<T, V, D>,
    second: &Side<T, V, D>,
    first_growth: f64,
    second_growth: f64,
) -> Group {
    if first_growth < second_growth {
        Group::First
    } else if second_growth < first_growth {
        Group::Second
    } else if first.cost < second.cost {
        Group::First
    } else if second.cost < first.cost {
        Group::Second
    } else if second.members.len() < first.members.len() {
        Group::Second
    } else {
        Group::First
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    fn branches(rects: &[([f64; 2], [f64; 2])]) -> Vec<Branch<f64, usize, 2>> {
        rects
            .iter()
            .enumerate()
            .map(|(i, (min, max))| Branch::data(Rect::new(*min, *max), i))
            .collect()
    }

    fn ids(group: &[Branch<f64, usize, 2>]) -> Vec<usize> {
        let mut out: Vec<usize> = group
            .iter()
            .map(|b| match b.entry {
                crate::node::Entry::Data(v) => v,
                crate::node::Entry::Child(_) => unreachable!(),
            })
            .collect();
        out.sort_unstable();
        out
    }

    #[test]
    fn seeds_are_the_most_wasteful_pair() {
        let set = branches(&[
            ([0.0, 0.0], [1.0, 1.0]),
            ([0.5, 0.5], [1.5, 1.5]),
            ([10.0, 10.0], [11.0, 11.0]),
        ]);
        let (a, b) = pick_seeds(&set);
        assert!(a < b);
        assert_eq!(b, 2);
        assert_eq!(a, 0);
    }

    #[test]
    fn two_clusters_separate() {
        let set = branches(&[
            ([0.0, 0.0], [1.0, 1.0]),
            ([100.0, 100.0], [101.0, 101.0]),
            ([1.0, 0.0], [2.0, 1.0]),
            ([101.0, 100.0], [102.0, 101.0]),
            ([0.0, 1.0], [1.0, 2.0]),
        ]);
        let (g1, g2) = quadratic_split(set, 2);
        let mut groups = vec![ids(&g1), ids(&g2)];
        groups.sort();
        assert_eq!(groups, vec![vec![0, 2, 4], vec![1, 3]]);
    }

    #[test]
    fn forced_flush_respects_minimum_fill() {
        // One far outlier and many clustered boxes: the outlier's group must still reach `m`.
        let mut rects = vec![([1000.0, 1000.0], [1001.0, 1001.0])];
        for i in 0..8 {
            let x = f64::from(i) * 0.1;
            rects.push(([x, 0.0], [x + 1.0, 1.0]));
        }
        let set = branches(&rects);
        let (g1, g2) = quadratic_split(set, 4);
        assert!(g1.len() >= 4 && g2.len() >= 4);
        assert_eq!(g1.len() + g2.len(), 9);
        let mut all = ids(&g1);
        all.extend(ids(&g2));
        all.sort_unstable();
        assert_eq!(all, (0..9).collect::<Vec<_>>());
    }

    #[test]
    fn identical_rectangles_split_evenly() {
        let set = branches(&[([0.0, 0.0], [1.0, 1.0]); 5]);
        let (g1, g2) = quadratic_split(set, 2);
        assert!(g1.len() >= 2 && g2.len() >= 2);
        assert_eq!(g1.len() + g2.len(), 5);
    }
}
