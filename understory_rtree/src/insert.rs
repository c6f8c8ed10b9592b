// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Least-enlargement descent with bottom-up splits.

use alloc::boxed::Box;
use core::mem;

use crate::config::RTreeConfig;
use crate::node::{Branch, Node};
use crate::split::quadratic_split;
use crate::types::{Rect, Scalar};

/// Index of the branch needing the least cost increase to absorb `rect`.
///
/// Ties go to the branch with the smaller current cost.
pub(crate) fn choose_branch<T: Scalar, V, const D: usize>(
    node: &Node<T, V, D>,
    rect: &Rect<T, D>,
) -> usize {
    debug_assert!(!node.branches.is_empty(), "cannot descend into an empty node");
    let mut best = 0;
    let mut best_growth = f64::INFINITY;
    let mut best_cost = f64::INFINITY;
    for (i, b) in node.branches.iter().enumerate() {
        let cost = b.rect.cost();
        let growth = b.rect.union(rect).cost() - cost;
        if growth < best_growth || (growth == best_growth && cost < best_cost) {
            best = i;
            best_growth = growth;
            best_cost = cost;
        }
    }
    best
}

/// Number of nodes an insertion of `rect` at `level` will create, including a new root.
///
/// Mirrors the descent of [`insert_branch`] without touching the tree.
pub(crate) fn nodes_needed<T: Scalar, V, const D: usize>(
    root: &Node<T, V, D>,
    rect: &Rect<T, D>,
    level: usize,
    config: RTreeConfig,
) -> usize {
    let (created, root_splits) = plan(root, rect, level, config);
    created + usize::from(root_splits)
}

fn plan<T: Scalar, V, const D: usize>(
    node: &Node<T, V, D>,
    rect: &Rect<T, D>,
    level: usize,
    config: RTreeConfig,
) -> (usize, bool) {
    let full = node.branches.len() >= config.max_children();
    if node.level == level {
        return (usize::from(full), full);
    }
    let idx = choose_branch(node, rect);
    let (created, child_splits) = plan(node.branches[idx].child_ref(), rect, level, config);
    if child_splits && full {
        (created + 1, true)
    } else {
        (created, false)
    }
}

/// Insert `branch` into the subtree at `node`, placing it in a node at `level`.
///
/// Returns the new sibling when `node` itself had to split. The caller must
/// already hold allocations for every node this creates (see [`nodes_needed`]).
pub(crate) fn insert_branch<T: Scalar, V, const D: usize>(
    node: &mut Node<T, V, D>,
    branch: Branch<T, V, D>,
    level: usize,
    config: RTreeConfig,
) -> Option<Box<Node<T, V, D>>> {
    debug_assert!(node.level >= level, "insertion level is above this node");
    if node.level == level {
        return add_branch(node, branch, config);
    }
    let rect = branch.rect;
    let idx = choose_branch(node, &rect);
    let slot = &mut node.branches[idx];
    let child = slot.child_mut();
    match insert_branch(child, branch, level, config) {
        None => {
            slot.rect = slot.rect.union(&rect);
            None
        }
        Some(sibling) => {
            slot.rect = slot.child_ref().cover();
            add_branch(node, Branch::child(sibling), config)
        }
    }
}

/// Install `branch` in `node`, splitting when the node is already full.
pub(crate) fn add_branch<T: Scalar, V, const D: usize>(
    node: &mut Node<T, V, D>,
    branch: Branch<T, V, D>,
    config: RTreeConfig,
) -> Option<Box<Node<T, V, D>>> {
    if node.branches.len() < config.max_children() {
        node.branches.push(branch);
        return None;
    }
    let mut all = mem::take(&mut node.branches);
    all.push(branch);
    let (kept, moved) = quadratic_split(all, config.min_children());
    node.branches = kept;
    Some(Box::new(Node {
        level: node.level,
        branches: moved,
    }))
}
