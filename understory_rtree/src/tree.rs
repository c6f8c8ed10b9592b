// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The [`RTree`] index object: construction, mutation, queries, and teardown.

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::fmt::Debug;
use core::mem;
use core::ops::ControlFlow;

use crate::allocator::{NodeAllocator, Unbounded};
use crate::config::RTreeConfig;
use crate::delete::remove_entry;
use crate::error::RTreeError;
use crate::insert::{insert_branch, nodes_needed};
use crate::node::{Branch, Entry, Node};
use crate::search::{Iter, Visitor, search_node};
use crate::types::{Rect, Scalar};

/// A dynamic R-tree mapping `D`-dimensional rectangles to values.
///
/// Nodes hold between `m = M / 2` and `M` branches (the root may hold fewer),
/// all leaves sit at the same depth, and every internal branch stores the tight
/// cover of its subtree. Node creation and destruction are reported to the
/// [`NodeAllocator`] `A`.
///
/// The tree never drops or clones values on its own account beyond what
/// [`RTree::remove`] and teardown require: values are opaque to it.
pub struct RTree<T: Scalar, V, const D: usize, A: NodeAllocator = Unbounded> {
    config: RTreeConfig,
    root: Box<Node<T, V, D>>,
    len: usize,
    allocator: A,
}

impl<T: Scalar, V, const D: usize> RTree<T, V, D> {
    /// Create an empty tree with the default fan-out.
    pub fn new() -> Self {
        Self::with_config(RTreeConfig::default())
    }

    /// Create an empty tree with the given fan-out.
    pub fn with_config(config: RTreeConfig) -> Self {
        // `Unbounded` grants everything, so the root allocation cannot fail.
        Self {
            config,
            root: Box::new(Node::new(0, config.max_children())),
            len: 0,
            allocator: Unbounded,
        }
    }
}

impl<T: Scalar, V, const D: usize> Default for RTree<T, V, D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Scalar, V, const D: usize, A: NodeAllocator> RTree<T, V, D, A> {
    /// Create an empty tree whose nodes are accounted through `allocator`.
    ///
    /// The empty root leaf is the first allocation.
    pub fn with_allocator(config: RTreeConfig, mut allocator: A) -> Result<Self, RTreeError> {
        allocator.allocate(Node::<T, V, D>::footprint(config.max_children()))?;
        Ok(Self {
            config,
            root: Box::new(Node::new(0, config.max_children())),
            len: 0,
            allocator,
        })
    }

    /// Fan-out configuration.
    pub fn config(&self) -> RTreeConfig {
        self.config
    }

    /// The node allocator.
    pub fn allocator(&self) -> &A {
        &self.allocator
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the tree holds no entries.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node levels from root to leaves (1 for a lone leaf root).
    pub fn height(&self) -> usize {
        self.root.level + 1
    }

    /// Tight cover of every entry, or `None` when empty.
    pub fn bounds(&self) -> Option<Rect<T, D>> {
        let cover = self.root.cover();
        (!cover.is_degenerate()).then_some(cover)
    }

    /// Insert `value` under `rect`.
    ///
    /// Every node the insertion needs is requested from the allocator before
    /// the tree is modified; if any request is refused, the granted ones are
    /// freed and the tree is left exactly as it was.
    ///
    /// # Panics
    ///
    /// Panics if `rect` is degenerate or inverted on any axis.
    pub fn insert(&mut self, rect: Rect<T, D>, value: V) -> Result<(), RTreeError> {
        assert!(
            rect.is_valid(),
            "inserted rectangles must satisfy min <= max on every axis: {rect:?}"
        );
        let needed = nodes_needed(&self.root, &rect, 0, self.config);
        self.reserve(needed)?;
        self.insert_at(Branch::data(rect, value), 0);
        self.len += 1;
        Ok(())
    }

    /// Remove the entry holding `value` whose rectangle overlaps `rect`.
    ///
    /// Returns `Ok(false)` if no such entry exists, leaving the tree untouched.
    /// Nodes left under-full are dissolved and their branches reinserted at
    /// their original level. Nodes released this way are reused for any splits
    /// the reinsertion causes before new allocations are requested. If the
    /// allocator still refuses, the entries that could not be placed are
    /// dropped from the tree, the tree stays structurally valid, and the error
    /// is returned.
    pub fn remove(&mut self, rect: &Rect<T, D>, value: &V) -> Result<bool, RTreeError>
    where
        V: PartialEq,
    {
        let mut orphans = Vec::new();
        if !remove_entry(
            &mut self.root,
            rect,
            value,
            self.config.min_children(),
            &mut orphans,
        ) {
            return Ok(false);
        }
        self.len -= 1;
        let reinserted = self.reinsert(orphans);
        self.collapse_root();
        reinserted.map(|()| true)
    }

    /// Visit every entry whose rectangle overlaps `query`.
    ///
    /// Returns the number of overlapping entries visited, including the one
    /// whose visit returned [`ControlFlow::Break`]. A degenerate query matches
    /// nothing.
    pub fn search<F>(&self, query: &Rect<T, D>, mut visitor: F) -> usize
    where
        F: Visitor<T, V, D>,
    {
        let mut hits = 0;
        if query.is_degenerate() {
            return hits;
        }
        let _ = search_node(&self.root, query, &mut visitor, &mut hits);
        hits
    }

    /// Number of entries whose rectangle overlaps `query`.
    pub fn count(&self, query: &Rect<T, D>) -> usize {
        self.search(query, |_: &Rect<T, D>, _: &V| -> ControlFlow<()> {
            ControlFlow::Continue(())
        })
    }

    /// Entries whose rectangle overlaps `query`.
    pub fn query_rect(&self, query: Rect<T, D>) -> impl Iterator<Item = (&Rect<T, D>, &V)> + '_ {
        let mut out = Vec::new();
        if !query.is_degenerate() {
            collect_overlapping(&self.root, &query, &mut out);
        }
        out.into_iter()
    }

    /// Entries whose rectangle contains the point `p`.
    pub fn query_point(&self, p: [T; D]) -> impl Iterator<Item = (&Rect<T, D>, &V)> + '_ {
        self.query_rect(Rect::point(p))
    }

    /// All entries, in tree order.
    pub fn iter(&self) -> Iter<'_, T, V, D> {
        Iter::new(&self.root, self.len)
    }

    /// Remove every entry, destroying all nodes but the root.
    pub fn clear(&mut self) {
        let size = self.node_size();
        let freed = self.root.release_descendants(&mut self.allocator, size);
        self.root.level = 0;
        self.len = 0;
        log::trace!("cleared tree, released {freed} nodes");
    }

    #[inline]
    fn node_size(&self) -> usize {
        Node::<T, V, D>::footprint(self.config.max_children())
    }

    /// Request `count` node allocations, all or nothing.
    fn reserve(&mut self, count: usize) -> Result<(), RTreeError> {
        let size = self.node_size();
        for granted in 0..count {
            if let Err(err) = self.allocator.allocate(size) {
                for _ in 0..granted {
                    self.allocator.free(size);
                }
                return Err(err);
            }
        }
        Ok(())
    }

    /// Insert a branch at `level`, growing a new root if the old one splits.
    ///
    /// Allocations for all created nodes must already be held.
    fn insert_at(&mut self, branch: Branch<T, V, D>, level: usize) {
        let Some(sibling) = insert_branch(&mut self.root, branch, level, self.config) else {
            return;
        };
        let new_root = Box::new(Node::new(self.root.level + 1, self.config.max_children()));
        let old_root = mem::replace(&mut self.root, new_root);
        self.root.branches.push(Branch::child(old_root));
        self.root.branches.push(Branch::child(sibling));
        log::trace!("root split, height is now {}", self.height());
    }

    /// Reinsert the branches of every orphaned node at the level they came from.
    fn reinsert(&mut self, mut orphans: Vec<Box<Node<T, V, D>>>) -> Result<(), RTreeError> {
        let size = self.node_size();
        // Each orphan node is destroyed once drained; its allocation is first offered to splits.
        let mut credit = orphans.len();
        log::trace!("reinserting branches of {} orphaned nodes", orphans.len());
        let mut outcome = Ok(());
        while let Some(mut orphan) = orphans.pop() {
            let level = orphan.level;
            while let Some(branch) = orphan.branches.pop() {
                if outcome.is_err() {
                    self.discard(branch, size);
                    continue;
                }
                let needed = nodes_needed(&self.root, &branch.rect, level, self.config);
                let from_credit = needed.min(credit);
                credit -= from_credit;
                match self.reserve(needed - from_credit) {
                    Ok(()) => self.insert_at(branch, level),
                    Err(err) => {
                        log::debug!("reinsertion aborted: {err}");
                        credit += from_credit;
                        outcome = Err(err);
                        self.discard(branch, size);
                    }
                }
            }
        }
        for _ in 0..credit {
            self.allocator.free(size);
        }
        outcome
    }

    /// Drop a branch that could not be reinserted, releasing any subtree it owns.
    fn discard(&mut self, branch: Branch<T, V, D>, size: usize) {
        match branch.entry {
            Entry::Data(_) => self.len -= 1,
            Entry::Child(mut child) => {
                self.len -= child.count_entries();
                child.release_descendants(&mut self.allocator, size);
                self.allocator.free(size);
            }
        }
    }

    /// Replace an internal root holding a single branch by that branch's child.
    fn collapse_root(&mut self) {
        let size = self.node_size();
        while !self.root.is_leaf() && self.root.branches.len() == 1 {
            let Some(only) = self.root.branches.pop() else {
                break;
            };
            self.root = only.into_child();
            self.allocator.free(size);
            log::trace!("root collapsed, height is now {}", self.height());
        }
    }
}

fn collect_overlapping<'a, T: Scalar, V, const D: usize>(
    node: &'a Node<T, V, D>,
    query: &Rect<T, D>,
    out: &mut Vec<(&'a Rect<T, D>, &'a V)>,
) {
    for branch in &node.branches {
        if !branch.rect.overlaps(query) {
            continue;
        }
        match &branch.entry {
            Entry::Child(child) => collect_overlapping(child, query, out),
            Entry::Data(value) => out.push((&branch.rect, value)),
        }
    }
}

impl<T: Scalar, V, const D: usize, A: NodeAllocator> Drop for RTree<T, V, D, A> {
    fn drop(&mut self) {
        let size = self.node_size();
        self.root.release_descendants(&mut self.allocator, size);
        self.allocator.free(size);
    }
}

impl<T: Scalar, V, const D: usize, A: NodeAllocator> Debug for RTree<T, V, D, A> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RTree")
            .field("max_children", &self.config.max_children())
            .field("min_children", &self.config.min_children())
            .field("height", &self.height())
            .field("len", &self.len)
            .finish_non_exhaustive()
    }
}

impl<'a, T: Scalar, V, const D: usize, A: NodeAllocator> IntoIterator for &'a RTree<T, V, D, A> {
    type Item = (&'a Rect<T, D>, &'a V);
    type IntoIter = Iter<'a, T, V, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
impl<T: Scalar, V, const D: usize, A: NodeAllocator> RTree<T, V, D, A> {
    /// Panic if any structural invariant is broken.
    pub(crate) fn assert_invariants(&self) {
        fn walk<T: Scalar, V, const D: usize>(
            node: &Node<T, V, D>,
            config: RTreeConfig,
            is_root: bool,
        ) -> usize {
            assert!(node.branches.len() <= config.max_children(), "node overflow");
            if is_root {
                assert!(
                    node.is_leaf() || node.branches.len() >= 2,
                    "internal root must have at least two branches"
                );
            } else {
                assert!(
                    node.branches.len() >= config.min_children(),
                    "node underflow: {} < {}",
                    node.branches.len(),
                    config.min_children()
                );
            }
            let mut entries = 0;
            for branch in &node.branches {
                match &branch.entry {
                    Entry::Data(_) => {
                        assert!(node.is_leaf(), "data branch in an internal node");
                        assert!(branch.rect.is_valid(), "invalid key rectangle");
                        entries += 1;
                    }
                    Entry::Child(child) => {
                        assert!(!node.is_leaf(), "child branch in a leaf");
                        assert_eq!(child.level + 1, node.level, "leaves at unequal depth");
                        assert_eq!(branch.rect, child.cover(), "branch cover is not tight");
                        entries += walk(child, config, false);
                    }
                }
            }
            entries
        }
        let entries = walk(&self.root, self.config, true);
        assert_eq!(entries, self.len, "entry count out of sync");
    }
}
