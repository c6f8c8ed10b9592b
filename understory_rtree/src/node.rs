// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node and branch storage shared by the insertion, deletion, and search engines.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::allocator::NodeAllocator;
use crate::types::{Rect, Scalar};

/// What a branch points at. Internal nodes hold only `Child`, leaves only `Data`.
pub(crate) enum Entry<T, V, const D: usize> {
    Child(Box<Node<T, V, D>>),
    Data(V),
}

/// A (rectangle, payload) pair stored in a node.
pub(crate) struct Branch<T, V, const D: usize> {
    pub(crate) rect: Rect<T, D>,
    pub(crate) entry: Entry<T, V, D>,
}

impl<T: Scalar, V, const D: usize> Branch<T, V, D> {
    pub(crate) fn data(rect: Rect<T, D>, value: V) -> Self {
        Self {
            rect,
            entry: Entry::Data(value),
        }
    }

    /// Wrap a node, covering it tightly.
    pub(crate) fn child(node: Box<Node<T, V, D>>) -> Self {
        Self {
            rect: node.cover(),
            entry: Entry::Child(node),
        }
    }

    pub(crate) fn child_ref(&self) -> &Node<T, V, D> {
        match &self.entry {
            Entry::Child(node) => node,
            Entry::Data(_) => unreachable!("internal branches always hold a child node"),
        }
    }

    pub(crate) fn child_mut(&mut self) -> &mut Node<T, V, D> {
        match &mut self.entry {
            Entry::Child(node) => node,
            Entry::Data(_) => unreachable!("internal branches always hold a child node"),
        }
    }

    pub(crate) fn into_child(self) -> Box<Node<T, V, D>> {
        match self.entry {
            Entry::Child(node) => node,
            Entry::Data(_) => unreachable!("internal branches always hold a child node"),
        }
    }
}

/// Up to `max_children` branches plus the node's level (0 = leaf).
pub(crate) struct Node<T, V, const D: usize> {
    pub(crate) level: usize,
    pub(crate) branches: Vec<Branch<T, V, D>>,
}

impl<T: Scalar, V, const D: usize> Node<T, V, D> {
    pub(crate) fn new(level: usize, max_children: usize) -> Self {
        Self {
            level,
            branches: Vec::with_capacity(max_children),
        }
    }

    #[inline]
    pub(crate) fn is_leaf(&self) -> bool {
        self.level == 0
    }

    /// Bytes requested from the allocator for one node of this shape.
    pub(crate) const fn footprint(max_children: usize) -> usize {
        size_of::<Self>() + max_children * size_of::<Branch<T, V, D>>()
    }

    /// Tight cover of all branches; degenerate when empty.
    pub(crate) fn cover(&self) -> Rect<T, D> {
        self.branches
            .iter()
            .fold(Rect::degenerate(), |acc, b| acc.union(&b.rect))
    }

    /// Number of leaf entries reachable from this node.
    pub(crate) fn count_entries(&self) -> usize {
        if self.is_leaf() {
            self.branches.len()
        } else {
            self.branches
                .iter()
                .map(|b| b.child_ref().count_entries())
                .sum()
        }
    }

    /// Destroy every node below this one, freeing one `node_size` per node.
    ///
    /// Leaves this node empty but keeps its level. Returns the number of nodes freed.
    pub(crate) fn release_descendants<A: NodeAllocator>(
        &mut self,
        allocator: &mut A,
        node_size: usize,
    ) -> usize {
        let mut freed = 0;
        for branch in self.branches.drain(..) {
            if let Entry::Child(mut child) = branch.entry {
                freed += child.release_descendants(allocator, node_size) + 1;
                allocator.free(node_size);
            }
        }
        freed
    }
}
