// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Overlap search and leaf iteration.

use alloc::vec::Vec;
use core::fmt::Debug;
use core::ops::ControlFlow;
use core::slice;

use crate::node::{Branch, Entry, Node};
use crate::types::{Rect, Scalar};

/// Callback invoked once per matching leaf entry during [`RTree::search`](crate::RTree::search).
///
/// Returning [`ControlFlow::Break`] ends the whole search immediately.
/// Closures of the form `FnMut(&Rect<T, D>, &V) -> ControlFlow<()>` implement this trait.
pub trait Visitor<T, V, const D: usize> {
    /// Visit one leaf entry whose rectangle overlaps the query.
    fn visit(&mut self, rect: &Rect<T, D>, value: &V) -> ControlFlow<()>;
}

impl<T, V, const D: usize, F> Visitor<T, V, D> for F
where
    F: FnMut(&Rect<T, D>, &V) -> ControlFlow<()>,
{
    #[inline]
    fn visit(&mut self, rect: &Rect<T, D>, value: &V) -> ControlFlow<()> {
        self(rect, value)
    }
}

/// Visit every leaf entry below `node` overlapping `query`, counting hits.
///
/// The count includes the entry whose visit broke the search.
pub(crate) fn search_node<T: Scalar, V, const D: usize, F: Visitor<T, V, D> + ?Sized>(
    node: &Node<T, V, D>,
    query: &Rect<T, D>,
    visitor: &mut F,
    hits: &mut usize,
) -> ControlFlow<()> {
    for branch in &node.branches {
        if !branch.rect.overlaps(query) {
            continue;
        }
        match &branch.entry {
            Entry::Child(child) => search_node(child, query, visitor, hits)?,
            Entry::Data(value) => {
                *hits += 1;
                visitor.visit(&branch.rect, value)?;
            }
        }
    }
    ControlFlow::Continue(())
}

/// Iterator over every leaf entry of an [`RTree`](crate::RTree), in tree order.
pub struct Iter<'a, T, V, const D: usize> {
    stack: Vec<slice::Iter<'a, Branch<T, V, D>>>,
    remaining: usize,
}

impl<'a, T: Scalar, V, const D: usize> Iter<'a, T, V, D> {
    pub(crate) fn new(root: &'a Node<T, V, D>, len: usize) -> Self {
        let mut stack = Vec::with_capacity(root.level + 1);
        stack.push(root.branches.iter());
        Self {
            stack,
            remaining: len,
        }
    }
}

impl<'a, T: Scalar, V, const D: usize> Iterator for Iter<'a, T, V, D> {
    type Item = (&'a Rect<T, D>, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let top = self.stack.last_mut()?;
            let Some(branch) = top.next() else {
                self.stack.pop();
                continue;
            };
            match &branch.entry {
                Entry::Child(child) => self.stack.push(child.branches.iter()),
                Entry::Data(value) => {
                    self.remaining -= 1;
                    return Some((&branch.rect, value));
                }
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T: Scalar, V, const D: usize> ExactSizeIterator for Iter<'_, T, V, D> {}

impl<T, V, const D: usize> Debug for Iter<'_, T, V, D> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Iter")
            .field("depth", &self.stack.len())
            .field("remaining", &self.remaining)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::boxed::Box;
    use alloc::vec;

    type N = Node<i32, char, 1>;

    fn seg(a: i32, b: i32) -> Rect<i32, 1> {
        Rect::new([a], [b])
    }

    fn tree() -> N {
        let mut left = N::new(0, 4);
        left.branches.push(Branch::data(seg(0, 1), 'a'));
        left.branches.push(Branch::data(seg(2, 3), 'b'));
        let mut right = N::new(0, 4);
        right.branches.push(Branch::data(seg(10, 11), 'c'));
        right.branches.push(Branch::data(seg(3, 12), 'd'));
        let mut root = N::new(1, 4);
        root.branches.push(Branch::child(Box::new(left)));
        root.branches.push(Branch::child(Box::new(right)));
        root
    }

    #[test]
    fn visits_every_overlapping_leaf() {
        let root = tree();
        let mut seen = vec![];
        let mut hits = 0;
        let flow = search_node(
            &root,
            &seg(3, 3),
            &mut |_: &Rect<i32, 1>, v: &char| -> ControlFlow<()> {
                seen.push(*v);
                ControlFlow::Continue(())
            },
            &mut hits,
        );
        assert_eq!(flow, ControlFlow::Continue(()));
        seen.sort_unstable();
        assert_eq!(seen, vec!['b', 'd']);
        assert_eq!(hits, 2);
    }

    #[test]
    fn break_stops_all_remaining_branches() {
        let root = tree();
        let mut hits = 0;
        let mut calls = 0;
        let flow = search_node(
            &root,
            &seg(0, 20),
            &mut |_: &Rect<i32, 1>, _: &char| -> ControlFlow<()> {
                calls += 1;
                ControlFlow::Break(())
            },
            &mut hits,
        );
        assert_eq!(flow, ControlFlow::Break(()));
        assert_eq!(calls, 1);
        assert_eq!(hits, 1);
    }

    #[test]
    fn iter_yields_each_entry_once() {
        let root = tree();
        let it = Iter::new(&root, 4);
        assert_eq!(it.len(), 4);
        let mut values: Vec<char> = it.map(|(_, v)| *v).collect();
        values.sort_unstable();
        assert_eq!(values, vec!['a', 'b', 'c', 'd']);
    }
}
