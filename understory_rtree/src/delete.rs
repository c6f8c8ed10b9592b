// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Entry removal with condensing of under-full nodes.

use alloc::boxed::Box;
use alloc::vec::Vec;

use crate::node::{Entry, Node};
use crate::types::{Rect, Scalar};

/// Remove the leaf entry holding `value` whose rectangle overlaps `rect`.
///
/// Every child found under-full on the way back up is detached whole and pushed
/// onto `orphans` for later reinsertion; the remaining covers on the path are
/// recomputed. Returns whether an entry was removed.
pub(crate) fn remove_entry<T: Scalar, V: PartialEq, const D: usize>(
    node: &mut Node<T, V, D>,
    rect: &Rect<T, D>,
    value: &V,
    min_children: usize,
    orphans: &mut Vec<Box<Node<T, V, D>>>,
) -> bool {
    if node.is_leaf() {
        let found = node
            .branches
            .iter()
            .position(|b| matches!(&b.entry, Entry::Data(v) if v == value) && b.rect.overlaps(rect));
        return match found {
            Some(pos) => {
                node.branches.swap_remove(pos);
                true
            }
            None => false,
        };
    }

    for i in 0..node.branches.len() {
        if !node.branches[i].rect.overlaps(rect) {
            continue;
        }
        let child = node.branches[i].child_mut();
        if !remove_entry(child, rect, value, min_children, orphans) {
            continue;
        }
        if child.branches.len() >= min_children {
            let cover = child.cover();
            node.branches[i].rect = cover;
        } else {
            orphans.push(node.branches.swap_remove(i).into_child());
        }
        return true;
    }
    false
}
