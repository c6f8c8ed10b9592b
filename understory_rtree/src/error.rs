// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the tree.

use thiserror::Error;

/// Errors surfaced by [`RTree`](crate::RTree) operations.
///
/// Precondition violations (such as inserting an inverted rectangle) are
/// programming errors and panic instead.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum RTreeError {
    /// The [`NodeAllocator`](crate::NodeAllocator) refused a node allocation.
    #[error("node allocation of {size} bytes was refused")]
    AllocationFailed {
        /// Size of the refused request in bytes.
        size: usize,
    },

    /// The configured fan-out cannot form a valid tree.
    #[error("max_children must be at least 2, got {max_children}")]
    InvalidFanOut {
        /// The rejected fan-out.
        max_children: usize,
    },
}
