// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Node allocation capability.
//!
//! The tree asks a [`NodeAllocator`] for permission once per node it creates and
//! reports once per node it destroys. Memory itself comes from the global
//! allocator; the capability decides whether a node may exist, which lets hosts
//! enforce budgets and observe the tree's footprint.

use core::fmt::Debug;

use crate::error::RTreeError;

/// Capability used by [`RTree`](crate::RTree) to account for node memory.
pub trait NodeAllocator {
    /// Request `size` bytes for one node.
    ///
    /// Returning an error aborts the operation that needed the node.
    fn allocate(&mut self, size: usize) -> Result<(), RTreeError>;

    /// Return `size` bytes previously granted by [`NodeAllocator::allocate`].
    fn free(&mut self, size: usize);
}

/// Allocator that grants every request.
#[derive(Copy, Clone, Debug, Default)]
pub struct Unbounded;

impl NodeAllocator for Unbounded {
    #[inline]
    fn allocate(&mut self, _size: usize) -> Result<(), RTreeError> {
        Ok(())
    }

    #[inline]
    fn free(&mut self, _size: usize) {}
}

/// Allocator with an optional byte budget that tracks live and peak usage.
#[derive(Clone, Debug, Default)]
pub struct TrackingAllocator {
    limit: Option<usize>,
    live: usize,
    peak: usize,
    allocations: usize,
    frees: usize,
}

impl TrackingAllocator {
    /// A tracking allocator without a budget.
    pub fn new() -> Self {
        Self::default()
    }

    /// A tracking allocator refusing requests beyond `limit` live bytes.
    pub fn with_limit(limit: usize) -> Self {
        Self {
            limit: Some(limit),
            ..Self::default()
        }
    }

    /// Change the budget. Already granted bytes are unaffected.
    pub fn set_limit(&mut self, limit: Option<usize>) {
        self.limit = limit;
    }

    /// Bytes currently granted.
    pub fn live_bytes(&self) -> usize {
        self.live
    }

    /// Highest value `live_bytes` has reached.
    pub fn peak_bytes(&self) -> usize {
        self.peak
    }

    /// Number of granted requests so far.
    pub fn allocations(&self) -> usize {
        self.allocations
    }

    /// Number of frees so far.
    pub fn frees(&self) -> usize {
        self.frees
    }
}

impl NodeAllocator for TrackingAllocator {
    fn allocate(&mut self, size: usize) -> Result<(), RTreeError> {
        let next = self.live.saturating_add(size);
        if self.limit.is_some_and(|limit| next > limit) {
            log::debug!(
                "refusing node allocation of {size} bytes ({} live, limit {:?})",
                self.live,
                self.limit
            );
            return Err(RTreeError::AllocationFailed { size });
        }
        self.live = next;
        self.peak = self.peak.max(next);
        self.allocations += 1;
        Ok(())
    }

    fn free(&mut self, size: usize) {
        debug_assert!(size <= self.live, "freeing more bytes than are live");
        self.live = self.live.saturating_sub(size);
        self.frees += 1;
    }
}
