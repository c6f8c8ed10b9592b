// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fan-out configuration.

use crate::error::RTreeError;

/// Fan-out bounds of an [`RTree`](crate::RTree).
///
/// Every node holds at most `max_children` branches; every node except the
/// root holds at least `min_children = max_children / 2`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RTreeConfig {
    max_children: usize,
}

impl RTreeConfig {
    /// Default maximum fan-out.
    pub const DEFAULT_MAX_CHILDREN: usize = 8;

    /// Create a configuration with the given maximum fan-out.
    ///
    /// Fails with [`RTreeError::InvalidFanOut`] if `max_children < 2`.
    pub const fn new(max_children: usize) -> Result<Self, RTreeError> {
        if max_children < 2 {
            return Err(RTreeError::InvalidFanOut { max_children });
        }
        Ok(Self { max_children })
    }

    /// Maximum number of branches per node (`M`).
    pub const fn max_children(&self) -> usize {
        self.max_children
    }

    /// Minimum number of branches per non-root node (`m = M / 2`).
    pub const fn min_children(&self) -> usize {
        self.max_children / 2
    }
}

impl Default for RTreeConfig {
    fn default() -> Self {
        Self {
            max_children: Self::DEFAULT_MAX_CHILDREN,
        }
    }
}
