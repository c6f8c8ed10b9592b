// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_rtree --heading-base-level=0

//! Understory R-tree: a dynamic N-dimensional spatial index.
//!
//! [`RTree`] maps axis-aligned rectangles ([`Rect`]) in `D` dimensions to opaque values.
//!
//! - Insert entries one at a time; full nodes split with Guttman's quadratic split.
//! - Remove entries by value; under-full nodes are dissolved and their branches reinserted.
//! - Search for every entry overlapping a rectangle with a [`Visitor`] that can stop early.
//!
//! Node bookkeeping goes through a [`NodeAllocator`], so hosts can cap the memory a tree
//! may use. The default [`Unbounded`] allocator grants everything; [`TrackingAllocator`]
//! enforces a byte budget. Insertion is all-or-nothing with respect to allocation failure.
//!
//! # Example
//!
//! ```rust
//! use core::ops::ControlFlow;
//! use understory_rtree::{RTree, RTreeConfig, Rect};
//!
//! let mut tree: RTree<f64, &'static str, 3> = RTree::with_config(RTreeConfig::new(4).unwrap());
//! tree.insert(Rect::new([0.0; 3], [1.0; 3]), "a").unwrap();
//! tree.insert(Rect::new([2.0; 3], [3.0; 3]), "b").unwrap();
//! tree.insert(Rect::new([0.0; 3], [3.0; 3]), "c").unwrap();
//!
//! let mut hits: Vec<&str> = Vec::new();
//! let count = tree.search(&Rect::new([0.0; 3], [1.0; 3]), |_: &Rect<f64, 3>, v: &&'static str| {
//!     hits.push(*v);
//!     ControlFlow::<()>::Continue(())
//! });
//! hits.sort();
//! assert_eq!(count, 2);
//! assert_eq!(hits, ["a", "c"]);
//!
//! assert!(tree.remove(&Rect::new([0.0; 3], [1.0; 3]), &"a").unwrap());
//! assert_eq!(tree.len(), 2);
//! ```
//!
//! Capping node memory:
//!
//! ```rust
//! use understory_rtree::{RTree, RTreeConfig, RTreeError, Rect, TrackingAllocator};
//!
//! let config = RTreeConfig::new(4).unwrap();
//! let mut tree: RTree<i64, u32, 2, TrackingAllocator> =
//!     RTree::with_allocator(config, TrackingAllocator::with_limit(1024)).unwrap();
//! let mut refused = false;
//! for i in 0..1000 {
//!     match tree.insert(Rect::new([i, i], [i + 1, i + 1]), i as u32) {
//!         Ok(()) => {}
//!         Err(RTreeError::AllocationFailed { .. }) => {
//!             refused = true;
//!             break;
//!         }
//!         Err(e) => panic!("{e}"),
//!     }
//! }
//! assert!(refused);
//! assert!(tree.allocator().live_bytes() <= 1024);
//! ```
//!
//! ## Cost heuristic
//!
//! Insertion and splitting rank candidates by [`Rect::cost`]: the volume of the ball whose
//! diameter is the rectangle's diagonal. It is zero for degenerate rectangles and grows
//! monotonically with the rectangle, which is all the algorithms rely on.
//!
//! ## Features
//!
//! - `std` (default): use the standard library's float square root.
//! - `libm`: use `libm` for `no_std` builds.
//!
//! ### Float semantics
//!
//! This crate assumes no NaNs for floating-point coordinates. Inserting a degenerate or
//! inverted rectangle panics.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

#[cfg(not(any(feature = "std", feature = "libm")))]
compile_error!("understory_rtree requires either the `std` or `libm` feature");

pub mod allocator;
pub mod config;
mod delete;
pub mod error;
mod insert;
mod node;
pub mod search;
mod split;
pub mod tree;
pub mod types;

pub use allocator::{NodeAllocator, TrackingAllocator, Unbounded};
pub use config::RTreeConfig;
pub use error::RTreeError;
pub use search::{Iter, Visitor};
pub use tree::RTree;
pub use types::{Rect, Scalar};
