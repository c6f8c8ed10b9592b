// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Basic usage of Understory R-tree: insert, search with early exit, remove, and allocation budgets.

use core::ops::ControlFlow;

use understory_rtree::{RTree, RTreeConfig, Rect, TrackingAllocator};

fn main() {
    let config = RTreeConfig::new(4).unwrap();
    let mut tree: RTree<f64, u32, 3, TrackingAllocator> =
        RTree::with_allocator(config, TrackingAllocator::new()).unwrap();

    // A 5x4 grid of unit cubes.
    for x in 0..5_u32 {
        for y in 0..4_u32 {
            let (fx, fy) = (f64::from(x), f64::from(y));
            let cell = Rect::new([fx, fy, 0.0], [fx + 1.0, fy + 1.0, 1.0]);
            tree.insert(cell, x * 4 + y).unwrap();
        }
    }
    println!("{tree:?}");

    // Everything touching the corner cube.
    let corner = Rect::new([0.0; 3], [1.0; 3]);
    let hits: Vec<_> = tree.query_rect(corner).map(|(_, v)| *v).collect();
    println!("hits touching the corner: {hits:?}");

    // Stop after the first match.
    let mut first = None;
    let visited = tree.search(&corner, |_: &Rect<f64, 3>, v: &u32| {
        first = Some(*v);
        ControlFlow::<()>::Break(())
    });
    println!("visited {visited}, first = {first:?}");

    // Remove a row.
    for x in 0..5_u32 {
        let fx = f64::from(x);
        let cell = Rect::new([fx, 0.0, 0.0], [fx + 1.0, 1.0, 1.0]);
        tree.remove(&cell, &(x * 4)).unwrap();
    }
    println!(
        "after removal: len={}, height={}, live node bytes={}, peak={}",
        tree.len(),
        tree.height(),
        tree.allocator().live_bytes(),
        tree.allocator().peak_bytes()
    );
}
