// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use core::ops::ControlFlow;

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{RTree, RTreeConfig, Rect};

type R2 = Rect<f64, 2>;

fn from_xywh(x: f64, y: f64, w: f64, h: f64) -> R2 {
    Rect::new([x, y], [x + w, y + h])
}

fn gen_grid_rects(n: usize, cell: f64) -> Vec<R2> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(from_xywh(x0, y0, cell, cell));
        }
    }
    out
}

#[derive(Clone)]
struct Rng(u64);

impl Rng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }
    fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
    fn next_f64(&mut self) -> f64 {
        let v = self.next_u64() >> 11;
        (v as f64) / ((1u64 << 53) as f64)
    }
}

fn gen_random_rects(count: usize, extent: f64, rect: f64) -> Vec<R2> {
    let mut out = Vec::with_capacity(count);
    let mut rng = Rng::new(0xCAFE_F00D_DEAD_BEEF);
    for _ in 0..count {
        let x0 = rng.next_f64() * (extent - rect).max(1.0);
        let y0 = rng.next_f64() * (extent - rect).max(1.0);
        out.push(from_xywh(x0, y0, rect, rect));
    }
    out
}

fn gen_clustered_rects(n_clusters: usize, per_cluster: usize, spread: f64) -> Vec<R2> {
    let mut out = Vec::with_capacity(n_clusters * per_cluster);
    let mut rng = Rng::new(0xC1A5_7E55_9999_ABCD);
    let mut centers = Vec::with_capacity(n_clusters);
    for _ in 0..n_clusters {
        centers.push((rng.next_f64() * 2000.0, rng.next_f64() * 2000.0));
    }
    for (cx, cy) in centers {
        for _ in 0..per_cluster {
            let dx = (rng.next_f64() - 0.5) * spread;
            let dy = (rng.next_f64() - 0.5) * spread;
            out.push(from_xywh(cx + dx, cy + dy, 12.0, 12.0));
        }
    }
    out
}

fn build(rects: &[R2], max_children: usize) -> RTree<f64, u32, 2> {
    let config = RTreeConfig::new(max_children).unwrap();
    let mut tree = RTree::with_config(config);
    for (i, r) in rects.iter().copied().enumerate() {
        tree.insert(r, i as u32).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_insert");
    for &n in &[32usize, 64, 128] {
        let rects = gen_grid_rects(n, 10.0);
        group.throughput(Throughput::Elements((n * n) as u64));
        for &m in &[4usize, 8, 16] {
            group.bench_function(format!("grid_n{}_m{}", n, m), |b| {
                b.iter(|| black_box(build(&rects, m).len()));
            });
        }
    }
    let rects = gen_clustered_rects(32, 256, 200.0);
    group.throughput(Throughput::Elements(rects.len() as u64));
    group.bench_function("clustered_m8", |b| {
        b.iter(|| black_box(build(&rects, 8).len()));
    });
    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_search");
    let rects = gen_random_rects(20_000, 2000.0, 8.0);
    let tree = build(&rects, 8);
    for &side in &[10.0_f64, 100.0, 400.0] {
        let query = from_xywh(500.0, 500.0, side, side);
        group.bench_function(format!("count_side{}", side), |b| {
            b.iter(|| black_box(tree.count(&query)));
        });
    }
    let query = from_xywh(0.0, 0.0, 2000.0, 2000.0);
    group.bench_function("first_hit", |b| {
        b.iter(|| {
            black_box(tree.search(&query, |_: &R2, _: &u32| ControlFlow::<()>::Break(())))
        });
    });
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_remove");
    let rects = gen_random_rects(4_096, 2000.0, 8.0);
    group.throughput(Throughput::Elements((rects.len() / 2) as u64));
    group.bench_function("remove_half_m8", |b| {
        b.iter_batched(
            || build(&rects, 8),
            |mut tree| {
                for (i, r) in rects.iter().enumerate().step_by(2) {
                    let _ = tree.remove(r, &(i as u32));
                }
                black_box(tree.len());
            },
            BatchSize::SmallInput,
        )
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_search, bench_remove);
criterion_main!(benches);
