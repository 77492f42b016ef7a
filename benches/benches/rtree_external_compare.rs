// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

#![cfg(feature = "compare_rstar")]

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{Aabb, RTree, RTreeConfig};

use rstar::primitives::Rectangle;

fn gen_grid_corners(n: usize, cell: f64) -> Vec<([f64; 2], [f64; 2])> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(([x0, y0], [x0 + cell, y0 + cell]));
        }
    }
    out
}

fn bench_incremental_build_and_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_external_compare");
    for &n in &[32usize, 64] {
        let corners = gen_grid_corners(n, 10.0);
        let boxes: Vec<Aabb> = corners
            .iter()
            .map(|(lo, hi)| Aabb::from_corners(lo, hi).unwrap())
            .collect();
        let rects: Vec<Rectangle<[f64; 2]>> = corners
            .iter()
            .map(|&(lo, hi)| Rectangle::from_corners(lo, hi))
            .collect();
        group.throughput(Throughput::Elements((n * n) as u64));

        group.bench_function(format!("understory_insert_remove_n{n}"), |b| {
            b.iter_batched(
                || RTree::new(RTreeConfig::default()).unwrap(),
                |mut tree| {
                    for bx in &boxes {
                        tree.insert(bx.clone()).unwrap();
                    }
                    for bx in &boxes {
                        black_box(tree.remove(bx).unwrap());
                    }
                    black_box(tree.len())
                },
                BatchSize::SmallInput,
            );
        });

        group.bench_function(format!("rstar_insert_remove_n{n}"), |b| {
            b.iter_batched(
                rstar::RTree::new,
                |mut tree| {
                    for r in &rects {
                        tree.insert(*r);
                    }
                    for r in &rects {
                        black_box(tree.remove(r));
                    }
                    black_box(tree.size())
                },
                BatchSize::SmallInput,
            );
        });
    }
    group.finish();
}

criterion_group!(benches, bench_incremental_build_and_remove);
criterion_main!(benches);
