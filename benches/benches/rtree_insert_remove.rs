// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, Criterion, Throughput, black_box, criterion_group, criterion_main};
use understory_rtree::{Aabb, RTree, RTreeConfig};

fn gen_grid_boxes(n: usize, cell: f64) -> Vec<Aabb> {
    let mut out = Vec::with_capacity(n * n);
    for y in 0..n {
        for x in 0..n {
            let x0 = x as f64 * cell;
            let y0 = y as f64 * cell;
            out.push(Aabb::from_corners(&[x0, y0], &[x0 + cell, y0 + cell]).unwrap());
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

fn gen_random_boxes(count: usize, dimension: usize, extent: f64, max_size: f64) -> Vec<Aabb> {
    let mut rng = Rng::new(0x5EED_1234_ABCD_0001);
    (0..count)
        .map(|_| {
            let min: Vec<f64> = (0..dimension).map(|_| rng.next_f64() * extent).collect();
            let max: Vec<f64> = min.iter().map(|lo| lo + rng.next_f64() * max_size).collect();
            Aabb::from_corners(&min, &max).unwrap()
        })
        .collect()
}

fn build(config: &RTreeConfig, boxes: &[Aabb]) -> RTree {
    let mut tree = RTree::new(config.clone()).unwrap();
    for b in boxes {
        tree.insert(b.clone()).unwrap();
    }
    tree
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_insert");
    for &capacity in &[8usize, 20, 64] {
        let config = RTreeConfig::default().with_capacity(capacity);
        let boxes = gen_grid_boxes(64, 10.0);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(format!("grid_4096_c{capacity}"), |b| {
            b.iter(|| black_box(build(&config, &boxes).height()));
        });
    }
    for &dimension in &[2usize, 3] {
        let config = RTreeConfig::default().with_dimension(dimension);
        let boxes = gen_random_boxes(4096, dimension, 1000.0, 20.0);
        group.throughput(Throughput::Elements(boxes.len() as u64));
        group.bench_function(format!("random_4096_d{dimension}"), |b| {
            b.iter(|| black_box(build(&config, &boxes).height()));
        });
    }
    group.finish();
}

fn bench_remove(c: &mut Criterion) {
    let mut group = c.benchmark_group("rtree_remove");
    let config = RTreeConfig::default();
    let boxes = gen_random_boxes(4096, 2, 1000.0, 20.0);
    group.throughput(Throughput::Elements(boxes.len() as u64));
    group.bench_function("random_4096_all", |b| {
        b.iter_batched(
            || build(&config, &boxes),
            |mut tree| {
                for bx in &boxes {
                    black_box(tree.remove(bx).unwrap());
                }
                black_box(tree.len())
            },
            BatchSize::LargeInput,
        );
    });
    group.bench_function("random_4096_contains", |b| {
        let tree = build(&config, &boxes);
        b.iter(|| {
            let hits = boxes.iter().filter(|bx| tree.contains(bx).unwrap()).count();
            black_box(hits)
        });
    });
    group.finish();
}

criterion_group!(benches, bench_insert, bench_remove);
criterion_main!(benches);
