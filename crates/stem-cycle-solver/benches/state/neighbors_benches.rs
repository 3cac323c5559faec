// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use stem_cycle_model::prelude::NodeIndex;
use stem_cycle_solver::state::neighbors::NeighborStructure;

const NUM_NODES: usize = 1000;

fn ring() -> (NeighborStructure, Vec<NodeIndex>) {
    let tour: Vec<NodeIndex> = (0..NUM_NODES).map(NodeIndex::new).collect();
    let mut links = NeighborStructure::new(NUM_NODES);
    links.reset_from_tour(&tour);
    (links, tour)
}

fn bench_reset_from_tour(c: &mut Criterion) {
    let (mut links, tour) = ring();
    c.bench_function("neighbors/reset_from_tour", |b| {
        b.iter(|| {
            links.reset_from_tour(black_box(&tour));
            black_box(&links);
        })
    });
}

fn bench_single_counterpart(c: &mut Criterion) {
    let (links, _) = ring();
    let node = NodeIndex::new(NUM_NODES / 2);
    let known = NodeIndex::new(NUM_NODES / 2 - 1);
    c.bench_function("neighbors/single_counterpart", |b| {
        b.iter(|| {
            let out = links.counterpart(black_box(node), black_box(known));
            black_box(out)
        })
    });
}

fn bench_full_walk(c: &mut Criterion) {
    let (links, _) = ring();
    c.bench_function("neighbors/full_walk", |b| {
        b.iter(|| {
            let start = NodeIndex::new(0);
            let mut prev = start;
            let mut at = links.right(start).unwrap();
            let mut visited = 1usize;
            while at != start {
                let next = links.counterpart(at, prev).unwrap();
                prev = at;
                at = next;
                visited += 1;
            }
            black_box(visited)
        })
    });
}

criterion_group!(
    benches,
    bench_reset_from_tour,
    bench_single_counterpart,
    bench_full_walk
);
criterion_main!(benches);
