use std::hint::black_box;

use cellmap::half_edge::algorithms::{
    reconstruct::vertex_permutation_from_trace, split_join::split_and_join,
    uniform_reduced_map_with_rng,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::{rngs::SmallRng, SeedableRng};

fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("uniform_reduced_map");
    for genus in [1, 4, 8, 16] {
        group.bench_with_input(BenchmarkId::from_parameter(genus), &genus, |b, &genus| {
            let mut rng = SmallRng::seed_from_u64(0);
            b.iter(|| uniform_reduced_map_with_rng(black_box(genus), &mut rng).unwrap());
        });
    }
    group.finish();
}

fn bench_reconstruct(c: &mut Criterion) {
    let mut rng = SmallRng::seed_from_u64(1);
    let (_, trace) = split_and_join(16, &mut rng);
    c.bench_function("reconstruct_genus_16", |b| {
        b.iter(|| vertex_permutation_from_trace(black_box(trace.clone()), &mut rng).unwrap());
    });
}

criterion_group!(benches, bench_sample, bench_reconstruct);
criterion_main!(benches);
