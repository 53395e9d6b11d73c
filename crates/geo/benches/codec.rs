//! Benchmarks for coordinate parsing and batch partitioning.

use agrimap_geo::{create_batches, to_storage, Coordinate, PointValue};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::num::NonZeroUsize;

fn create_test_coordinates(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Grid over Jutland and Funen
            let lat = 54.57 + (i as f64 * 0.01) % 2.18;
            let lng = 8.07 + (i as f64 * 0.01) % 3.06;
            Coordinate::new(lat, lng)
        })
        .collect()
}

fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    group.bench_function("to_storage", |b| {
        b.iter(|| to_storage(black_box("55.67087112646539, 12.582277381808696")))
    });

    let decorated = PointValue::Text("(55.67087112646539,12.582277381808696)".to_string());
    group.bench_function("decorated_text", |b| {
        b.iter(|| black_box(&decorated).to_coordinate())
    });

    let pair = PointValue::Pair { x: 55.67087112646539, y: 12.582277381808696 };
    group.bench_function("pair", |b| b.iter(|| black_box(&pair).to_coordinate()));

    group.finish();
}

fn bench_batches(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_batches");
    let cap = NonZeroUsize::new(25).unwrap();

    for size in [10, 100, 1000].iter() {
        let coords = create_test_coordinates(*size);
        group.bench_with_input(BenchmarkId::new("display", size), size, |b, _| {
            b.iter(|| {
                create_batches(black_box(&coords), cap)
                    .into_iter()
                    .map(|batch| batch.iter().map(ToString::to_string).collect::<Vec<_>>())
                    .count()
            })
        });
    }

    group.finish();
}

criterion_group!(benches, bench_codec, bench_batches);
criterion_main!(benches);
