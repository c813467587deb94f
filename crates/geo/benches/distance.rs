//! Benchmarks for geo crate distance calculations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use legends_geo::{distance_km, filter_within, parse_geo_point, sort_by_distance, Coordinate};
use serde_json::json;

fn create_test_points(count: usize) -> Vec<Coordinate> {
    (0..count)
        .map(|i| {
            // Generate points in a grid around Melbourne
            let lat = -38.5 + (i as f64 * 0.01) % 2.0;
            let lng = 144.0 + (i as f64 * 0.01) % 2.0;
            Coordinate::new(lat, lng)
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let cbd = Coordinate::new(-37.8136, 144.9631);
    let fallback = Coordinate::new(-37.81, 144.96);

    c.bench_function("haversine_single", |b| {
        b.iter(|| distance_km(black_box(&cbd), black_box(&fallback)))
    });
}

fn bench_filter_within(c: &mut Criterion) {
    let mut group = c.benchmark_group("filter_within");
    let reference = Coordinate::new(-37.81, 144.96);

    for size in [10, 100, 1000, 10000].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("unsorted", size), size, |b, _| {
            b.iter(|| filter_within(black_box(&reference), black_box(&points), 50.0))
        });

        group.bench_with_input(BenchmarkId::new("nearest_first", size), size, |b, _| {
            b.iter(|| {
                let mut results = filter_within(&reference, black_box(&points), 50.0).unwrap();
                sort_by_distance(&mut results);
                results
            })
        });
    }

    group.finish();
}

fn bench_geo_point_parsing(c: &mut Criterion) {
    let plain = json!({"latitude": -37.81, "longitude": 144.96});
    let firestore = json!({"geoPointValue": {"latitude": -37.81, "longitude": 144.96}});

    let mut group = c.benchmark_group("geo_point_parsing");

    group.bench_function("plain", |b| b.iter(|| parse_geo_point(black_box(&plain))));

    group.bench_function("firestore", |b| {
        b.iter(|| parse_geo_point(black_box(&firestore)))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_single_distance,
    bench_filter_within,
    bench_geo_point_parsing
);
criterion_main!(benches);
