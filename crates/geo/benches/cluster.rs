//! Benchmarks for distance and clustering.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loofinder_geo::{cluster, haversine_distance, ClusterCache, GeoPoint, PointOfInterest};

fn create_test_points(count: usize) -> Vec<PointOfInterest<()>> {
    (0..count)
        .map(|i| {
            // Scatter points over central Sofia
            let lat = 42.65 + (i as f64 * 0.0037) % 0.1;
            let lng = 23.28 + (i as f64 * 0.0061) % 0.1;
            PointOfInterest::new(format!("wc-{}", i), GeoPoint::new(lat, lng), ())
        })
        .collect()
}

fn bench_single_distance(c: &mut Criterion) {
    let sofia = GeoPoint::new(42.6977, 23.3219);
    let plovdiv = GeoPoint::new(42.1354, 24.7453);

    c.bench_function("haversine_single", |b| {
        b.iter(|| haversine_distance(black_box(&sofia), black_box(&plovdiv)))
    });
}

fn bench_cluster(c: &mut Criterion) {
    let mut group = c.benchmark_group("cluster");

    for size in [10, 100, 300].iter() {
        let points = create_test_points(*size);

        group.bench_with_input(BenchmarkId::new("radius_0.5km", size), size, |b, _| {
            b.iter(|| cluster(black_box(&points), black_box(0.5)))
        });
    }

    group.finish();
}

fn bench_cached_cluster(c: &mut Criterion) {
    let points = create_test_points(300);
    let cache = ClusterCache::new(4);

    c.bench_function("cluster_cached_300", |b| {
        b.iter(|| cache.get_or_compute(black_box(&points), black_box(0.5)))
    });
}

criterion_group!(benches, bench_single_distance, bench_cluster, bench_cached_cluster);
criterion_main!(benches);
