use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wayfinder::shape::route_steps;
use wayfinder::{find_nearby, haversine_km, ChargerDataset, ChargerSite, GeoPoint};

/// Build a synthetic dataset of `n` sites spread over the San Francisco Bay Area.
fn create_dataset(n: usize) -> ChargerDataset {
    let sites = (0..n)
        .map(|i| {
            // Deterministic scatter over roughly 2° × 2°
            let lat = 36.5 + ((i * 7919) % 2000) as f64 / 1000.0;
            let lon = -123.5 + ((i * 104_729) % 2000) as f64 / 1000.0;
            ChargerSite::new(format!("site_{i}"), GeoPoint::new(lat, lon), "available")
        })
        .collect();
    ChargerDataset::from_sites(sites)
}

fn bench_haversine(c: &mut Criterion) {
    let a = GeoPoint::new(37.7749, -122.4194);
    let b = GeoPoint::new(34.0522, -118.2437);

    c.bench_function("haversine", |bench| {
        bench.iter(|| black_box(haversine_km(black_box(a), black_box(b))));
    });
}

fn bench_find_nearby(c: &mut Criterion) {
    let query = GeoPoint::new(37.7749, -122.4194);

    for size in [1_000, 10_000, 100_000] {
        let dataset = create_dataset(size);
        c.bench_function(&format!("find_nearby_{size}_sites_50km"), |b| {
            b.iter(|| black_box(find_nearby(&dataset, black_box(query), black_box(50.0))));
        });
    }
}

fn bench_route_steps(c: &mut Criterion) {
    let steps: Vec<String> = (0..500).map(|i| format!("step_{i}")).collect();

    c.bench_function("route_steps_500", |b| {
        b.iter(|| black_box(route_steps(black_box(steps.clone()))));
    });
}

criterion_group!(benches, bench_haversine, bench_find_nearby, bench_route_steps);
criterion_main!(benches);
