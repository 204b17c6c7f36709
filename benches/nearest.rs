use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use nearest_position::{
    Entity, EntityStore, GridConfig, NearestFinder, QueryPoint, SpatialGrid, decode_entities,
    encode_entities,
};

/// Deterministic fleet scattered over the reference area.
fn fleet(count: usize) -> Vec<Entity> {
    let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
    let mut next = move || {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        (state >> 11) as f64 / (1u64 << 53) as f64
    };

    (0..count)
        .map(|i| {
            let lat = 31.0 + 5.0 * next();
            let lon = -103.0 + 9.0 * next();
            Entity::new(
                i as i32,
                format!("V{:07}", i),
                lat as f32,
                lon as f32,
                1_700_000_000 + i as u64,
            )
        })
        .collect()
}

fn benchmark_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("grid_build");
    let queries = QueryPoint::defaults();

    for count in [10_000, 100_000, 1_000_000] {
        let store = EntityStore::from_entities(fleet(count)).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(count), &store, |b, store| {
            b.iter(|| SpatialGrid::build(black_box(store), &queries, &GridConfig::default()).unwrap())
        });
    }

    group.finish();
}

fn benchmark_find_all(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_all");

    for resolution in [100, 1000, 4000] {
        let store = EntityStore::from_entities(fleet(1_000_000)).unwrap();
        let finder =
            NearestFinder::new(store, QueryPoint::defaults(), &GridConfig::new(resolution)).unwrap();

        group.bench_with_input(
            BenchmarkId::new("sequential", resolution),
            &finder,
            |b, finder| b.iter(|| black_box(finder.find_all())),
        );
        group.bench_with_input(
            BenchmarkId::new("parallel", resolution),
            &finder,
            |b, finder| b.iter(|| black_box(finder.par_find_all())),
        );
    }

    group.finish();
}

fn benchmark_decode(c: &mut Criterion) {
    let bytes = encode_entities(&fleet(200_000)).unwrap();
    c.bench_function("decode_200k_records", |b| {
        b.iter(|| decode_entities(black_box(&bytes)).unwrap())
    });
}

criterion_group!(benches, benchmark_grid_build, benchmark_find_all, benchmark_decode);
criterion_main!(benches);
