use std::f64::consts::TAU;
use std::fs;

use criterion::{criterion_group, criterion_main, Criterion};

use polytess::{Options, Polygon, Tessellator};

fn load_fixture(name: &str) -> Polygon<f64> {
    let s = fs::read_to_string("./tests/fixtures/".to_string() + name + ".json").unwrap();
    let data = serde_json::from_str::<Vec<[f64; 2]>>(&s).unwrap();
    Polygon::new(data).unwrap()
}

fn star(n: usize) -> Polygon<f64> {
    Polygon::new((0..n).map(|k| {
        let a = k as f64 * TAU / n as f64;
        let r = if k % 2 == 0 { 10.0 } else { 4.0 };
        [r * a.cos(), r * a.sin()]
    }))
    .unwrap()
}

fn bench(c: &mut Criterion) {
    let mut tessellator = Tessellator::new();
    let mut triangles: Vec<u32> = Vec::new();

    c.bench_function("comb", |b| {
        let polygon = load_fixture("comb");
        b.iter(|| {
            tessellator.tessellate(&polygon, &mut triangles).unwrap();
        })
    });

    c.bench_function("spiral", |b| {
        let polygon = load_fixture("spiral");
        b.iter(|| {
            tessellator.tessellate(&polygon, &mut triangles).unwrap();
            assert_eq!(triangles.len(), 118 * 3)
        })
    });

    c.bench_function("star-2000", |b| {
        let polygon = star(2000);
        b.iter(|| {
            tessellator.tessellate(&polygon, &mut triangles).unwrap();
        })
    });

    c.bench_function("star-2000-no-index", |b| {
        let polygon = star(2000);
        let mut plain = Tessellator::with_options(Options {
            hash_threshold: usize::MAX,
        });
        b.iter(|| {
            plain.tessellate(&polygon, &mut triangles).unwrap();
        })
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
