use std::fs;

use polytess::{deviation, Polygon, TessError, Tessellator};
use serde::Deserialize;

/// A single polygon ring stored as `[[x, y], ...]`.
#[derive(Deserialize)]
#[serde(transparent)]
struct Ring(Vec<[f64; 2]>);

fn load_fixture(name: &str) -> Vec<[f64; 2]> {
    let s = fs::read_to_string("./tests/fixtures/".to_string() + name + ".json").unwrap();
    serde_json::from_str::<Ring>(&s).unwrap().0
}

fn test_fixture(name: &str, num_triangles: usize, expected_deviation: f64) {
    let data = load_fixture(name);

    let mut triangles: Vec<u32> = vec![];
    let mut tessellator = Tessellator::new();
    tessellator
        .tessellate_points(data.iter().copied(), &mut triangles)
        .unwrap();

    // check
    assert_eq!(triangles.len(), num_triangles * 3);
    assert!(triangles.iter().all(|&i| (i as usize) < data.len()));
    if !triangles.is_empty() {
        assert!(deviation(&data, &triangles) <= expected_deviation);
    }
}

#[test]
fn fixture_comb() {
    test_fixture("comb", 37, 0.0);
}

#[test]
fn fixture_spiral() {
    test_fixture("spiral", 118, 1e-15);
}

#[test]
fn fixture_collinear_edges() {
    test_fixture("collinear-edges", 6, 0.0);
}

#[test]
fn fixture_closed_ring() {
    test_fixture("closed-ring", 2, 0.0);
}

#[test]
fn fixture_bowtie() {
    // self-intersecting, so the triangles cover more than the signed area
    test_fixture("bowtie", 3, 0.1);
}

#[test]
fn fixture_hourglass() {
    test_fixture("hourglass", 1, f64::INFINITY);
}

#[test]
fn fixture_tangled() {
    let data = load_fixture("tangled");
    let polygon = Polygon::new(data).unwrap();
    let mut triangles: Vec<u32> = vec![];
    let err = Tessellator::new()
        .tessellate(&polygon, &mut triangles)
        .unwrap_err();
    assert_eq!(err, TessError::TriangulationIncomplete { remaining: 10 });
}
