//! Criterion benchmarks for the simplicity test and its AVL tree.
//! Sizes are vertex counts (or tree sizes) in {10, 100, 1000, 10000}.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use malachite::Rational;
use ordered_float::NotNan;
use polysweep::{avl::AvlTree, is_simple, Point, Polygon};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

const SIZES: [usize; 4] = [10, 100, 1000, 10000];

fn point(x: f64, y: f64) -> Point<NotNan<f64>> {
    Point::new(NotNan::new(x).unwrap(), NotNan::new(y).unwrap())
}

/// A polygon that's star-shaped around the origin, and therefore simple.
fn star_polygon(n: usize, seed: u64) -> Polygon<NotNan<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut angles: Vec<f64> = (0..n)
        .map(|_| rng.gen::<f64>() * std::f64::consts::TAU)
        .collect();
    angles.sort_by(f64::total_cmp);
    Polygon::new(angles.into_iter().map(|theta| {
        let r = rng.gen_range(1.0..10.0);
        point(r * theta.cos(), r * theta.sin())
    }))
    .unwrap()
}

/// Uniformly random vertices, which almost always make a polygon with
/// crossings.
fn random_polygon(n: usize, seed: u64) -> Polygon<NotNan<f64>> {
    let mut rng = StdRng::seed_from_u64(seed);
    Polygon::new((0..n).map(|_| point(rng.gen_range(-10.0..10.0), rng.gen_range(-10.0..10.0))))
        .unwrap()
}

fn bench_simplicity(c: &mut Criterion) {
    let mut group = c.benchmark_group("is_simple");
    for &n in &SIZES {
        let star = star_polygon(n, 42);
        group.bench_with_input(BenchmarkId::new("star", n), &star, |b, p| {
            b.iter(|| is_simple(black_box(p)))
        });

        let exact_star =
            Polygon::<Rational>::new(star.vertices().iter().map(Point::to_exact)).unwrap();
        group.bench_with_input(BenchmarkId::new("star_exact", n), &exact_star, |b, p| {
            b.iter(|| is_simple(black_box(p)))
        });

        let random = random_polygon(n, 43);
        group.bench_with_input(BenchmarkId::new("random", n), &random, |b, p| {
            b.iter(|| is_simple(black_box(p)))
        });
    }
    group.finish();
}

fn bench_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("avl");
    for &n in &SIZES {
        let mut keys: Vec<u64> = (0..n as u64).collect();
        keys.shuffle(&mut StdRng::seed_from_u64(44));

        group.bench_with_input(BenchmarkId::new("insert_delete", n), &keys, |b, keys| {
            b.iter(|| {
                let mut tree = AvlTree::default();
                for &k in keys {
                    tree.insert(k).unwrap();
                }
                for k in keys {
                    black_box(tree.delete(k));
                }
                tree
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_simplicity, bench_tree);
criterion_main!(benches);
