use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tabletop_maze::{
    cells::Cartesian2DCoordinate,
    generators,
    grid::Grid,
    units::{Height, Width},
};

fn bench_randomized_prim_maze_32(c: &mut Criterion) {
    let mut g = Grid::new(Width(32), Height(32)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(32);

    c.bench_function("randomized_prim_maze_32", move |b| {
        b.iter(|| generators::randomized_prim(&mut g, &mut rng, Cartesian2DCoordinate::new(0, 0)))
    });
}

fn bench_recursive_backtracker_maze_32(c: &mut Criterion) {
    let mut g = Grid::new(Width(32), Height(32)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(32);

    c.bench_function("recursive_backtracker_maze_32", move |b| {
        b.iter(|| generators::recursive_backtracker(&mut g, &mut rng, Cartesian2DCoordinate::new(0, 0)))
    });
}

fn bench_randomized_prim_maze_256(c: &mut Criterion) {
    let mut g = Grid::new(Width(256), Height(256)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(256);

    c.bench_function("randomized_prim_maze_256", move |b| {
        b.iter(|| generators::randomized_prim(&mut g, &mut rng, Cartesian2DCoordinate::new(128, 128)))
    });
}

criterion_group!(benches,
    bench_randomized_prim_maze_32,
    bench_recursive_backtracker_maze_32,
    bench_randomized_prim_maze_256
);
criterion_main!(benches);
