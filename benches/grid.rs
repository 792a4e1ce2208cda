use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;
use rand_xorshift::XorShiftRng;
use tabletop_maze::{
    cells::Cartesian2DCoordinate,
    generators::GeneratorKind,
    grid::Grid,
    units::{Height, Width},
};

fn generated_grid(w: usize, h: usize) -> Grid {
    let mut g = Grid::new(Width(w), Height(h)).unwrap();
    let mut rng = XorShiftRng::seed_from_u64(7);
    GeneratorKind::RandomizedPrim.generate(&mut g, &mut rng, Cartesian2DCoordinate::new(0, 0)).unwrap();
    g
}

fn bench_grid_11(c: &mut Criterion) {
    c.bench_function("grid_11", |b| b.iter(|| Grid::new(Width(11), Height(11)).unwrap()));
}

fn bench_grid_500(c: &mut Criterion) {
    c.bench_function("grid_500", |b| b.iter(|| Grid::new(Width(500), Height(500)).unwrap()));
}

fn bench_neighbours_corner_of_grid(c: &mut Criterion) {
    let g = Grid::new(Width(11), Height(11)).unwrap();
    let corner = Cartesian2DCoordinate::new(0, 0);
    c.bench_function("neighbours_corner_of_grid", move |b| b.iter(|| g.neighbours(corner)));
}

fn bench_links_middle_of_maze(c: &mut Criterion) {
    let g = generated_grid(11, 11);
    let middle = Cartesian2DCoordinate::new(5, 5);
    c.bench_function("links_middle_of_maze", move |b| b.iter(|| g.links(middle)));
}

fn bench_is_perfect_maze_64(c: &mut Criterion) {
    let g = generated_grid(64, 64);
    c.bench_function("is_perfect_maze_64", move |b| b.iter(|| g.is_perfect_maze()));
}

fn bench_text_render_32(c: &mut Criterion) {
    let g = generated_grid(32, 32);
    c.bench_function("text_render_32", move |b| b.iter(|| g.to_string()));
}

criterion_group!(benches,
    bench_grid_11,
    bench_grid_500,
    bench_neighbours_corner_of_grid,
    bench_links_middle_of_maze,
    bench_is_perfect_maze_64,
    bench_text_render_32
);
criterion_main!(benches);
