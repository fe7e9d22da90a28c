//! Benchmarks for the sweep kernel and the unknown update.
//!
//! Run with: `cargo bench --bench sweep_bench`

use criterion::{Criterion, black_box, criterion_group, criterion_main};

use swe_rs::{
    Block, BlockLayout, BoundaryType, EdgeBoundaries, FWaveSolver, RadialDamBreak,
};

fn make_block(n: usize) -> Block {
    let mut block = Block::new(BlockLayout {
        nx: n,
        ny: n,
        dx: 10.0,
        dy: 10.0,
        origin_x: 0.0,
        origin_y: 0.0,
        pos_x: 0,
        pos_y: 0,
        boundaries: EdgeBoundaries::uniform(BoundaryType::Wall),
    });
    block.init_scenario(&RadialDamBreak {
        center_x: n as f32 * 5.0,
        center_y: n as f32 * 5.0,
        radius: n as f32 * 1.5,
        ..RadialDamBreak::default()
    });
    block
}

fn bench_compute_fluxes(c: &mut Criterion) {
    let solver = FWaveSolver::default();
    let mut group = c.benchmark_group("compute_numerical_fluxes");

    for n in [64usize, 256] {
        let mut block = make_block(n);
        block.apply_boundary_conditions();
        group.bench_function(format!("{}x{}", n, n), |bench| {
            bench.iter(|| {
                let dt = block.compute_numerical_fluxes(black_box(&solver));
                black_box(dt);
            })
        });
    }
    group.finish();
}

fn bench_full_step(c: &mut Criterion) {
    let solver = FWaveSolver::default();
    let mut group = c.benchmark_group("full_step");

    for n in [64usize, 256] {
        let mut block = make_block(n);
        group.bench_function(format!("{}x{}", n, n), |bench| {
            bench.iter(|| {
                block.apply_boundary_conditions();
                let dt = block.compute_numerical_fluxes(black_box(&solver));
                block.update_unknowns(dt);
                black_box(block.max_timestep());
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_compute_fluxes, bench_full_step);
criterion_main!(benches);
