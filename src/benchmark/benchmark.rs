use std::time::Instant;

use crate::simulation::collisions::{resolve_collisions, resolve_collisions_direct};
use crate::simulation::grid::UniformGrid;
use crate::simulation::states::{NVec3, Particle, System};

const BOX_SIZE: f64 = 4.0;
const E_SPHERE: f64 = 0.9;

/// Helper to build a deterministic `System` of size `n`
/// (no rand needed; positions/radii from sin/cos so runs are repeatable)
fn make_system(n: usize) -> System {
    let min_radius = 0.15 * BOX_SIZE / f64::sqrt(n as f64);
    let max_radius = 4.0 * min_radius;

    let mut particles = Vec::with_capacity(n);
    for i in 0..n {
        let i_f = i as f64;

        let x = 0.45
            * BOX_SIZE
            * NVec3::new(
                (i_f * 0.37).sin(),
                (i_f * 0.13).cos(),
                (i_f * 0.07).sin(),
            );
        let v = BOX_SIZE
            * NVec3::new(
                (i_f * 0.29).cos(),
                (i_f * 0.19).sin(),
                (i_f * 0.11).cos(),
            );
        let radius = min_radius + (max_radius - min_radius) * (0.5 + 0.5 * (i_f * 0.61).sin());

        particles.push(Particle {
            x,
            v,
            m: radius.powi(3),
            radius,
            color: NVec3::new(0.5, 0.5, 0.5),
        });
    }

    System {
        particles,
        t: 0.0,
        min_radius,
        max_radius,
    }
}

/// Time one collision-resolution pass per broad phase at a few sizes
pub fn bench_broadphase() {
    // Different system sizes to test
    let ns = [200, 400, 800, 1600, 3200, 6400];

    for n in ns {
        let sys_template = make_system(n);

        // Direct all-pairs scan
        let mut sys_direct = sys_template.clone();

        // Warm up
        resolve_collisions_direct(&mut sys_direct, E_SPHERE);

        let mut sys_direct = sys_template.clone();
        let t0 = Instant::now();
        resolve_collisions_direct(&mut sys_direct, E_SPHERE);
        let dt_direct = t0.elapsed().as_secs_f64();

        // Uniform grid: rebuild + resolve, the per-frame cost
        let mut grid = UniformGrid::new(BOX_SIZE, sys_template.max_radius);
        let mut sys_grid = sys_template.clone();
        grid.rebuild(&sys_grid.particles);
        resolve_collisions(&mut sys_grid, &grid, E_SPHERE);

        let mut sys_grid = sys_template.clone();
        let t1 = Instant::now();
        grid.rebuild(&sys_grid.particles);
        resolve_collisions(&mut sys_grid, &grid, E_SPHERE);
        let dt_grid = t1.elapsed().as_secs_f64();

        println!("N = {n:5}, direct = {dt_direct:8.6} s, grid = {dt_grid:8.6} s");
    }
}

/// Timing curve over a range of n
/// Paste output directly into a spreadsheet to graph
pub fn bench_step_curve() {
    println!("N,direct_ms,grid_ms");

    // Steps of 200 to give a smoother graph
    for n in (200..=12800).step_by(200) {
        // Small n: average over a few passes to smooth noise
        // Large n: only 1 pass to keep the direct path from dominating runtime
        let passes_direct = if n <= 800 { 5 } else { 1 };
        let passes_grid = if n <= 2000 { 3 } else { 1 };

        let sys_template = make_system(n);

        let mut sys_direct = sys_template.clone();
        let t0 = Instant::now();
        for _ in 0..passes_direct {
            resolve_collisions_direct(&mut sys_direct, E_SPHERE);
        }
        let ms_direct = t0.elapsed().as_secs_f64() * 1000.0 / passes_direct as f64;

        let mut grid = UniformGrid::new(BOX_SIZE, sys_template.max_radius);
        let mut sys_grid = sys_template.clone();
        let t1 = Instant::now();
        for _ in 0..passes_grid {
            grid.rebuild(&sys_grid.particles);
            resolve_collisions(&mut sys_grid, &grid, E_SPHERE);
        }
        let ms_grid = t1.elapsed().as_secs_f64() * 1000.0 / passes_grid as f64;

        println!("{n},{ms_direct:.6},{ms_grid:.6}");
    }
}
