use ballsim::simulation::collisions::{resolve_collisions, resolve_pair};
use ballsim::simulation::forces::{AccelSet, LinearDrag, UniformGravity};
use ballsim::simulation::grid::UniformGrid;
use ballsim::simulation::integrator::euler_step;
use ballsim::simulation::params::Parameters;
use ballsim::simulation::scenario::Scenario;
use ballsim::simulation::states::{Clock, NVec3, Particle, System};
use ballsim::ScenarioConfig;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Build a particle with mass derived from its radius, color irrelevant
pub fn particle(x: [f64; 3], v: [f64; 3], radius: f64) -> Particle {
    Particle {
        x: x.into(),
        v: v.into(),
        m: radius.powi(3),
        radius,
        color: NVec3::new(0.5, 0.5, 0.5),
    }
}

/// Wrap particles into a System with consistent radius bounds
pub fn make_system(particles: Vec<Particle>) -> System {
    let max_radius = particles
        .iter()
        .map(|p| p.radius)
        .fold(0.0_f64, f64::max);
    System {
        particles,
        t: 0.0,
        min_radius: 0.0,
        max_radius,
    }
}

/// Default physics parameters for tests
pub fn test_params() -> Parameters {
    Parameters {
        n_particle: 50,
        box_size: 4.0,
        gravity: NVec3::new(0.0, 0.0, -9.80665),
        c_air: 0.05,
        e_wall: 0.6,
        e_sphere: 0.9,
        reset_delay: 5.0,
        seed: 42,
    }
}

/// Build a full Scenario from an inline YAML config
pub fn test_scenario(n_particle: u32) -> Scenario {
    let yaml = format!(
        "
engine:
  broad_phase: \"grid\"
parameters:
  n_particle: {n_particle}
  box_size: 4.0
  c_air: 0.05
  e_wall: 0.6
  e_sphere: 0.9
  reset_delay: 5.0
  seed: 42
"
    );
    let cfg: ScenarioConfig = serde_yaml::from_str(&yaml).expect("valid test config");
    Scenario::build_scenario(cfg)
}

/// Total momentum of a particle slice
fn momentum(particles: &[Particle]) -> NVec3 {
    particles
        .iter()
        .fold(NVec3::zeros(), |acc, p| acc + p.m * p.v)
}

/// Total kinetic energy of a particle slice
fn kinetic_energy(particles: &[Particle]) -> f64 {
    particles.iter().map(|p| 0.5 * p.m * p.v.norm_squared()).sum()
}

// ==================================================================================
// Force tests
// ==================================================================================

#[test]
fn gravity_is_uniform_and_mass_independent() {
    let sys = make_system(vec![
        particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.1),
        particle([1.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.4),
    ]);
    let g = NVec3::new(0.0, 0.0, -9.80665);
    let forces = AccelSet::new().with(UniformGravity { g });

    let mut acc = vec![Default::default(); 2];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    assert!((acc[0] - g).norm() < 1e-12);
    assert!((acc[1] - g).norm() < 1e-12, "gravity must not depend on mass");
}

#[test]
fn drag_opposes_velocity() {
    let radius = 0.2;
    let sys = make_system(vec![particle([0.0, 0.0, 0.0], [3.0, -1.0, 2.0], radius)]);
    let forces = AccelSet::new().with(LinearDrag { c_air: 0.05 });

    let mut acc = vec![Default::default(); 1];
    forces.accumulate_accels(sys.t, &sys, &mut acc);

    let v = sys.particles[0].v;
    let expected = -0.05 * (radius * radius / radius.powi(3)) * v;
    assert!((acc[0] - expected).norm() < 1e-12);
    assert!(acc[0].dot(&v) < 0.0, "drag must oppose motion");
}

// ==================================================================================
// Integrator tests
// ==================================================================================

#[test]
fn positions_advance_with_pre_update_velocity() {
    let mut sys = make_system(vec![particle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1)]);
    let mut params = test_params();
    params.e_wall = 1.0;
    let forces = AccelSet::new(); // no forces: velocity stays, position drifts

    euler_step(&mut sys, &forces, &params, 1.0);

    assert!((sys.particles[0].x - NVec3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
    assert!((sys.particles[0].v - NVec3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
    assert!((sys.t - 1.0).abs() < 1e-12);
}

#[test]
fn wall_reflection_scales_by_restitution() {
    let mut sys = make_system(vec![particle([1.9, 0.0, 0.0], [1.0, 0.0, 0.0], 0.2)]);
    let params = test_params(); // box 4, e_wall 0.6
    let forces = AccelSet::new();

    euler_step(&mut sys, &forces, &params, 0.01);

    let v = sys.particles[0].v;
    assert!((v.x + 0.6).abs() < 1e-12, "expected -e_wall * v_x, got {}", v.x);
}

#[test]
fn drag_acts_on_the_gravity_updated_velocity() {
    // Gravity kicks first; drag then damps the velocity it produced within
    // the same step, not the pre-kick one
    let c_air = 0.5;
    let mut sys = make_system(vec![particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 1.0)]);
    let params = test_params();
    let forces = AccelSet::new()
        .with(UniformGravity { g: params.gravity })
        .with(LinearDrag { c_air });

    euler_step(&mut sys, &forces, &params, 1.0);

    // With r = m = 1 and dt = 1: v_z = g dt, damped by the factor (1 - c_air)
    let expected = -9.80665 * (1.0 - c_air);
    let v = sys.particles[0].v;
    assert!((v.z - expected).abs() < 1e-12, "expected {}, got {}", expected, v.z);
}

#[test]
fn containment_holds_under_extreme_velocities() {
    let params = test_params();
    let half = params.half_box();
    let forces = AccelSet::new()
        .with(UniformGravity { g: params.gravity })
        .with(LinearDrag { c_air: params.c_air });

    let mut sys = make_system(vec![
        particle([0.0, 0.0, 0.0], [500.0, -300.0, 800.0], 0.1),
        particle([1.0, -1.0, 1.0], [-900.0, 700.0, -400.0], 0.2),
    ]);

    for _ in 0..1000 {
        euler_step(&mut sys, &forces, &params, 0.016);
        for p in &sys.particles {
            for i in 0..3 {
                assert!(
                    p.x[i] >= -half && p.x[i] <= half,
                    "particle escaped the box: {:?}",
                    p.x
                );
            }
        }
    }
}

#[test]
fn bounce_decays_toward_floor_and_stays_inside() {
    let mut params = test_params();
    params.e_wall = 0.5;
    let half = params.half_box();
    let forces = AccelSet::new().with(UniformGravity { g: params.gravity });

    let mut sys = make_system(vec![particle([0.0, 0.0, 0.0], [0.0, 0.0, 0.0], 0.1)]);

    for _ in 0..100 {
        euler_step(&mut sys, &forces, &params, 1.0);
        let p = &sys.particles[0];
        assert!(p.x.z >= -half && p.x.z <= half, "escaped: {}", p.x.z);
    }
}

#[test]
fn empty_system_step_is_noop() {
    let mut sys = System::empty();
    let params = test_params();
    let forces = AccelSet::new().with(UniformGravity { g: params.gravity });
    euler_step(&mut sys, &forces, &params, 0.016);
    assert!(sys.particles.is_empty());
}

// ==================================================================================
// Grid tests
// ==================================================================================

#[test]
fn grid_cell_indices_stay_in_bounds() {
    let grid = UniformGrid::new(4.0, 0.3);
    let dim = grid.dim();

    // corners and face centers, including the +half boundary exactly
    for &x in &[-2.0, -1.0, 0.0, 1.0, 2.0] {
        for &y in &[-2.0, 0.0, 2.0] {
            for &z in &[-2.0, 0.0, 2.0] {
                let (i, j, k) = grid.cell_of(&NVec3::new(x, y, z));
                assert!(i < dim && j < dim && k < dim);
            }
        }
    }
}

#[test]
fn grid_finds_every_overlapping_pair() {
    let mut rng = StdRng::seed_from_u64(7);
    let box_size = 4.0;
    let max_radius = 0.3;

    let particles: Vec<Particle> = (0..200)
        .map(|_| {
            let pos = [
                rng.gen_range(-2.0..=2.0),
                rng.gen_range(-2.0..=2.0),
                rng.gen_range(-2.0..=2.0),
            ];
            particle(pos, [0.0, 0.0, 0.0], rng.gen_range(0.075..=max_radius))
        })
        .collect();

    let mut grid = UniformGrid::new(box_size, max_radius);
    grid.rebuild(&particles);

    // Brute-force oracle: every overlapping pair must be reachable from
    // either endpoint's 3x3x3 neighborhood
    for i in 0..particles.len() {
        for j in (i + 1)..particles.len() {
            let d = particles[j].x - particles[i].x;
            if d.norm() > particles[i].radius + particles[j].radius {
                continue;
            }
            let from_i: Vec<usize> = grid.neighborhood(grid.cell_of(&particles[i].x)).collect();
            let from_j: Vec<usize> = grid.neighborhood(grid.cell_of(&particles[j].x)).collect();
            assert!(from_i.contains(&j), "broad phase missed pair ({i}, {j})");
            assert!(from_j.contains(&i), "broad phase missed pair ({j}, {i})");
        }
    }
}

#[test]
fn grid_handles_empty_population() {
    // reset(0) produces non-finite radius bounds; the grid must degrade to
    // a single cell instead of exploding
    let mut grid = UniformGrid::new(4.0, f64::INFINITY);
    assert_eq!(grid.dim(), 1);
    grid.rebuild(&[]);
    assert_eq!(grid.neighborhood((0, 0, 0)).count(), 0);
}

// ==================================================================================
// Collision tests
// ==================================================================================

#[test]
fn head_on_equal_mass_swap() {
    // Equal masses, e = 1: axis-aligned velocity components swap
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 1.0),
        particle([1.5, 0.0, 0.0], [-1.0, 0.0, 0.0], 1.0),
    ];

    resolve_pair(&mut particles, 0, 1, 1.0);

    assert!((particles[0].v - NVec3::new(-1.0, 0.0, 0.0)).norm() < 1e-12);
    assert!((particles[1].v - NVec3::new(1.0, 0.0, 0.0)).norm() < 1e-12);
}

#[test]
fn collision_conserves_momentum() {
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [2.0, 1.0, -0.5], 0.3),
        particle([0.4, 0.1, 0.0], [-1.0, 0.5, 0.2], 0.2),
    ];
    let before = momentum(&particles);

    resolve_pair(&mut particles, 0, 1, 0.9);

    let after = momentum(&particles);
    assert!(
        (after - before).norm() < 1e-12,
        "momentum drift: {:?}",
        after - before
    );
}

#[test]
fn inelastic_collision_loses_kinetic_energy() {
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], 0.3),
        particle([0.4, 0.0, 0.0], [-1.0, 0.0, 0.0], 0.2),
    ];
    let before = kinetic_energy(&particles);

    resolve_pair(&mut particles, 0, 1, 0.5);

    let after = kinetic_energy(&particles);
    assert!(after < before, "expected energy loss: {before} -> {after}");
}

#[test]
fn elastic_collision_preserves_kinetic_energy() {
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [2.0, 0.0, 0.0], 0.3),
        particle([0.4, 0.0, 0.0], [-1.0, 0.0, 0.0], 0.2),
    ];
    let before = kinetic_energy(&particles);

    resolve_pair(&mut particles, 0, 1, 1.0);

    let after = kinetic_energy(&particles);
    assert!((after - before).abs() < 1e-12);
}

#[test]
fn separating_pair_is_left_untouched() {
    // Overlapping but moving apart: closing speed <= 0, no impulse
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 0.3),
        particle([0.4, 0.0, 0.0], [1.0, 0.0, 0.0], 0.2),
    ];
    let (v1, v2) = (particles[0].v, particles[1].v);

    resolve_pair(&mut particles, 0, 1, 0.9);

    assert_eq!(particles[0].v, v1);
    assert_eq!(particles[1].v, v2);
}

#[test]
fn non_overlapping_pair_is_left_untouched() {
    let mut particles = vec![
        particle([0.0, 0.0, 0.0], [1.0, 0.0, 0.0], 0.1),
        particle([1.0, 0.0, 0.0], [-1.0, 0.0, 0.0], 0.1),
    ];
    let (v1, v2) = (particles[0].v, particles[1].v);

    resolve_pair(&mut particles, 0, 1, 0.9);

    assert_eq!(particles[0].v, v1);
    assert_eq!(particles[1].v, v2);
}

#[test]
fn coincident_centers_apply_no_impulse() {
    // Two distinct particles stacked on the same point have no contact
    // normal; their velocities must stay finite and untouched
    let mut particles = vec![
        particle([0.5, 0.5, 0.5], [1.0, 0.0, 0.0], 0.2),
        particle([0.5, 0.5, 0.5], [-1.0, 0.0, 0.0], 0.3),
    ];
    let (v1, v2) = (particles[0].v, particles[1].v);

    resolve_pair(&mut particles, 0, 1, 0.9);

    assert!(particles[0].v.iter().all(|c| c.is_finite()));
    assert_eq!(particles[0].v, v1);
    assert_eq!(particles[1].v, v2);
}

#[test]
fn no_self_collision_through_the_grid() {
    // A lone particle shares its cell with itself; resolution must not
    // apply any impulse against it
    let mut sys = make_system(vec![particle([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], 0.3)]);
    let mut grid = UniformGrid::new(4.0, sys.max_radius);
    grid.rebuild(&sys.particles);

    resolve_collisions(&mut sys, &grid, 0.9);

    assert_eq!(sys.particles[0].v, NVec3::new(1.0, 2.0, 3.0));
}

#[test]
fn grid_resolution_matches_direct_on_a_colliding_pair() {
    let pair = vec![
        particle([-0.2, 0.0, 0.0], [1.0, 0.0, 0.0], 0.3),
        particle([0.2, 0.0, 0.0], [-1.0, 0.0, 0.0], 0.2),
    ];

    let mut sys_grid = make_system(pair.clone());
    let mut grid = UniformGrid::new(4.0, sys_grid.max_radius);
    grid.rebuild(&sys_grid.particles);
    resolve_collisions(&mut sys_grid, &grid, 0.9);

    let mut direct = pair;
    resolve_pair(&mut direct, 0, 1, 0.9);

    for (a, b) in sys_grid.particles.iter().zip(direct.iter()) {
        assert!((a.v - b.v).norm() < 1e-12);
    }
}

// ==================================================================================
// Clock tests
// ==================================================================================

#[test]
fn first_frame_has_zero_dt() {
    let mut clock = Clock::new();
    assert_eq!(clock.advance(0.5), 0.0);
    assert!((clock.advance(0.6) - 0.1).abs() < 1e-12);
}

#[test]
fn fps_counts_frames_over_elapsed_time() {
    let mut clock = Clock::new();
    clock.advance(1.0);
    clock.advance(2.0);
    clock.advance(3.0);
    // two measured frames over two seconds
    assert!((clock.fps() - 1.0).abs() < 1e-12);
}

#[test]
fn fps_defaults_before_any_frame() {
    let clock = Clock::new();
    assert_eq!(clock.fps(), 60.0);
}

// ==================================================================================
// Scenario / reset tests
// ==================================================================================

#[test]
fn config_parses_and_builds() {
    let scenario = test_scenario(50);
    assert_eq!(scenario.system.particles.len(), 50);
    assert_eq!(scenario.parameters.box_size, 4.0);
    assert_eq!(scenario.parameters.e_sphere, 0.9);
    // gravity omitted from the YAML: standard gravity along -z
    assert!((scenario.parameters.gravity.z + 9.80665).abs() < 1e-12);
}

#[test]
fn reset_scales_radii_with_population() {
    let mut scenario = test_scenario(50);
    scenario.reset(100);

    let min_radius = 0.15 * 4.0 / f64::sqrt(100.0);
    let max_radius = 4.0 * min_radius;

    assert_eq!(scenario.system.particles.len(), 100);
    for p in &scenario.system.particles {
        assert!(p.radius >= min_radius && p.radius <= max_radius);
        assert!((p.m - p.radius.powi(3)).abs() < 1e-12);
        for c in 0..3 {
            assert!(p.color[c] >= 0.0 && p.color[c] <= 1.0);
        }
    }
}

#[test]
fn reset_replaces_population_atomically_and_bumps_generation() {
    let mut scenario = test_scenario(20);
    let generation = scenario.generation;

    scenario.reset(30);

    assert_eq!(scenario.system.particles.len(), 30);
    assert_eq!(scenario.generation, generation + 1);
    assert_eq!(scenario.parameters.n_particle, 30);
}

#[test]
fn reset_zero_yields_empty_noop_simulation() {
    let mut scenario = test_scenario(10);
    scenario.reset(0);
    assert!(scenario.system.particles.is_empty());

    // The whole per-frame pipeline must degrade to a no-op without error
    for frame in 0..10 {
        scenario.advance(frame as f64 * 0.016);
    }
    assert!(scenario.system.particles.is_empty());
}

#[test]
fn advance_keeps_every_particle_inside_the_box() {
    let mut scenario = test_scenario(80);
    let half = scenario.parameters.half_box();

    for frame in 1..=300 {
        scenario.advance(frame as f64 * 0.016);
    }
    for p in &scenario.system.particles {
        for i in 0..3 {
            assert!(p.x[i] >= -half && p.x[i] <= half);
        }
    }
}

#[test]
fn seeded_scenarios_reproduce_identically() {
    let mut a = test_scenario(40);
    let mut b = test_scenario(40);

    for frame in 1..=60 {
        let t = frame as f64 * 0.016;
        a.advance(t);
        b.advance(t);
    }
    for (pa, pb) in a.system.particles.iter().zip(b.system.particles.iter()) {
        assert_eq!(pa.x, pb.x);
        assert_eq!(pa.v, pb.v);
    }
}
