//! Bevy 3D viewer for a running [`Scenario`]
//!
//! Presentation plumbing only: it owns the frame loop and the periodic
//! reset timer the core depends on, and otherwise just reads particle
//! positions, radii, and colors each frame and draws one sphere per
//! particle. Simulation coordinates are Z-up (gravity along -z), Bevy is
//! Y-up, so sim `(x, y, z)` maps to screen `(x, z, y)`.

use bevy::prelude::*;
use bevy::math::primitives::{Cuboid, Sphere};
use log::info;

use crate::simulation::scenario::Scenario;

/// Component tagging each sphere with its particle index into Scenario.system.particles
#[derive(Component)]
struct ParticleIndex(pub usize);

/// Marker for the FPS/particle-count overlay text
#[derive(Component)]
struct StatsText;

/// Deadline for the next automatic population reset, in `Time::elapsed`
/// seconds. Manual resets overwrite it, which is the cancel-then-reschedule
/// semantics: at most one pending reset exists at any time.
#[derive(Resource)]
struct ResetTimer {
    next_reset_at: f64,
}

/// World-space -> screen-space scaling factor for positions and radii
const SCALE3D: f32 = 50.0;

/// Thickness of the container edge beams
const EDGE_THICKNESS: f32 = 0.6;

/// How many particles the Up/Down keys add or remove per press
const COUNT_STEP: u32 = 10;

/// Entrypoint: hand a built scenario to Bevy and run the viewer
pub fn run_3d(scenario: Scenario) {
    info!(
        "run_3d: starting Bevy 3D viewer with {} particles",
        scenario.system.particles.len()
    );

    let reset_delay = scenario.parameters.reset_delay;

    App::new()
        .insert_resource(scenario)
        .insert_resource(ResetTimer {
            next_reset_at: reset_delay,
        })
        .add_plugins(DefaultPlugins)
        .add_systems(Startup, setup_3d)
        .add_systems(
            Update,
            (
                physics_step_3d,
                handle_count_keys,
                respawn_particles,
                sync_transforms_3d,
                update_stats_text,
            )
                .chain(),
        )
        .run();
}

/// Startup system: spawn camera, light, container edges, and the overlay text
fn setup_3d(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
) {
    let half = scenario.parameters.half_box() as f32 * SCALE3D;

    // Camera looking at the box center from outside a corner
    commands.spawn(Camera3dBundle {
        camera: Camera {
            clear_color: ClearColorConfig::Custom(Color::srgb(0.4, 0.4, 0.4)),
            ..Default::default()
        },
        transform: Transform::from_xyz(2.2 * half, 1.6 * half, 2.2 * half)
            .looking_at(Vec3::ZERO, Vec3::Y),
        ..Default::default()
    });

    // Basic point light
    commands.spawn(PointLightBundle {
        point_light: PointLight {
            intensity: 1500.0,
            range: 10.0 * half,
            ..Default::default()
        },
        transform: Transform::from_xyz(half, 2.0 * half, 2.0 * half),
        ..Default::default()
    });

    spawn_box_edges(&mut commands, &mut meshes, &mut materials, half);

    // FPS / particle-count overlay
    commands.spawn((
        TextBundle::from_section(
            "",
            TextStyle {
                font_size: 20.0,
                color: Color::WHITE,
                ..Default::default()
            },
        )
        .with_style(Style {
            position_type: PositionType::Absolute,
            top: Val::Px(8.0),
            left: Val::Px(8.0),
            ..Default::default()
        }),
        StatsText,
    ));
}

/// The 12 edges of the container cube as thin beams
fn spawn_box_edges(
    commands: &mut Commands,
    meshes: &mut Assets<Mesh>,
    materials: &mut Assets<StandardMaterial>,
    half: f32,
) {
    let material = materials.add(StandardMaterial {
        base_color: Color::srgb(0.9, 0.9, 0.9),
        unlit: true,
        ..Default::default()
    });

    let t = EDGE_THICKNESS;
    let along_x = meshes.add(Cuboid::new(2.0 * half, t, t));
    let along_y = meshes.add(Cuboid::new(t, 2.0 * half, t));
    let along_z = meshes.add(Cuboid::new(t, t, 2.0 * half));

    for &a in &[-half, half] {
        for &b in &[-half, half] {
            commands.spawn(PbrBundle {
                mesh: along_x.clone(),
                material: material.clone(),
                transform: Transform::from_xyz(0.0, a, b),
                ..Default::default()
            });
            commands.spawn(PbrBundle {
                mesh: along_y.clone(),
                material: material.clone(),
                transform: Transform::from_xyz(a, 0.0, b),
                ..Default::default()
            });
            commands.spawn(PbrBundle {
                mesh: along_z.clone(),
                material: material.clone(),
                transform: Transform::from_xyz(a, b, 0.0),
                ..Default::default()
            });
        }
    }
}

/// Per-frame pipeline: fire the periodic reset when its deadline passes,
/// then advance the simulation with the host timestamp
fn physics_step_3d(
    mut scenario: ResMut<Scenario>,
    mut timer: ResMut<ResetTimer>,
    time: Res<Time>,
) {
    let timestamp = time.elapsed_seconds_f64();

    if timestamp >= timer.next_reset_at {
        scenario.repeat();
        timer.next_reset_at = timestamp + scenario.parameters.reset_delay;
    }

    scenario.advance(timestamp);
}

/// Up/Down arrows change the particle count, which is a manual reset and
/// reschedules the pending automatic one
fn handle_count_keys(
    keys: Res<ButtonInput<KeyCode>>,
    mut scenario: ResMut<Scenario>,
    mut timer: ResMut<ResetTimer>,
    time: Res<Time>,
) {
    let current = scenario.parameters.n_particle;
    let target = if keys.just_pressed(KeyCode::ArrowUp) {
        Some(current + COUNT_STEP)
    } else if keys.just_pressed(KeyCode::ArrowDown) {
        Some(current.saturating_sub(COUNT_STEP))
    } else {
        None
    };

    if let Some(n) = target {
        scenario.reset(n);
        timer.next_reset_at = time.elapsed_seconds_f64() + scenario.parameters.reset_delay;
    }
}

/// Population resets replace the particle set wholesale, so the sphere
/// entities are torn down and respawned whenever the generation changes
fn respawn_particles(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    scenario: Res<Scenario>,
    existing: Query<Entity, With<ParticleIndex>>,
    mut spawned_generation: Local<u64>,
) {
    if *spawned_generation == scenario.generation {
        return;
    }
    *spawned_generation = scenario.generation;

    for entity in &existing {
        commands.entity(entity).despawn();
    }

    for (i, p) in scenario.system.particles.iter().enumerate() {
        let radius_screen = (p.radius as f32).max(0.02) * SCALE3D;

        commands.spawn((
            PbrBundle {
                mesh: meshes.add(Sphere::new(radius_screen)),
                material: materials.add(StandardMaterial {
                    base_color: Color::srgb(
                        p.color.x as f32,
                        p.color.y as f32,
                        p.color.z as f32,
                    ),
                    unlit: true,
                    ..Default::default()
                }),
                transform: Transform::from_translation(to_screen(&p.x)),
                ..Default::default()
            },
            ParticleIndex(i),
        ));
    }
}

fn sync_transforms_3d(
    scenario: Res<Scenario>,
    mut query: Query<(&ParticleIndex, &mut Transform)>,
) {
    for (ParticleIndex(i), mut transform) in &mut query {
        if let Some(p) = scenario.system.particles.get(*i) {
            transform.translation = to_screen(&p.x);
        }
    }
}

fn update_stats_text(scenario: Res<Scenario>, mut query: Query<&mut Text, With<StatsText>>) {
    for mut text in &mut query {
        text.sections[0].value = format!(
            "FPS: {:.2}\nparticles: {} (Up/Down to change)",
            scenario.fps(),
            scenario.parameters.n_particle,
        );
    }
}

/// Sim coordinates (Z-up) to screen coordinates (Y-up), scaled
fn to_screen(x: &crate::simulation::states::NVec3) -> Vec3 {
    Vec3::new(
        (x.x as f32) * SCALE3D,
        (x.z as f32) * SCALE3D,
        (x.y as f32) * SCALE3D,
    )
}
