//! Core state types for the sphere simulation.
//!
//! Defines the per-particle state, the system holding all particles,
//! and the frame clock that turns host timestamps into `dt` and an
//! FPS readout.

use nalgebra::Vector3;
use rand::Rng;

pub type NVec3 = Vector3<f64>;

/// Initial speeds are drawn up to this multiple of the box edge.
const SPAWN_SPEED_FACTOR: f64 = 5.0;

#[derive(Debug, Clone)]
pub struct Particle {
    pub x: NVec3, // position (sphere center)
    pub v: NVec3, // velocity
    pub radius: f64, // constant for the particle lifetime
    pub m: f64, // mass = radius^3 (uniform density)
    pub color: NVec3, // in [0,1]^3, renderer-only
}

impl Particle {
    /// Draw a random particle: radius uniform in `[min_radius, max_radius]`,
    /// position inside a sphere of radius `box_size / 2`, velocity up to
    /// `5 * box_size` in a random direction.
    pub fn random<R: Rng>(rng: &mut R, box_size: f64, min_radius: f64, max_radius: f64) -> Self {
        let radius = rng.gen_range(min_radius..=max_radius);
        Particle {
            x: rng.gen::<f64>() * 0.5 * box_size * random_direction(rng),
            v: rng.gen::<f64>() * SPAWN_SPEED_FACTOR * box_size * random_direction(rng),
            m: radius.powi(3),
            radius,
            color: NVec3::new(rng.gen(), rng.gen(), rng.gen()),
        }
    }
}

/// Normalized cube sample; slightly corner-biased, which is fine for
/// spawn directions.
fn random_direction<R: Rng>(rng: &mut R) -> NVec3 {
    NVec3::new(
        rng.gen::<f64>() - 0.5,
        rng.gen::<f64>() - 0.5,
        rng.gen::<f64>() - 0.5,
    )
    .normalize()
}

/// All live particles plus the simulation time and the radius bounds used
/// at the last population reset (the grid derives its cell size from them).
#[derive(Debug, Clone)]
pub struct System {
    pub particles: Vec<Particle>,
    pub t: f64, // time
    pub min_radius: f64,
    pub max_radius: f64,
}

impl System {
    pub fn empty() -> Self {
        System {
            particles: Vec::new(),
            t: 0.0,
            min_radius: 0.0,
            max_radius: 0.0,
        }
    }

    /// Replace the whole population atomically with `n` random particles.
    /// Radii shrink as `1 / sqrt(n)` so total occupied volume stays bounded.
    pub fn populate<R: Rng>(&mut self, rng: &mut R, n: u32, box_size: f64) {
        self.min_radius = 0.15 * box_size / f64::sqrt(n as f64);
        self.max_radius = 4.0 * self.min_radius;
        self.t = 0.0;
        self.particles.clear();
        for _ in 0..n {
            self.particles.push(Particle::random(
                rng,
                box_size,
                self.min_radius,
                self.max_radius,
            ));
        }
    }
}

/// Frame clock driven by the host's monotonically increasing timestamps
/// (seconds). The first frame after a reset has no previous timestamp, so
/// `advance` yields `dt = 0` for it.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    prev_time: f64,
    total_time: f64,
    total_frames: u32,
}

impl Clock {
    pub fn new() -> Clock {
        Clock {
            prev_time: 0.0,
            total_time: 0.0,
            total_frames: 0,
        }
    }

    pub fn reset(&mut self) {
        self.prev_time = 0.0;
        self.total_time = 0.0;
        self.total_frames = 0;
    }

    /// Consume a timestamp and return the elapsed `dt` since the previous
    /// frame (0 on the first frame).
    pub fn advance(&mut self, time: f64) -> f64 {
        let mut dt = 0.0;
        if self.prev_time > 0.0 {
            dt = time - self.prev_time;
            self.total_frames += 1;
        }
        self.total_time += dt;
        self.prev_time = time;
        dt
    }

    /// Running average frame rate; reports 60 until enough frames have
    /// elapsed for the average to be defined.
    pub fn fps(&self) -> f64 {
        let fps = self.total_frames as f64 / self.total_time;
        if fps.is_nan() {
            60.0
        } else {
            fps
        }
    }
}
