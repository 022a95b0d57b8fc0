//! Narrow-phase collision resolution
//!
//! Tests candidate pairs for sphere-sphere overlap and applies an
//! impulse-based elastic response along the contact normal. Candidates come
//! either from the uniform-grid broad phase or from a direct all-pairs scan
//! (kept as the slow path and as the oracle the grid is tested against)

use super::grid::UniformGrid;
use super::states::{Particle, System};

/// Resolve one candidate pair `(i, j)`, `i != j`, in place.
///
/// Rejects non-overlapping pairs and pairs that are separating or
/// tangential (`closing speed <= 0`), so resting contact is not re-kicked
/// frame after frame. On overlap with positive closing speed, applies the
/// mass-weighted impulse with restitution `e_sphere`:
///
///   v1 -= m2/(m1+m2) * (1+e) * s * d
///   v2 += m1/(m1+m2) * (1+e) * s * d
///
/// Momentum is conserved exactly for any `e`; kinetic energy along the
/// normal is non-increasing for `e < 1` and preserved at `e = 1`.
pub fn resolve_pair(particles: &mut [Particle], i: usize, j: usize, e_sphere: f64) {
    debug_assert!(i != j, "a particle cannot collide with itself");
    let (lo, hi) = if i < j { (i, j) } else { (j, i) };
    let (head, tail) = particles.split_at_mut(hi);
    let (p1, p2) = if i < j {
        (&mut head[lo], &mut tail[0])
    } else {
        (&mut tail[0], &mut head[lo])
    };

    let mut d = p2.x - p1.x;
    let dist = d.norm();
    if dist > p1.radius + p2.radius {
        return; // no overlap
    }
    if dist == 0.0 {
        return; // coincident centers, no usable contact normal
    }
    d.normalize_mut();

    // Closing speed along the contact normal
    let s = p1.v.dot(&d) - p2.v.dot(&d);
    if s <= 0.0 {
        return; // separating or tangential
    }

    let w1 = p2.m / (p1.m + p2.m);
    let w2 = p1.m / (p1.m + p2.m);
    p1.v -= w1 * (1.0 + e_sphere) * s * d;
    p2.v += w2 * (1.0 + e_sphere) * s * d;
}

/// Grid broad phase: for each particle, candidates are the occupants of its
/// 3×3×3 cell neighborhood. Each unordered pair is resolved exactly once
/// per frame (the `j > i` filter); the filter also makes self-pairs
/// impossible even though a particle's own cell is scanned.
pub fn resolve_collisions(sys: &mut System, grid: &UniformGrid, e_sphere: f64) {
    for i in 0..sys.particles.len() {
        let cell = grid.cell_of(&sys.particles[i].x);
        for j in grid.neighborhood(cell) {
            if j <= i {
                continue;
            }
            resolve_pair(&mut sys.particles, i, j, e_sphere);
        }
    }
}

/// Direct O(n²) scan over all unordered pairs. Reference implementation for
/// tests and benchmarks, and the `broad_phase: direct` engine option.
pub fn resolve_collisions_direct(sys: &mut System, e_sphere: f64) {
    let n = sys.particles.len();
    for i in 0..n {
        for j in (i + 1)..n {
            resolve_pair(&mut sys.particles, i, j, e_sphere);
        }
    }
}
