//! # Uniform grid broad phase (3D)
//!
//! This module implements the **uniform spatial grid** used to make pairwise
//! collision detection scale sub-quadratically. The goal is to replace the
//! naive `O(N²)` all-pairs candidate scan with an `O(N)` expected method for
//! a roughly uniform spatial distribution.
//!
//! ## Core concepts
//!
//! The cubic domain is partitioned into equal cells with edge length
//! `2 × max_radius` of the current population. Because no live sphere has a
//! diameter larger than one cell, any pair of spheres that can physically
//! overlap is always found by scanning the 3×3×3 block of cells around one
//! of them — no hierarchical structure (octree/BVH) is needed when all
//! radii share a bounded range.
//!
//! The grid is rebuilt from scratch every frame (populations and positions
//! change every frame), but the flat `Vec` of per-cell buckets is kept and
//! its backing storage reused, so steady-state rebuilds allocate nothing.

use super::states::{NVec3, Particle};

/// A uniform grid over `[-box/2, box/2]^3` holding, per cell, the indices
/// of the particles currently located there.
///
/// Cell coordinates are derived as
/// `floor((position[axis] + box/2) / cell_edge)` per axis; the integrator's
/// position-clamp invariant guarantees they land in `[0, dim - 1]` without
/// an explicit bounds check on the inputs.
pub struct UniformGrid {
    cells: Vec<Vec<usize>>, // flat [dim^3] buckets of particle indices
    dim: usize,             // cells per axis
    cell_edge: f64,
    half_box: f64,
}

impl UniformGrid {
    /// Create a grid for the given box and maximum particle radius.
    ///
    /// `cell_edge = 2 * max_radius` and `dim = floor(box / edge) + 1`.
    /// A degenerate edge (zero, or non-finite as produced by an empty
    /// population's radius bounds) collapses to a single cell.
    pub fn new(box_size: f64, max_radius: f64) -> Self {
        let cell_edge = 2.0 * max_radius;
        let dim = if cell_edge.is_finite() && cell_edge > 0.0 {
            (box_size / cell_edge).floor() as usize + 1
        } else {
            1
        };
        UniformGrid {
            cells: vec![Vec::new(); dim * dim * dim],
            dim,
            cell_edge,
            half_box: 0.5 * box_size,
        }
    }

    /// Cells per axis.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Re-bucket all particles from their current positions. O(n); clears
    /// the buckets but keeps their capacity across frames.
    pub fn rebuild(&mut self, particles: &[Particle]) {
        for cell in &mut self.cells {
            cell.clear();
        }
        for (idx, p) in particles.iter().enumerate() {
            let (i, j, k) = self.cell_of(&p.x);
            let flat = self.flat_index(i, j, k);
            self.cells[flat].push(idx);
        }
    }

    /// Cell coordinates for a position inside the box.
    pub fn cell_of(&self, pos: &NVec3) -> (usize, usize, usize) {
        (self.axis_index(pos.x), self.axis_index(pos.y), self.axis_index(pos.z))
    }

    fn axis_index(&self, x: f64) -> usize {
        // `as usize` saturates at 0 for negative inputs; the min covers the
        // +half_box boundary landing exactly on dim - 1.
        (((x + self.half_box) / self.cell_edge) as usize).min(self.dim - 1)
    }

    fn flat_index(&self, i: usize, j: usize, k: usize) -> usize {
        ((i * self.dim) + j) * self.dim + k
    }

    /// All particle indices in the 3×3×3 block of cells centered on `cell`,
    /// excluding out-of-bounds cells. Includes the center cell itself, so a
    /// particle's own index appears in its own neighborhood.
    pub fn neighborhood(
        &self,
        cell: (usize, usize, usize),
    ) -> impl Iterator<Item = usize> + '_ {
        let dim = self.dim as isize;
        let (ci, cj, ck) = (cell.0 as isize, cell.1 as isize, cell.2 as isize);
        (-1..=1_isize)
            .flat_map(move |di| {
                (-1..=1_isize).flat_map(move |dj| {
                    (-1..=1_isize).map(move |dk| (ci + di, cj + dj, ck + dk))
                })
            })
            .filter(move |&(i, j, k)| {
                i >= 0 && j >= 0 && k >= 0 && i < dim && j < dim && k < dim
            })
            .flat_map(move |(i, j, k)| {
                self.cells[self.flat_index(i as usize, j as usize, k as usize)]
                    .iter()
                    .copied()
            })
    }
}
