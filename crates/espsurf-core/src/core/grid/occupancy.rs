use super::field::ScalarField;
use super::lattice::{Grid, LatticeDims};
use crate::core::models::atom::AtomSet;
use nalgebra::Point3;
use thiserror::Error;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, PartialEq)]
pub enum FieldError {
    #[error("Field has {actual} values but the lattice has {expected} points")]
    ShapeMismatch { expected: usize, actual: usize },

    #[error("Shell radius scale must be positive and finite, got {0}")]
    InvalidScale(f64),
}

/// One atom's scaled shell, precomputed for the inside test.
#[derive(Debug, Clone, Copy)]
struct Shell {
    center: Point3<f64>,
    reach: f64,
    reach_sq: f64,
}

/// Binary occupancy over a lattice: `true` where a point lies strictly inside at least one
/// atom's scaled radius.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupancyField {
    dims: LatticeDims,
    occupied: Vec<bool>,
}

impl OccupancyField {
    /// Wraps a precomputed buffer laid out with [`LatticeDims::index`].
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] when the buffer length differs from `dims.len()`.
    pub fn from_values(dims: LatticeDims, occupied: Vec<bool>) -> Result<Self, FieldError> {
        if occupied.len() != dims.len() {
            return Err(FieldError::ShapeMismatch {
                expected: dims.len(),
                actual: occupied.len(),
            });
        }
        Ok(Self { dims, occupied })
    }

    pub fn empty(dims: LatticeDims) -> Self {
        Self {
            dims,
            occupied: vec![false; dims.len()],
        }
    }

    /// Rasterizes the atoms' shells (radius × `radius_scale`) over `grid`.
    ///
    /// # Errors
    ///
    /// Returns [`FieldError::InvalidScale`] for a non-positive or non-finite `radius_scale`.
    pub fn rasterize(grid: &Grid, atoms: &AtomSet, radius_scale: f64) -> Result<Self, FieldError> {
        Self::rasterize_with(grid, atoms, radius_scale, |_| {})
    }

    /// Like [`OccupancyField::rasterize`], calling `on_slab(x)` after each x-slab is filled.
    ///
    /// Slabs are independent. With the `parallel` feature they are filled on the rayon pool and
    /// `on_slab` may be called concurrently and out of order.
    #[instrument(skip_all, name = "occupancy_rasterize", fields(points = grid.len()))]
    pub fn rasterize_with<F>(
        grid: &Grid,
        atoms: &AtomSet,
        radius_scale: f64,
        on_slab: F,
    ) -> Result<Self, FieldError>
    where
        F: Fn(usize) + Sync,
    {
        if !(radius_scale.is_finite() && radius_scale > 0.0) {
            return Err(FieldError::InvalidScale(radius_scale));
        }

        let shells: Vec<Shell> = atoms
            .iter()
            .map(|atom| {
                let reach = atom.radius * radius_scale;
                Shell {
                    center: atom.position,
                    reach,
                    reach_sq: reach * reach,
                }
            })
            .collect();

        let dims = grid.dims();
        let mut occupied = vec![false; dims.len()];
        let slab_len = dims.slab_len();

        if slab_len > 0 {
            #[cfg(not(feature = "parallel"))]
            let slabs = occupied.chunks_mut(slab_len);

            #[cfg(feature = "parallel")]
            let slabs = occupied.par_chunks_mut(slab_len);

            slabs.enumerate().for_each(|(x, slab)| {
                fill_slab(grid, &shells, x, slab);
                on_slab(x);
            });
        }

        let field = Self { dims, occupied };
        debug!(
            occupied = field.occupied_count(),
            total = field.len(),
            "Occupancy field rasterized."
        );
        Ok(field)
    }

    #[inline]
    pub fn dims(&self) -> LatticeDims {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.occupied.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.occupied.is_empty()
    }

    #[inline]
    pub fn is_occupied(&self, x: usize, y: usize, z: usize) -> bool {
        self.occupied[self.dims.index(x, y, z)]
    }

    pub fn values(&self) -> &[bool] {
        &self.occupied
    }

    pub fn occupied_count(&self) -> usize {
        self.occupied.iter().filter(|&&inside| inside).count()
    }

    /// `true` when the field is uniformly empty or uniformly full, so no surface crosses it.
    pub fn is_degenerate(&self) -> bool {
        let count = self.occupied_count();
        count == 0 || count == self.len()
    }

    /// Whether any point on the outermost layer of the lattice is occupied.
    pub fn touches_boundary(&self) -> bool {
        let LatticeDims { nx, ny, nz } = self.dims;
        self.occupied.iter().enumerate().any(|(index, &inside)| {
            let [x, y, z] = self.dims.coords(index);
            inside
                && (x == 0 || y == 0 || z == 0 || x + 1 == nx || y + 1 == ny || z + 1 == nz)
        })
    }
}

impl ScalarField for OccupancyField {
    fn dims(&self) -> LatticeDims {
        self.dims
    }

    #[inline]
    fn value(&self, x: usize, y: usize, z: usize) -> f64 {
        if self.is_occupied(x, y, z) { 1.0 } else { 0.0 }
    }
}

fn fill_slab(grid: &Grid, shells: &[Shell], x: usize, slab: &mut [bool]) {
    let dims = grid.dims();
    let plane_x = grid.point(x, 0, 0).x;

    // A shell that cannot reach this x plane cannot contain any of its points.
    let nearby: Vec<&Shell> = shells
        .iter()
        .filter(|shell| (shell.center.x - plane_x).abs() < shell.reach)
        .collect();
    if nearby.is_empty() {
        return;
    }

    for y in 0..dims.ny {
        for z in 0..dims.nz {
            let point = grid.point(x, y, z);
            slab[dims.index(0, y, z)] = nearby
                .iter()
                .any(|shell| (point - shell.center).norm_squared() < shell.reach_sq);
        }
    }
}
