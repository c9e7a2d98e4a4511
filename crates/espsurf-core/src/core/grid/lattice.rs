use nalgebra::{Point3, Vector3};
use std::fmt;

/// Number of lattice points along each axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LatticeDims {
    pub nx: usize,
    pub ny: usize,
    pub nz: usize,
}

impl LatticeDims {
    pub const fn new(nx: usize, ny: usize, nz: usize) -> Self {
        Self { nx, ny, nz }
    }

    /// Total number of lattice points.
    ///
    /// Dims built by [`crate::core::grid::GridBuilder`] always fit. Hand-built dims should be
    /// checked with [`LatticeDims::checked_len`] first.
    #[inline]
    pub const fn len(&self) -> usize {
        self.nx * self.ny * self.nz
    }

    /// Total number of lattice points, or `None` if the product overflows `usize`.
    pub const fn checked_len(&self) -> Option<usize> {
        match self.nx.checked_mul(self.ny) {
            Some(plane) => plane.checked_mul(self.nz),
            None => None,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of points in one x-slab (all `y`, `z` for a fixed `x`).
    #[inline]
    pub const fn slab_len(&self) -> usize {
        self.ny * self.nz
    }

    /// Number of unit cells (groups of 8 neighboring points).
    pub const fn cell_count(&self) -> usize {
        self.nx.saturating_sub(1) * self.ny.saturating_sub(1) * self.nz.saturating_sub(1)
    }

    /// Maps lattice coordinates to the flat buffer index (z fastest).
    #[inline]
    pub const fn index(&self, x: usize, y: usize, z: usize) -> usize {
        z + y * self.nz + x * self.nz * self.ny
    }

    /// Inverse of [`LatticeDims::index`].
    #[inline]
    pub const fn coords(&self, index: usize) -> [usize; 3] {
        let slab = self.slab_len();
        let x = index / slab;
        let rest = index % slab;
        [x, rest / self.nz, rest % self.nz]
    }

    pub const fn as_array(&self) -> [usize; 3] {
        [self.nx, self.ny, self.nz]
    }
}

impl fmt::Display for LatticeDims {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.nx, self.ny, self.nz)
    }
}

/// A regular, axis-aligned lattice positioned in the molecule frame.
///
/// Lattice point `(x, y, z)` sits at `origin + spacing * (x, y, z)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Grid {
    origin: Point3<f64>,
    spacing: f64,
    dims: LatticeDims,
}

impl Grid {
    pub(crate) fn new(origin: Point3<f64>, spacing: f64, dims: LatticeDims) -> Self {
        Self {
            origin,
            spacing,
            dims,
        }
    }

    #[inline]
    pub fn origin(&self) -> Point3<f64> {
        self.origin
    }

    #[inline]
    pub fn spacing(&self) -> f64 {
        self.spacing
    }

    #[inline]
    pub fn dims(&self) -> LatticeDims {
        self.dims
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.dims.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.dims.is_empty()
    }

    /// Position of lattice point `(x, y, z)`.
    #[inline]
    pub fn point(&self, x: usize, y: usize, z: usize) -> Point3<f64> {
        Point3::new(
            self.origin.x + self.spacing * x as f64,
            self.origin.y + self.spacing * y as f64,
            self.origin.z + self.spacing * z as f64,
        )
    }

    /// Converts fractional lattice coordinates (one unit per spacing) into the molecule frame.
    #[inline]
    pub fn lattice_to_world(&self, lattice: &Point3<f64>) -> Point3<f64> {
        self.origin + lattice.coords * self.spacing
    }

    /// The lattice point opposite the origin.
    pub fn far_corner(&self) -> Point3<f64> {
        self.point(
            self.dims.nx.saturating_sub(1),
            self.dims.ny.saturating_sub(1),
            self.dims.nz.saturating_sub(1),
        )
    }

    /// `(origin, far_corner)`: the axis-aligned box spanned by the lattice points.
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        (self.origin, self.far_corner())
    }

    /// The midpoint of the lattice; for grids built around atoms this is their centroid.
    pub fn center(&self) -> Point3<f64> {
        let half_span = Vector3::new(
            self.dims.nx.saturating_sub(1) as f64,
            self.dims.ny.saturating_sub(1) as f64,
            self.dims.nz.saturating_sub(1) as f64,
        ) * (0.5 * self.spacing);
        self.origin + half_span
    }

    /// Every lattice point, in flat-index order.
    pub fn points(&self) -> impl Iterator<Item = Point3<f64>> + '_ {
        (0..self.len()).map(move |index| {
            let [x, y, z] = self.dims.coords(index);
            self.point(x, y, z)
        })
    }
}
