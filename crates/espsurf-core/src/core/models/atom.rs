use crate::core::utils::geometry::{centroid, scaled_sphere_bounds};
use nalgebra::Point3;

/// A sphere-like atom: a center and a radius in consistent length units.
///
/// Only geometry is carried. Element identity, bonding, and radii tables belong to the caller,
/// which is expected to resolve an appropriate radius (e.g. a van der Waals radius) per atom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Atom {
    /// The 3D coordinates of the atom center.
    pub position: Point3<f64>,
    /// The unscaled atomic radius.
    pub radius: f64,
}

impl Atom {
    pub fn new(position: Point3<f64>, radius: f64) -> Self {
        Self { position, radius }
    }

    /// Explains why this atom cannot be used to build a surface, if it cannot.
    ///
    /// # Return
    ///
    /// Returns `None` when the position is finite and the radius is finite and positive.
    pub fn invalid_reason(&self) -> Option<&'static str> {
        if !self.position.coords.iter().all(|c| c.is_finite()) {
            Some("position has a non-finite coordinate")
        } else if !self.radius.is_finite() {
            Some("radius is not finite")
        } else if self.radius <= 0.0 {
            Some("radius must be positive")
        } else {
            None
        }
    }
}

impl From<[f64; 4]> for Atom {
    fn from([x, y, z, radius]: [f64; 4]) -> Self {
        Self::new(Point3::new(x, y, z), radius)
    }
}

/// An ordered, immutable collection of atoms describing one conformer.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AtomSet {
    atoms: Vec<Atom>,
}

impl AtomSet {
    pub fn new(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    /// Builds a set from `(x, y, z, radius)` records.
    pub fn from_xyzr(records: &[[f64; 4]]) -> Self {
        records.iter().copied().map(Atom::from).collect()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    #[inline]
    pub fn atoms(&self) -> &[Atom] {
        &self.atoms
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Atom> {
        self.atoms.iter()
    }

    pub fn positions(&self) -> Vec<Point3<f64>> {
        self.atoms.iter().map(|atom| atom.position).collect()
    }

    /// The geometric centroid of the atom centers (radii are ignored).
    pub fn centroid(&self) -> Option<Point3<f64>> {
        centroid(&self.positions())
    }

    /// Component-wise bounds of every atom's sphere after multiplying its radius by `scale`.
    pub fn scaled_bounds(&self, scale: f64) -> Option<(Point3<f64>, Point3<f64>)> {
        scaled_sphere_bounds(
            self.atoms.iter().map(|atom| (atom.position, atom.radius)),
            scale,
        )
    }
}

impl FromIterator<Atom> for AtomSet {
    fn from_iter<T: IntoIterator<Item = Atom>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AtomSet {
    type Item = &'a Atom;
    type IntoIter = std::slice::Iter<'a, Atom>;

    fn into_iter(self) -> Self::IntoIter {
        self.atoms.iter()
    }
}
