use super::lattice::{Grid, LatticeDims};
use crate::core::models::atom::AtomSet;
use nalgebra::Point3;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error, PartialEq)]
pub enum GridError {
    #[error("Cannot build a grid around an empty atom set")]
    EmptyInput,

    #[error("Grid spacing must be positive and finite, got {0}")]
    InvalidSpacing(f64),

    #[error("Scale '{name}' must be positive and finite, got {value}")]
    InvalidScale { name: &'static str, value: f64 },

    #[error("Atom {index} is invalid: {reason}")]
    InvalidAtom { index: usize, reason: &'static str },

    #[error(
        "A {:.0} x {:.0} x {:.0} lattice exceeds the limit of {limit} points",
        .counts[0], .counts[1], .counts[2]
    )]
    LatticeTooLarge { counts: [f64; 3], limit: usize },
}

/// Upper bound on the number of lattice points a [`GridBuilder`] will lay out.
pub const MAX_LATTICE_POINTS: usize = u32::MAX as usize;

/// Sizes and positions a [`Grid`] around an atom set.
///
/// Every atom sphere, with its radius multiplied by `margin_scale`, is enclosed. The lattice is
/// centered on the centroid of the atom centers (not on the bounding-box center), so the result
/// does not depend on atom order, and each axis has an odd number of points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridBuilder {
    spacing: f64,
    margin_scale: f64,
}

impl GridBuilder {
    pub fn new(spacing: f64, margin_scale: f64) -> Self {
        Self {
            spacing,
            margin_scale,
        }
    }

    /// Number of points needed along one axis to cover `extent` symmetrically.
    ///
    /// Always odd: `2 * ceil(extent / spacing / 2) + 1`. Returns `None` when that count exceeds
    /// [`MAX_LATTICE_POINTS`].
    #[inline]
    pub fn axis_point_count(extent: f64, spacing: f64) -> Option<usize> {
        count_within_limit(raw_axis_count(extent, spacing))
    }

    /// Builds the grid.
    ///
    /// The bounding-box formula sizes each axis by `hi - lo`, the extent of the padded spheres.
    /// This builder instead uses twice the larger of the two distances from the centroid to the
    /// padded bounds, `2 * max(centroid - lo, hi - centroid)`. When the centroid sits at the
    /// bounding-box center the two agree. Otherwise `hi - lo` would leave part of the molecule
    /// outside a centroid-centered lattice, and the wider extent keeps every padded sphere
    /// covered.
    ///
    /// # Errors
    ///
    /// Returns a [`GridError`] for an empty atom set, a non-positive spacing or margin scale, or an
    /// atom with a non-finite coordinate or non-positive radius. Returns
    /// [`GridError::LatticeTooLarge`] when the lattice would hold more than
    /// [`MAX_LATTICE_POINTS`] points. Nothing is allocated on failure.
    pub fn build(&self, atoms: &AtomSet) -> Result<Grid, GridError> {
        self.validate(atoms)?;

        let (Some(centroid), Some((lower, upper))) =
            (atoms.centroid(), atoms.scaled_bounds(self.margin_scale))
        else {
            return Err(GridError::EmptyInput);
        };

        let mut raw_counts = [0.0f64; 3];
        for axis in 0..3 {
            let half_extent = (centroid[axis] - lower[axis]).max(upper[axis] - centroid[axis]);
            raw_counts[axis] = raw_axis_count(2.0 * half_extent, self.spacing);
        }
        let dims = checked_dims(raw_counts).ok_or(GridError::LatticeTooLarge {
            counts: raw_counts,
            limit: MAX_LATTICE_POINTS,
        })?;

        let counts = dims.as_array();
        let origin: [f64; 3] = std::array::from_fn(|axis| {
            centroid[axis] - self.spacing * (counts[axis] - 1) as f64 / 2.0
        });
        let grid = Grid::new(Point3::from(origin), self.spacing, dims);

        debug!(
            atoms = atoms.len(),
            spacing = self.spacing,
            margin_scale = self.margin_scale,
            dims = %dims,
            points = dims.len(),
            "Grid built."
        );
        Ok(grid)
    }

    fn validate(&self, atoms: &AtomSet) -> Result<(), GridError> {
        if atoms.is_empty() {
            return Err(GridError::EmptyInput);
        }
        if !(self.spacing.is_finite() && self.spacing > 0.0) {
            return Err(GridError::InvalidSpacing(self.spacing));
        }
        if !(self.margin_scale.is_finite() && self.margin_scale > 0.0) {
            return Err(GridError::InvalidScale {
                name: "margin_scale",
                value: self.margin_scale,
            });
        }
        if let Some((index, reason)) = atoms
            .iter()
            .enumerate()
            .find_map(|(i, atom)| atom.invalid_reason().map(|reason| (i, reason)))
        {
            return Err(GridError::InvalidAtom { index, reason });
        }
        Ok(())
    }
}

fn raw_axis_count(extent: f64, spacing: f64) -> f64 {
    2.0 * (extent / spacing / 2.0).ceil() + 1.0
}

fn count_within_limit(count: f64) -> Option<usize> {
    (count.is_finite() && count <= MAX_LATTICE_POINTS as f64).then_some(count as usize)
}

fn checked_dims([nx, ny, nz]: [f64; 3]) -> Option<LatticeDims> {
    let dims = LatticeDims::new(
        count_within_limit(nx)?,
        count_within_limit(ny)?,
        count_within_limit(nz)?,
    );
    dims.checked_len()
        .filter(|&points| points <= MAX_LATTICE_POINTS)
        .map(|_| dims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::atom::Atom;

    const TOLERANCE: f64 = 1e-9;

    fn f64_approx_equal(a: f64, b: f64) -> bool {
        (a - b).abs() < TOLERANCE
    }

    fn single_atom() -> AtomSet {
        AtomSet::from_xyzr(&[[0.0, 0.0, 0.0, 1.0]])
    }

    #[test]
    fn axis_point_count_is_always_odd() {
        for extent in [0.01, 0.2, 0.39, 0.4, 0.41, 3.3, 17.0] {
            assert_eq!(GridBuilder::axis_point_count(extent, 0.2).unwrap() % 2, 1);
        }
        assert_eq!(GridBuilder::axis_point_count(4.0, 0.25), Some(17));
        assert_eq!(GridBuilder::axis_point_count(4.1, 0.25), Some(19));
        assert_eq!(GridBuilder::axis_point_count(0.0, 0.25), Some(1));
    }

    #[test]
    fn axis_point_count_is_none_beyond_the_point_limit() {
        assert_eq!(GridBuilder::axis_point_count(5.6, 1e-300), None);
        assert_eq!(GridBuilder::axis_point_count(1e10, 1.0), None);
        assert_eq!(
            GridBuilder::axis_point_count(MAX_LATTICE_POINTS as f64 - 1.0, 1.0),
            Some(MAX_LATTICE_POINTS)
        );
    }

    #[test]
    fn vanishing_spacing_is_rejected_as_too_large() {
        let result = GridBuilder::new(1e-300, 2.8).build(&single_atom());
        assert!(matches!(
            result,
            Err(GridError::LatticeTooLarge {
                limit: MAX_LATTICE_POINTS,
                ..
            })
        ));
    }

    #[test]
    fn lattice_whose_point_count_overflows_is_rejected() {
        // About 5.6 million points per axis: each count fits, their product does not.
        let result = GridBuilder::new(1e-6, 2.8).build(&single_atom());
        let Err(GridError::LatticeTooLarge { counts, limit }) = result else {
            panic!("expected LatticeTooLarge, got {result:?}");
        };
        assert_eq!(limit, MAX_LATTICE_POINTS);
        for count in counts {
            assert!((5_600_001.0..=5_600_003.0).contains(&count));
        }
    }

    #[test]
    fn lattice_just_over_the_limit_is_rejected() {
        // Roughly 2001 points per axis, about 8e9 in total.
        let result = GridBuilder::new(1e-3, 1.0).build(&single_atom());
        assert!(matches!(result, Err(GridError::LatticeTooLarge { .. })));

        let fits = GridBuilder::new(1e-2, 1.0).build(&single_atom()).unwrap();
        assert_eq!(fits.dims(), LatticeDims::new(201, 201, 201));
    }

    #[test]
    fn single_atom_grid_is_centered_on_the_atom() {
        let grid = GridBuilder::new(0.25, 2.0).build(&single_atom()).unwrap();
        assert_eq!(grid.dims(), LatticeDims::new(17, 17, 17));
        assert_eq!(grid.origin(), Point3::new(-2.0, -2.0, -2.0));
        assert_eq!(grid.center(), Point3::new(0.0, 0.0, 0.0));
        assert_eq!(grid.spacing(), 0.25);
    }

    #[test]
    fn grid_center_is_the_atom_centroid_not_the_box_center() {
        let atoms = AtomSet::from_xyzr(&[
            [0.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
        ]);
        let grid = GridBuilder::new(0.5, 1.4).build(&atoms).unwrap();
        let center = grid.center();
        assert!(f64_approx_equal(center.x, 7.5));
        assert!(f64_approx_equal(center.y, 0.0));
    }

    #[test]
    fn lopsided_atom_sets_stay_inside_the_grid() {
        let atoms = AtomSet::from_xyzr(&[
            [0.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
            [10.0, 0.0, 0.0, 1.0],
        ]);
        let margin_scale = 1.4;
        let grid = GridBuilder::new(0.5, margin_scale).build(&atoms).unwrap();
        let (lower, upper) = atoms.scaled_bounds(margin_scale).unwrap();
        let (origin, far) = (grid.origin(), grid.far_corner());
        for axis in 0..3 {
            assert!(origin[axis] <= lower[axis] + TOLERANCE);
            assert!(far[axis] >= upper[axis] - TOLERANCE);
        }
    }

    #[test]
    fn atom_order_does_not_change_the_grid() {
        let forward = AtomSet::from_xyzr(&[
            [0.0, 0.3, -1.0, 1.5],
            [1.2, -0.7, 0.4, 1.2],
            [-0.8, 0.9, 2.2, 1.7],
        ]);
        let reversed: AtomSet = forward.iter().rev().copied().collect();
        let builder = GridBuilder::new(0.2, 2.8);
        let a = builder.build(&forward).unwrap();
        let b = builder.build(&reversed).unwrap();
        assert_eq!(a.dims(), b.dims());
        assert!((a.origin() - b.origin()).norm() < TOLERANCE);
    }

    #[test]
    fn empty_atom_set_is_rejected() {
        let result = GridBuilder::new(0.2, 2.8).build(&AtomSet::default());
        assert_eq!(result, Err(GridError::EmptyInput));
    }

    #[test]
    fn non_positive_spacing_is_rejected() {
        for spacing in [0.0, -0.1, f64::NAN] {
            let result = GridBuilder::new(spacing, 2.8).build(&single_atom());
            assert!(matches!(result, Err(GridError::InvalidSpacing(_))));
        }
    }

    #[test]
    fn non_positive_margin_scale_is_rejected() {
        let result = GridBuilder::new(0.2, 0.0).build(&single_atom());
        assert_eq!(
            result,
            Err(GridError::InvalidScale {
                name: "margin_scale",
                value: 0.0
            })
        );
    }

    #[test]
    fn invalid_atom_is_reported_with_its_index() {
        let atoms = AtomSet::new(vec![
            Atom::new(Point3::origin(), 1.0),
            Atom::new(Point3::new(1.0, 0.0, 0.0), -1.0),
        ]);
        let result = GridBuilder::new(0.2, 2.8).build(&atoms);
        assert_eq!(
            result,
            Err(GridError::InvalidAtom {
                index: 1,
                reason: "radius must be positive"
            })
        );
    }
}
