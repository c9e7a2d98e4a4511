use super::lattice::LatticeDims;
use super::occupancy::FieldError;

/// A scalar value sampled at every point of a regular lattice.
///
/// This is the only view marching cubes needs: its shape and a value per lattice point.
pub trait ScalarField {
    fn dims(&self) -> LatticeDims;

    /// The sample at lattice point `(x, y, z)`. Coordinates must be in bounds.
    fn value(&self, x: usize, y: usize, z: usize) -> f64;
}

/// A dense `f64` field stored in the shared flat layout (z fastest).
#[derive(Debug, Clone, PartialEq)]
pub struct DenseField {
    dims: LatticeDims,
    values: Vec<f64>,
}

impl DenseField {
    /// # Errors
    ///
    /// Returns [`FieldError::ShapeMismatch`] if `values.len()` differs from `dims.len()`.
    pub fn new(dims: LatticeDims, values: Vec<f64>) -> Result<Self, FieldError> {
        if values.len() != dims.len() {
            return Err(FieldError::ShapeMismatch {
                expected: dims.len(),
                actual: values.len(),
            });
        }
        Ok(Self { dims, values })
    }

    /// Samples `f` at every lattice coordinate.
    pub fn from_fn<F>(dims: LatticeDims, f: F) -> Self
    where
        F: Fn(usize, usize, usize) -> f64,
    {
        let values = (0..dims.len())
            .map(|index| {
                let [x, y, z] = dims.coords(index);
                f(x, y, z)
            })
            .collect();
        Self { dims, values }
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl ScalarField for DenseField {
    fn dims(&self) -> LatticeDims {
        self.dims
    }

    #[inline]
    fn value(&self, x: usize, y: usize, z: usize) -> f64 {
        self.values[self.dims.index(x, y, z)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_rejects_wrong_length() {
        let result = DenseField::new(LatticeDims::new(2, 2, 2), vec![0.0; 7]);
        assert_eq!(
            result,
            Err(FieldError::ShapeMismatch {
                expected: 8,
                actual: 7
            })
        );
    }

    #[test]
    fn from_fn_uses_the_shared_index_layout() {
        let dims = LatticeDims::new(2, 3, 4);
        let field = DenseField::from_fn(dims, |x, y, z| (100 * x + 10 * y + z) as f64);
        assert_eq!(field.values()[dims.index(1, 2, 3)], 123.0);
        assert_eq!(field.value(1, 2, 3), 123.0);
        assert_eq!(field.value(0, 0, 1), 1.0);
    }
}
