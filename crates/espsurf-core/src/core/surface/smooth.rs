use crate::core::models::mesh::Mesh;
use nalgebra::{Point3, Vector3};
use thiserror::Error;
use tracing::{debug, instrument, trace};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[derive(Debug, Error, PartialEq)]
pub enum SmoothingError {
    #[error("Smoothing factor must lie in [0, 1], got {0}")]
    InvalidFactor(f64),
}

/// Per-vertex neighbor lists of a mesh, in compressed row layout.
///
/// Two vertices are neighbors when they share a triangle edge. Each list is sorted ascending and
/// holds no duplicates and never the vertex itself.
#[derive(Debug, Clone, PartialEq)]
pub struct VertexAdjacency {
    offsets: Vec<usize>,
    neighbors: Vec<u32>,
}

impl VertexAdjacency {
    pub fn from_mesh(mesh: &Mesh) -> Self {
        let mut lists: Vec<Vec<u32>> = vec![Vec::new(); mesh.vertex_count()];
        for &[a, b, c] in mesh.triangles() {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                if u != v {
                    lists[u as usize].push(v);
                    lists[v as usize].push(u);
                }
            }
        }

        let mut offsets = Vec::with_capacity(lists.len() + 1);
        let mut neighbors = Vec::new();
        offsets.push(0);
        for mut list in lists {
            list.sort_unstable();
            list.dedup();
            neighbors.extend(list);
            offsets.push(neighbors.len());
        }
        Self { offsets, neighbors }
    }

    /// Number of vertices covered.
    #[inline]
    pub fn len(&self) -> usize {
        self.offsets.len() - 1
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn neighbors(&self, vertex: usize) -> &[u32] {
        &self.neighbors[self.offsets[vertex]..self.offsets[vertex + 1]]
    }

    /// Mean position of `vertex`'s neighbors, or `None` for an isolated vertex.
    pub fn neighbor_mean(&self, vertex: usize, positions: &[Point3<f64>]) -> Option<Point3<f64>> {
        let neighbors = self.neighbors(vertex);
        if neighbors.is_empty() {
            return None;
        }
        let sum = neighbors
            .iter()
            .fold(Vector3::zeros(), |sum, &n| sum + positions[n as usize].coords);
        Some(Point3::from(sum / neighbors.len() as f64))
    }

    /// Mean squared distance from each connected vertex to its neighbor mean.
    ///
    /// Zero for a mesh without edges.
    pub fn roughness(&self, positions: &[Point3<f64>]) -> f64 {
        let (total, connected) = (0..self.len())
            .filter_map(|vertex| {
                self.neighbor_mean(vertex, positions)
                    .map(|mean| (positions[vertex] - mean).norm_squared())
            })
            .fold((0.0, 0usize), |(total, count), d2| (total + d2, count + 1));
        if connected == 0 {
            0.0
        } else {
            total / connected as f64
        }
    }
}

/// Laplacian roughness of `mesh`; see [`VertexAdjacency::roughness`].
pub fn roughness(mesh: &Mesh) -> f64 {
    VertexAdjacency::from_mesh(mesh).roughness(mesh.vertices())
}

/// Synchronous Laplacian smoothing.
///
/// Each iteration moves every vertex to `(1 - factor) * p + factor * mean(neighbors)`, where all
/// means are taken from the previous iteration's positions. Connectivity is never changed and
/// isolated vertices stay where they are.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshSmoother {
    iterations: usize,
    factor: f64,
}

impl MeshSmoother {
    /// # Errors
    ///
    /// Returns [`SmoothingError::InvalidFactor`] unless `0 <= factor <= 1`.
    pub fn new(iterations: usize, factor: f64) -> Result<Self, SmoothingError> {
        if !(0.0..=1.0).contains(&factor) {
            return Err(SmoothingError::InvalidFactor(factor));
        }
        Ok(Self { iterations, factor })
    }

    /// A smoother that leaves meshes untouched.
    pub fn disabled() -> Self {
        Self {
            iterations: 0,
            factor: 0.0,
        }
    }

    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn smooth(&self, mesh: Mesh) -> Mesh {
        self.smooth_with(mesh, |_| {})
    }

    /// Like [`MeshSmoother::smooth`], calling `on_iteration(i)` after iteration `i` completes.
    #[instrument(skip_all, name = "laplacian_smoothing", fields(iterations = self.iterations, factor = self.factor))]
    pub fn smooth_with<F>(&self, mut mesh: Mesh, mut on_iteration: F) -> Mesh
    where
        F: FnMut(usize),
    {
        if self.iterations == 0 || mesh.vertex_count() == 0 {
            return mesh;
        }

        let adjacency = VertexAdjacency::from_mesh(&mesh);
        let mut current = std::mem::take(mesh.vertices_mut());
        let mut next = current.clone();
        let initial = adjacency.roughness(&current);

        for iteration in 0..self.iterations {
            relax(&current, &mut next, &adjacency, self.factor);
            std::mem::swap(&mut current, &mut next);
            trace!(
                iteration,
                roughness = adjacency.roughness(&current),
                "Smoothing iteration complete."
            );
            on_iteration(iteration);
        }

        debug!(
            initial_roughness = initial,
            final_roughness = adjacency.roughness(&current),
            "Mesh smoothed."
        );
        *mesh.vertices_mut() = current;
        mesh
    }
}

fn relax(
    current: &[Point3<f64>],
    next: &mut [Point3<f64>],
    adjacency: &VertexAdjacency,
    factor: f64,
) {
    #[cfg(not(feature = "parallel"))]
    let targets = next.iter_mut();

    #[cfg(feature = "parallel")]
    let targets = next.par_iter_mut();

    targets.enumerate().for_each(|(vertex, target)| {
        *target = match adjacency.neighbor_mean(vertex, current) {
            Some(mean) => Point3::from(current[vertex].coords * (1.0 - factor) + mean.coords * factor),
            None => current[vertex],
        };
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::lattice::LatticeDims;
    use crate::core::grid::occupancy::OccupancyField;
    use crate::core::surface::march::IsosurfaceExtractor;

    const TOLERANCE: f64 = 1e-12;

    fn octahedron() -> Mesh {
        let dims = LatticeDims::new(3, 3, 3);
        let mut values = vec![false; dims.len()];
        values[dims.index(1, 1, 1)] = true;
        let field = OccupancyField::from_values(dims, values).unwrap();
        IsosurfaceExtractor::default().extract(&field).unwrap()
    }

    fn triangle() -> Mesh {
        Mesh::new(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(3.0, 0.0, 0.0),
                Point3::new(0.0, 3.0, 0.0),
            ],
            vec![[0, 1, 2]],
        )
        .unwrap()
    }

    #[test]
    fn new_rejects_factor_outside_unit_interval() {
        assert_eq!(
            MeshSmoother::new(3, 1.5),
            Err(SmoothingError::InvalidFactor(1.5))
        );
        assert!(MeshSmoother::new(3, -0.1).is_err());
        assert!(MeshSmoother::new(3, f64::NAN).is_err());
        assert!(MeshSmoother::new(3, 0.0).is_ok());
        assert!(MeshSmoother::new(3, 1.0).is_ok());
    }

    #[test]
    fn adjacency_lists_are_sorted_and_deduplicated() {
        let mesh = Mesh::new(vec![Point3::origin(); 4], vec![[0, 1, 2], [2, 1, 3]]).unwrap();
        let adjacency = VertexAdjacency::from_mesh(&mesh);
        assert_eq!(adjacency.len(), 4);
        assert_eq!(adjacency.neighbors(0), &[1, 2]);
        assert_eq!(adjacency.neighbors(1), &[0, 2, 3]);
        assert_eq!(adjacency.neighbors(2), &[0, 1, 3]);
        assert_eq!(adjacency.neighbors(3), &[1, 2]);
    }

    #[test]
    fn zero_iterations_return_the_mesh_unchanged() {
        let mesh = octahedron();
        let smoothed = MeshSmoother::new(0, 0.5).unwrap().smooth(mesh.clone());
        assert_eq!(smoothed, mesh);
        assert_eq!(MeshSmoother::disabled().smooth(mesh.clone()), mesh);
    }

    #[test]
    fn smoothing_preserves_counts_and_connectivity() {
        let mesh = octahedron();
        let smoothed = MeshSmoother::new(5, 0.5).unwrap().smooth(mesh.clone());
        assert_eq!(smoothed.vertex_count(), mesh.vertex_count());
        assert_eq!(smoothed.triangles(), mesh.triangles());
    }

    #[test]
    fn updates_are_synchronous() {
        let smoothed = MeshSmoother::new(1, 1.0).unwrap().smooth(triangle());
        assert_eq!(
            smoothed.vertices(),
            &[
                Point3::new(1.5, 1.5, 0.0),
                Point3::new(0.0, 1.5, 0.0),
                Point3::new(1.5, 0.0, 0.0),
            ]
        );
    }

    #[test]
    fn factor_zero_leaves_positions_in_place() {
        let mesh = triangle();
        let smoothed = MeshSmoother::new(4, 0.0).unwrap().smooth(mesh.clone());
        assert_eq!(smoothed, mesh);
    }

    #[test]
    fn isolated_vertices_do_not_move() {
        let mut vertices = triangle().into_parts().0;
        vertices.push(Point3::new(10.0, 10.0, 10.0));
        let mesh = Mesh::new(vertices, vec![[0, 1, 2]]).unwrap();
        let smoothed = MeshSmoother::new(3, 0.5).unwrap().smooth(mesh);
        assert_eq!(smoothed.vertices()[3], Point3::new(10.0, 10.0, 10.0));
    }

    #[test]
    fn octahedron_roughness_shrinks_with_each_pass() {
        let mesh = octahedron();
        let before = roughness(&mesh);
        assert!((before - 0.25).abs() < TOLERANCE);

        let once = MeshSmoother::new(1, 0.5).unwrap().smooth(mesh.clone());
        assert!((roughness(&once) - 0.0625).abs() < TOLERANCE);

        let twice = MeshSmoother::new(2, 0.5).unwrap().smooth(mesh);
        assert!(roughness(&twice) <= roughness(&once));
    }

    #[test]
    fn on_iteration_is_called_once_per_iteration() {
        let mut seen = Vec::new();
        MeshSmoother::new(3, 0.5)
            .unwrap()
            .smooth_with(octahedron(), |i| seen.push(i));
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn roughness_of_edgeless_mesh_is_zero() {
        assert_eq!(roughness(&Mesh::empty()), 0.0);
    }
}
