use super::tables::{CORNER_OFFSETS, EDGE_CORNERS, EDGE_MASKS, TRIANGLE_TABLE};
use crate::core::grid::field::ScalarField;
use crate::core::grid::lattice::LatticeDims;
use crate::core::models::mesh::Mesh;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, instrument};

/// The threshold between empty (0.0) and occupied (1.0) lattice points.
pub const ISO_LEVEL: f64 = 0.5;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractError {
    #[error("Iso-surface needs more than {limit} vertices, the most a u32 triangle index can address")]
    TooManyVertices { limit: u64 },
}

/// Marching cubes iso-surface extraction.
///
/// Every unit cell of the lattice is classified by which of its 8 corners lie at or above the
/// iso level, and the canonical triangulation for that configuration is emitted. A vertex is
/// placed on each crossed lattice edge by linear interpolation and is shared by every cell
/// touching that edge, so closed iso-surfaces produce closed meshes.
///
/// Output coordinates are in lattice units: lattice point `(x, y, z)` maps to
/// `Point3::new(x, y, z)`. Use [`crate::core::grid::Grid::lattice_to_world`] to place them.
/// Triangles wind counter-clockwise seen from the low-valued side, so face normals point from
/// high values toward low values (outward for an occupancy field).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IsosurfaceExtractor {
    iso_level: f64,
}

impl Default for IsosurfaceExtractor {
    fn default() -> Self {
        Self::new(ISO_LEVEL)
    }
}

impl IsosurfaceExtractor {
    pub fn new(iso_level: f64) -> Self {
        Self { iso_level }
    }

    pub fn iso_level(&self) -> f64 {
        self.iso_level
    }

    /// Corner sign code: bit `i` is set when corner `i` is at or above the iso level.
    #[inline]
    pub fn cube_code(&self, corner_values: &[f64; 8]) -> u8 {
        corner_values
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value >= self.iso_level)
            .fold(0u8, |code, (corner, _)| code | (1 << corner))
    }

    /// Extracts the iso-surface of `field`.
    ///
    /// Cells are visited with `x` outermost and `z` innermost; vertex indices are assigned in
    /// order of first use, so the output is deterministic. Uniform fields yield an empty mesh.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractError::TooManyVertices`] when the surface has more vertices than a `u32`
    /// index can address.
    #[instrument(skip_all, name = "marching_cubes", fields(iso_level = self.iso_level))]
    pub fn extract<F>(&self, field: &F) -> Result<Mesh, ExtractError>
    where
        F: ScalarField + ?Sized,
    {
        let dims = field.dims();
        if dims.cell_count() == 0 {
            return Ok(Mesh::empty());
        }

        let mut edge_vertices = EdgeVertices::new(dims, self.iso_level);
        let mut triangles = Vec::new();
        let mut active_cells = 0usize;

        for x in 0..dims.nx - 1 {
            for y in 0..dims.ny - 1 {
                for z in 0..dims.nz - 1 {
                    let cell = [x, y, z];
                    let corner_values = CORNER_OFFSETS
                        .map(|[dx, dy, dz]| field.value(x + dx, y + dy, z + dz));

                    // The tables are keyed by the corners below the iso level.
                    let configuration = usize::from(!self.cube_code(&corner_values));
                    if EDGE_MASKS[configuration] == 0 {
                        continue;
                    }
                    active_cells += 1;

                    for edges in TRIANGLE_TABLE[configuration]
                        .chunks_exact(3)
                        .take_while(|edges| edges[0] >= 0)
                    {
                        let mut triangle = [0u32; 3];
                        for (slot, &edge) in triangle.iter_mut().zip(edges) {
                            *slot = edge_vertices.vertex(cell, edge as usize, &corner_values)?;
                        }
                        triangles.push(triangle);
                    }
                }
            }
        }

        let vertices = edge_vertices.into_vertices();
        debug!(
            active_cells,
            vertices = vertices.len(),
            triangles = triangles.len(),
            "Iso-surface extracted."
        );
        Ok(Mesh::from_parts_unchecked(vertices, triangles))
    }
}

/// Vertices keyed by the lattice edge they sit on.
struct EdgeVertices {
    dims: LatticeDims,
    iso_level: f64,
    index_of: HashMap<(usize, usize), u32>,
    positions: Vec<Point3<f64>>,
}

impl EdgeVertices {
    fn new(dims: LatticeDims, iso_level: f64) -> Self {
        Self {
            dims,
            iso_level,
            index_of: HashMap::new(),
            positions: Vec::new(),
        }
    }

    /// Index of the vertex on cube edge `edge` of `cell`, creating it on first use.
    fn vertex(
        &mut self,
        cell: [usize; 3],
        edge: usize,
        corner_values: &[f64; 8],
    ) -> Result<u32, ExtractError> {
        let [a, b] = EDGE_CORNERS[edge];
        let corner = |c: usize| {
            let [dx, dy, dz] = CORNER_OFFSETS[c];
            [cell[0] + dx, cell[1] + dy, cell[2] + dz]
        };
        let (point_a, point_b) = (corner(a), corner(b));
        let index_a = self.dims.index(point_a[0], point_a[1], point_a[2]);
        let index_b = self.dims.index(point_b[0], point_b[1], point_b[2]);

        // Orient every edge from its lower lattice index so that neighboring cells produce
        // bit-identical positions for the same edge.
        let (key, start, end, start_value, end_value) = if index_a < index_b {
            ((index_a, index_b), point_a, point_b, corner_values[a], corner_values[b])
        } else {
            ((index_b, index_a), point_b, point_a, corner_values[b], corner_values[a])
        };

        if let Some(&index) = self.index_of.get(&key) {
            return Ok(index);
        }

        let position = interpolate(
            lattice_point(start),
            lattice_point(end),
            start_value,
            end_value,
            self.iso_level,
        );
        let index = next_vertex_index(self.positions.len())?;
        self.positions.push(position);
        self.index_of.insert(key, index);
        Ok(index)
    }

    fn into_vertices(self) -> Vec<Point3<f64>> {
        self.positions
    }
}

/// The index a new vertex gets when `count` vertices already exist.
fn next_vertex_index(count: usize) -> Result<u32, ExtractError> {
    u32::try_from(count).map_err(|_| ExtractError::TooManyVertices {
        limit: u64::from(u32::MAX) + 1,
    })
}

#[inline]
fn lattice_point([x, y, z]: [usize; 3]) -> Point3<f64> {
    Point3::new(x as f64, y as f64, z as f64)
}

/// Point on segment `start`-`end` where the linearly interpolated value equals `iso_level`.
fn interpolate(
    start: Point3<f64>,
    end: Point3<f64>,
    start_value: f64,
    end_value: f64,
    iso_level: f64,
) -> Point3<f64> {
    let delta = end_value - start_value;
    if delta.abs() < f64::EPSILON {
        return nalgebra::center(&start, &end);
    }
    let t = ((iso_level - start_value) / delta).clamp(0.0, 1.0);
    start + (end - start) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::grid::field::DenseField;
    use crate::core::grid::occupancy::OccupancyField;
    use crate::core::utils::geometry::triangle_normal;
    use nalgebra::Vector3;

    const TOLERANCE: f64 = 1e-12;

    fn field_with_occupied(dims: LatticeDims, occupied: &[[usize; 3]]) -> OccupancyField {
        let mut values = vec![false; dims.len()];
        for &[x, y, z] in occupied {
            values[dims.index(x, y, z)] = true;
        }
        OccupancyField::from_values(dims, values).unwrap()
    }

    #[test]
    fn cube_code_sets_bits_for_corners_at_or_above_iso_level() {
        let extractor = IsosurfaceExtractor::default();
        assert_eq!(extractor.cube_code(&[0.0; 8]), 0x00);
        assert_eq!(extractor.cube_code(&[1.0; 8]), 0xFF);
        assert_eq!(
            extractor.cube_code(&[1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.5, 0.0]),
            0b0100_0001
        );
    }

    #[test]
    fn all_empty_field_yields_empty_mesh() {
        let field = OccupancyField::empty(LatticeDims::new(5, 4, 3));
        let mesh = IsosurfaceExtractor::default().extract(&field).unwrap();
        assert_eq!(mesh.vertex_count(), 0);
        assert_eq!(mesh.triangle_count(), 0);
    }

    #[test]
    fn all_full_field_yields_empty_mesh() {
        let dims = LatticeDims::new(3, 3, 3);
        let field = OccupancyField::from_values(dims, vec![true; dims.len()]).unwrap();
        assert!(IsosurfaceExtractor::default().extract(&field).unwrap().is_empty());
    }

    #[test]
    fn lattice_without_cells_yields_empty_mesh() {
        let field = OccupancyField::empty(LatticeDims::new(1, 5, 5));
        assert!(IsosurfaceExtractor::default().extract(&field).unwrap().is_empty());
    }

    #[test]
    fn single_occupied_corner_cuts_off_one_triangle() {
        let field = field_with_occupied(LatticeDims::new(2, 2, 2), &[[0, 0, 0]]);
        let mesh = IsosurfaceExtractor::default().extract(&field).unwrap();

        assert_eq!(mesh.triangles(), &[[0, 1, 2]]);
        assert_eq!(
            mesh.vertices(),
            &[
                Point3::new(0.5, 0.0, 0.0),
                Point3::new(0.0, 0.5, 0.0),
                Point3::new(0.0, 0.0, 0.5),
            ]
        );

        let [a, b, c] = mesh.vertices() else {
            panic!("expected three vertices");
        };
        let normal = triangle_normal(a, b, c);
        assert!(normal.dot(&Vector3::new(1.0, 1.0, 1.0)) > 0.0);
    }

    #[test]
    fn single_occupied_point_yields_closed_octahedron() {
        let field = field_with_occupied(LatticeDims::new(3, 3, 3), &[[1, 1, 1]]);
        let mesh = IsosurfaceExtractor::default().extract(&field).unwrap();

        assert_eq!(mesh.vertex_count(), 6);
        assert_eq!(mesh.triangle_count(), 8);
        assert!(mesh.is_closed());
        assert_eq!(mesh.euler_characteristic(), 2);

        let center = Point3::new(1.0, 1.0, 1.0);
        for vertex in mesh.vertices() {
            assert!(((vertex - center).norm() - 0.5).abs() < TOLERANCE);
        }
        for &[a, b, c] in mesh.triangles() {
            let (a, b, c) = (
                mesh.vertices()[a as usize],
                mesh.vertices()[b as usize],
                mesh.vertices()[c as usize],
            );
            let face_center = Point3::from((a.coords + b.coords + c.coords) / 3.0);
            let outward = face_center - center;
            assert!(triangle_normal(&a, &b, &c).dot(&outward) > 0.0);
        }
    }

    #[test]
    fn adjacent_cells_share_edge_vertices() {
        let dims = LatticeDims::new(4, 3, 3);
        let field = field_with_occupied(dims, &[[1, 1, 1], [2, 1, 1]]);
        let mesh = IsosurfaceExtractor::default().extract(&field).unwrap();

        assert!(mesh.is_closed());
        assert_eq!(mesh.euler_characteristic(), 2);
        for (i, a) in mesh.vertices().iter().enumerate() {
            for b in &mesh.vertices()[i + 1..] {
                assert!((a - b).norm() > TOLERANCE, "duplicate vertex at {a:?}");
            }
        }
    }

    #[test]
    fn dense_field_vertices_are_linearly_interpolated() {
        let dims = LatticeDims::new(2, 2, 2);
        let field = DenseField::from_fn(dims, |x, _, _| x as f64);
        let mesh = IsosurfaceExtractor::new(0.25).extract(&field).unwrap();

        assert_eq!(mesh.vertex_count(), 4);
        assert_eq!(mesh.triangle_count(), 2);
        for vertex in mesh.vertices() {
            assert!((vertex.x - 0.25).abs() < TOLERANCE);
        }
        // Normals point toward decreasing values.
        for &[a, b, c] in mesh.triangles() {
            let normal = triangle_normal(
                &mesh.vertices()[a as usize],
                &mesh.vertices()[b as usize],
                &mesh.vertices()[c as usize],
            );
            assert!(normal.x < 0.0);
        }
    }

    #[test]
    fn interpolate_falls_back_to_midpoint_for_flat_edges() {
        let point = interpolate(
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.0, 2.0, 0.0),
            0.5,
            0.5,
            0.5,
        );
        assert_eq!(point, Point3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn vertex_indices_stop_at_the_u32_range() {
        assert_eq!(next_vertex_index(0), Ok(0));
        assert_eq!(next_vertex_index(u32::MAX as usize), Ok(u32::MAX));
        assert_eq!(
            next_vertex_index(u32::MAX as usize + 1),
            Err(ExtractError::TooManyVertices {
                limit: 1 << 32
            })
        );
    }

    #[test]
    fn extraction_is_deterministic() {
        let dims = LatticeDims::new(6, 6, 6);
        let field = DenseField::from_fn(dims, |x, y, z| {
            let d = Vector3::new(x as f64 - 2.5, y as f64 - 2.5, z as f64 - 2.5);
            if d.norm() < 2.0 { 1.0 } else { 0.0 }
        });
        let extractor = IsosurfaceExtractor::default();
        assert_eq!(
            extractor.extract(&field).unwrap(),
            extractor.extract(&field).unwrap()
        );
    }
}
