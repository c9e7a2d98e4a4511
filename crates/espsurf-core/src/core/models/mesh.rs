use crate::core::utils::geometry::triangle_area;
use nalgebra::Point3;
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MeshError {
    #[error("Triangle {triangle} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfBounds {
        triangle: usize,
        index: u32,
        vertex_count: usize,
    },
}

/// An indexed triangle mesh.
///
/// Every index in `triangles` refers to an entry of `vertices`; the public constructor enforces
/// this. Triangles are wound counter-clockwise when viewed from outside the enclosed volume.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Mesh {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
}

impl Mesh {
    /// Creates a mesh, checking that every triangle index is in bounds.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfBounds`] for the first offending index.
    pub fn new(vertices: Vec<Point3<f64>>, triangles: Vec<[u32; 3]>) -> Result<Self, MeshError> {
        let vertex_count = vertices.len();
        for (triangle, corners) in triangles.iter().enumerate() {
            if let Some(&index) = corners.iter().find(|&&i| i as usize >= vertex_count) {
                return Err(MeshError::IndexOutOfBounds {
                    triangle,
                    index,
                    vertex_count,
                });
            }
        }
        Ok(Self {
            vertices,
            triangles,
        })
    }

    /// Creates a mesh from buffers the caller has already proven consistent.
    pub(crate) fn from_parts_unchecked(
        vertices: Vec<Point3<f64>>,
        triangles: Vec<[u32; 3]>,
    ) -> Self {
        debug_assert!(
            triangles
                .iter()
                .flatten()
                .all(|&i| (i as usize) < vertices.len())
        );
        Self {
            vertices,
            triangles,
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    #[inline]
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertices
    }

    #[inline]
    pub fn triangles(&self) -> &[[u32; 3]] {
        &self.triangles
    }

    pub(crate) fn vertices_mut(&mut self) -> &mut Vec<Point3<f64>> {
        &mut self.vertices
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.triangles.is_empty()
    }

    /// Vertex coordinates as a flat `[x0, y0, z0, x1, ...]` buffer.
    pub fn flat_vertices(&self) -> Vec<f64> {
        self.vertices
            .iter()
            .flat_map(|v| [v.x, v.y, v.z])
            .collect()
    }

    /// Triangle indices as a flat `[a0, b0, c0, a1, ...]` buffer.
    pub fn flat_indices(&self) -> Vec<u32> {
        self.triangles.iter().flatten().copied().collect()
    }

    /// Applies `f` to every vertex position; connectivity is untouched.
    pub fn map_vertices<F>(mut self, f: F) -> Self
    where
        F: Fn(&Point3<f64>) -> Point3<f64>,
    {
        for vertex in &mut self.vertices {
            *vertex = f(vertex);
        }
        self
    }

    /// Component-wise bounds of the vertices, or `None` for a mesh without vertices.
    pub fn bounds(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let (first, rest) = self.vertices.split_first()?;
        Some(
            rest.iter()
                .fold((*first, *first), |(lower, upper), v| {
                    (lower.inf(v), upper.sup(v))
                }),
        )
    }

    pub fn surface_area(&self) -> f64 {
        self.triangles
            .iter()
            .map(|&[a, b, c]| {
                triangle_area(
                    &self.vertices[a as usize],
                    &self.vertices[b as usize],
                    &self.vertices[c as usize],
                )
            })
            .sum()
    }

    /// Number of triangles using each undirected edge, keyed by `(low, high)` vertex index.
    fn edge_uses(&self) -> HashMap<(u32, u32), usize> {
        let mut uses = HashMap::with_capacity(self.triangles.len() * 3 / 2);
        for &[a, b, c] in &self.triangles {
            for (u, v) in [(a, b), (b, c), (c, a)] {
                *uses.entry((u.min(v), u.max(v))).or_insert(0) += 1;
            }
        }
        uses
    }

    /// Whether every edge is shared by exactly two triangles.
    ///
    /// An empty mesh is not considered closed.
    pub fn is_closed(&self) -> bool {
        !self.triangles.is_empty() && self.edge_uses().values().all(|&uses| uses == 2)
    }

    /// `V - E + F` over the vertices referenced by at least one triangle.
    pub fn euler_characteristic(&self) -> i64 {
        let mut referenced = vec![false; self.vertices.len()];
        for &index in self.triangles.iter().flatten() {
            referenced[index as usize] = true;
        }
        let vertices = referenced.iter().filter(|&&used| used).count() as i64;
        let edges = self.edge_uses().len() as i64;
        vertices - edges + self.triangles.len() as i64
    }

    pub fn into_parts(self) -> (Vec<Point3<f64>>, Vec<[u32; 3]>) {
        (self.vertices, self.triangles)
    }
}
