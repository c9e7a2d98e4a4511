//! # Surface Module
//!
//! Turns a scalar lattice into a relaxed triangle mesh.
//!
//! - [`march`] - Marching cubes over any [`crate::core::grid::ScalarField`], with vertices shared
//!   between cells that meet at a lattice edge
//! - [`smooth`] - Synchronous Laplacian relaxation over the mesh's vertex adjacency
//! - [`tables`] - The constant corner, edge and triangulation tables

pub mod march;
pub mod smooth;
pub mod tables;

pub use march::{ExtractError, ISO_LEVEL, IsosurfaceExtractor};
pub use smooth::{MeshSmoother, SmoothingError, VertexAdjacency};
