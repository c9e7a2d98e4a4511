//! # Grid Module
//!
//! The regular lattice a surface is built on, and the scalar fields sampled over it.
//!
//! - [`lattice`] - Point counts, the linear index mapping, and the positioned [`lattice::Grid`]
//! - [`builder`] - Sizing and centering a grid around an atom set
//! - [`field`] - The [`field::ScalarField`] abstraction consumed by marching cubes
//! - [`occupancy`] - The binary "inside any scaled atom" field
//!
//! Every flat buffer over a lattice is laid out with z varying fastest:
//! `index = z + y * nz + x * nz * ny`. [`lattice::LatticeDims::index`] is the only place that
//! arithmetic lives.

pub mod builder;
pub mod field;
pub mod lattice;
pub mod occupancy;

pub use builder::{GridBuilder, GridError, MAX_LATTICE_POINTS};
pub use field::{DenseField, ScalarField};
pub use lattice::{Grid, LatticeDims};
pub use occupancy::{FieldError, OccupancyField};
