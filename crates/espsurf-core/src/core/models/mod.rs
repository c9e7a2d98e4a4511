//! # Core Models Module
//!
//! The input and output data structures of the surface pipeline.
//!
//! ## Key Components
//!
//! - [`atom`] - Atom positions with per-atom radii, grouped into an immutable [`atom::AtomSet`]
//! - [`mesh`] - Triangle meshes produced by iso-surface extraction
//!
//! Both are plain values: an `AtomSet` is never mutated during a build, and a `Mesh` is the only
//! artifact that outlives it.

pub mod atom;
pub mod mesh;
