//! # espsurf Core Library
//!
//! Builds a triangulated iso-surface approximating the scaled van der Waals boundary of a
//! molecule, for use as a sampling surface for scalar fields such as the electrostatic
//! potential.
//!
//! ## Architectural Philosophy
//!
//! The library follows a three-layer architecture:
//!
//! - **[`core`]: The Foundation.** Stateless data models (`AtomSet`, `Mesh`), the lattice and
//!   occupancy field, and the pure surface algorithms (marching cubes, Laplacian smoothing).
//!
//! - **[`engine`]: Configuration and Plumbing.** Validated surface configuration, the
//!   workflow-level error type, and progress reporting hooks.
//!
//! - **[`workflows`]: The Public API.** Ties `core` and `engine` together into the complete
//!   atoms-to-mesh pipeline.
//!
//! The crate performs no I/O and reads no ambient state: everything is passed in explicitly.

pub mod core;
pub mod engine;
pub mod workflows;
