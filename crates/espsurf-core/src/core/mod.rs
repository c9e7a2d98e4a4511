//! # Core Module
//!
//! Data structures and algorithms for building molecular surfaces.
//!
//! ## Overview
//!
//! The surface pipeline runs leaves first:
//!
//! - **Molecular Input** ([`models::atom`]) - Atom positions and radii
//! - **Lattice** ([`grid`]) - A regular grid centered on the atoms, and the binary occupancy
//!   field rasterized over it
//! - **Extraction** ([`surface::march`]) - Marching cubes over any scalar lattice
//! - **Relaxation** ([`surface::smooth`]) - Synchronous Laplacian smoothing
//! - **Output** ([`models::mesh`]) - The vertex and triangle buffers handed to callers

pub mod grid;
pub mod models;
pub mod surface;
pub mod utils;
