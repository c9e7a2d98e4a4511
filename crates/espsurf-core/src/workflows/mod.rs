//! # Workflows Module
//!
//! High-level entry points that run the complete surface pipeline.
//!
//! - **Surface Workflow** ([`surface`]) - Atoms to a smoothed, molecule-frame triangle mesh:
//!   grid construction, occupancy rasterization, marching cubes and Laplacian smoothing, with
//!   progress reporting at each phase.

pub mod surface;
