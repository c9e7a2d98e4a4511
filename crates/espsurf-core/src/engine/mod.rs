//! # Engine Module
//!
//! Configuration and plumbing shared by the surface workflows.
//!
//! - **Configuration** ([`config`]) - Grid, shell and smoothing parameters with validated defaults
//! - **Error Handling** ([`error`]) - The workflow-level error wrapping every stage's failure
//! - **Progress Monitoring** ([`progress`]) - Phase and task events for callers that display
//!   progress

pub mod config;
pub mod error;
pub mod progress;
