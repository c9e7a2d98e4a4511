pub mod build;
pub mod grid;
