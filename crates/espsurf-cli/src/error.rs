use espsurf::engine::error::SurfaceError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Surface(#[from] SurfaceError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse file '{path}': {source}", path = path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error("Lattice {dims} has {points} points, exceeding the limit of {limit}")]
    Limit {
        dims: String,
        points: usize,
        limit: usize,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
