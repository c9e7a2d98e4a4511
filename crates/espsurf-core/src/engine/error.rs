use thiserror::Error;

use super::config::ConfigError;
use crate::core::grid::{FieldError, GridError};
use crate::core::surface::march::ExtractError;
use crate::core::surface::smooth::SmoothingError;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("Invalid surface configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Grid construction failed: {source}")]
    Grid {
        #[from]
        source: GridError,
    },

    #[error("Occupancy rasterization failed: {source}")]
    Field {
        #[from]
        source: FieldError,
    },

    #[error("Iso-surface extraction failed: {source}")]
    Extraction {
        #[from]
        source: ExtractError,
    },

    #[error("Mesh smoothing failed: {source}")]
    Smoothing {
        #[from]
        source: SmoothingError,
    },
}
