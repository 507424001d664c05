use thiserror::Error;

/// Errors that can occur while depixelizing an image.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DepixError {
    #[error("invalid image dimensions {width}x{height}: both must be greater than 0")]
    InvalidDimensions { width: usize, height: usize },

    #[error("pixel buffer holds {actual} pixels, expected {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },

    #[error("similarity graph is {graph:?} but the pixel grid is {grid:?}")]
    DimensionMismatch {
        graph: (usize, usize),
        grid: (usize, usize),
    },

    #[error("invalid options: {0}")]
    Config(#[from] serde_json::Error),

    #[error("failed to export results: {0}")]
    Export(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DepixError>;
