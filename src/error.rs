//! Error types for engine construction and configuration.
//!
//! Every check happens at construction or in an explicit setter, so a tick
//! itself never fails.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    /// Non-positive dimensions, radius or shape width, non-finite parameters
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Transform strategy forced on a grid the backend will not take
    #[error("Unsupported grid size for spectral convolution: {width}x{height}")]
    UnsupportedGridSize { width: usize, height: usize },
}

pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    #[must_use]
    pub fn invalid<S: Into<String>>(msg: S) -> Self {
        Self::InvalidParameter(msg.into())
    }
}
