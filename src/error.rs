//! Error type shared by all solvers
use thiserror::Error;

/// Errors raised while building or refining a coresubset
#[derive(Debug, Error)]
pub enum CoresetError {
    /// The requested coreset does not fit into the dataset
    #[error(
        "'coreset_size' must be less than 'len(dataset)' by definition of a coreset \
         (coreset_size = {coreset_size}, len(dataset) = {dataset_size})"
    )]
    Sizing {
        /// Requested number of coreset entries
        coreset_size: usize,
        /// Number of points in the dataset
        dataset_size: usize,
    },

    /// A coreset index does not address a point of the dataset
    #[error("index {index} is out of bounds for a dataset of length {len}")]
    IndexOutOfBounds {
        /// Offending index
        index: usize,
        /// Number of points in the dataset
        len: usize,
    },

    /// Two arrays that must agree in length do not
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),

    /// Weights are negative, non-finite or sum to zero
    #[error("invalid weights: {0}")]
    InvalidWeights(String),

    /// A solver parameter lies outside its admissible range
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Random index sampling failed
    #[error("sampling failed: {0}")]
    Sampling(String),

    /// A linear system could not be solved
    #[error("linear algebra failure: {0}")]
    LinearAlgebra(String),
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, CoresetError>;
