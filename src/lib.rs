//! Reduce large datasets to small weighted index subsets.
//!
//! A coresubset selects points of a dataset such that functionals of the small set
//! approximate those of the full one. The greedy solvers (kernel herding, Stein thinning)
//! and the randomised solvers (random sampling, randomly pivoted Cholesky, greedy kernel
//! inducing points) all implement [`Solver`](solvers::Solver).
#![warn(missing_docs)]

pub mod coreset;
pub mod data;
pub mod error;
pub mod kde;
pub mod kernel;
pub mod least_squares;
mod max;
pub mod metrics;
pub mod random;
pub mod score_matching;
pub mod solvers;

pub use crate::coreset::Coresubset;
pub use crate::data::{Data, Dataset, SupervisedData};
pub use crate::error::{CoresetError, Result};
pub use crate::random::RandomKey;
pub use crate::solvers::{RefinementSolver, Solver};

#[cfg(test)]
mod tests;
