//! Coresubset solvers
mod gkip;
mod greedy;
mod herding;
mod random_sample;
mod rpcholesky;
mod stein_thinning;

pub use gkip::{GreedyKernelInducingPoints, GreedyKernelInducingPointsState};
pub use greedy::greedy_kernel_selection;
pub use herding::{HerdingState, KernelHerding};
pub use random_sample::RandomSample;
pub use rpcholesky::{RPCholesky, RPCholeskyState};
pub use stein_thinning::SteinThinning;

use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::{CoresetError, Result};

/// A method reducing a dataset to a coresubset
pub trait Solver<D: Dataset> {
    /// Intermediate results which may be reused by later calls
    type State;

    /// Reduces `dataset` to a coresubset.
    ///
    /// A `state` returned by an earlier call on the same dataset skips recomputation of
    /// the cached quantities.
    fn reduce<'a>(
        &self,
        dataset: &'a D,
        state: Option<Self::State>,
    ) -> Result<(Coresubset<'a, D>, Self::State)>;
}

/// A solver which can improve an existing coresubset
pub trait RefinementSolver<D: Dataset>: Solver<D> {
    /// Refines `coresubset`, overwriting its selections position by position.
    fn refine<'a>(
        &self,
        coresubset: &Coresubset<'a, D>,
        state: Option<Self::State>,
    ) -> Result<(Coresubset<'a, D>, Self::State)>;
}

fn check_size(coreset_size: usize, dataset_size: usize, unique: bool) -> Result<()> {
    if unique && coreset_size > dataset_size {
        return Err(CoresetError::Sizing {
            coreset_size,
            dataset_size,
        });
    }
    Ok(())
}
