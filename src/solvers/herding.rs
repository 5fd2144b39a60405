//! Kernel herding
use log::debug;
use ndarray::Array1;
use serde::{Deserialize, Serialize};

use super::greedy::greedy_kernel_selection;
use super::{RefinementSolver, Solver};
use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::{CoresetError, Result};
use crate::kernel::Kernel;
use crate::max::nan_argmax;

/// Cached intermediate results of [`KernelHerding`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HerdingState {
    /// Weighted mean kernel value of every point against the whole dataset
    pub gramian_row_mean: Array1<f64>,
}

/// Kernel herding: deterministic greedy minimisation of the maximum mean discrepancy.
///
/// Having selected `T` points, the next point maximises
/// `E[k(x, x')] - 1 / (T + 1) Σₜ k(x, xₜ)`, trading off high-density regions (first
/// term) against distance to the points already chosen (second term). The expectation is
/// taken with respect to the point weights of the dataset.
pub struct KernelHerding<K: Kernel> {
    /// Number of points in the coresubset
    pub coreset_size: usize,
    /// Kernel defining the discrepancy
    pub kernel: K,
    /// Whether every point may be selected at most once
    pub unique: bool,
    /// Block size of the kernel mean computations (`None` for a single block)
    pub block_size: Option<usize>,
}

impl<K: Kernel> KernelHerding<K> {
    const DEFAULT_UNIQUE: bool = true;

    /// Creates a [`KernelHerding`] solver.
    pub fn new(coreset_size: usize, kernel: K) -> Self {
        KernelHerding {
            coreset_size,
            kernel,
            unique: Self::DEFAULT_UNIQUE,
            block_size: None,
        }
    }

    /// Sets whether indices must be unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets the block size of the kernel mean computations.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }
}

impl<D: Dataset, K: Kernel> Solver<D> for KernelHerding<K> {
    type State = HerdingState;

    fn reduce<'a>(
        &self,
        dataset: &'a D,
        state: Option<HerdingState>,
    ) -> Result<(Coresubset<'a, D>, HerdingState)> {
        let initial = Coresubset::placeholder(0, self.coreset_size, dataset)?;
        self.refine(&initial, state)
    }
}

impl<D: Dataset, K: Kernel> RefinementSolver<D> for KernelHerding<K> {
    fn refine<'a>(
        &self,
        coresubset: &Coresubset<'a, D>,
        state: Option<HerdingState>,
    ) -> Result<(Coresubset<'a, D>, HerdingState)> {
        let dataset = coresubset.dataset();
        let gramian_row_mean = match state {
            Some(state) => {
                if state.gramian_row_mean.len() != dataset.len() {
                    return Err(CoresetError::ShapeMismatch(format!(
                        "cached row mean has length {} but the dataset has {} points",
                        state.gramian_row_mean.len(),
                        dataset.len()
                    )));
                }
                state.gramian_row_mean
            }
            None => {
                debug!("computing gramian row mean of {} points", dataset.len());
                self.kernel.gramian_row_mean(
                    dataset.features(),
                    Some(dataset.weights()),
                    self.block_size,
                )
            }
        };

        let selection_function = |i: usize, penalty: &Array1<f64>| {
            let scores = &gramian_row_mean - &(penalty / (i + 1) as f64);
            nan_argmax(scores.view())
        };
        let refined = greedy_kernel_selection(
            coresubset,
            selection_function,
            self.coreset_size,
            &self.kernel,
            self.unique,
            self.block_size,
        )?;
        Ok((refined, HerdingState { gramian_row_mean }))
    }
}
