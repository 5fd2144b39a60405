//! Greedy kernel inducing points
use log::{debug, trace, warn};
use ndarray::{Array1, Array2, Array3, ArrayView1, ArrayView2};
use serde::{Deserialize, Serialize};

use super::{RefinementSolver, Solver};
use crate::coreset::Coresubset;
use crate::data::{Dataset, SupervisedData};
use crate::error::{CoresetError, Result};
use crate::kernel::{Kernel, PrecomputedGramian};
use crate::least_squares::{MinimalEuclideanNormSolver, RegularisedLeastSquaresSolver};
use crate::max::nan_argmin;
use crate::random::{sample_batch_indices, RandomKey};

/// Cached intermediate results of [`GreedyKernelInducingPoints`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GreedyKernelInducingPointsState {
    /// Feature kernel matrix padded with a zero row and column
    pub feature_gramian: PrecomputedGramian,
}

/// Greedy kernel inducing points: supervised greedy selection for kernel ridge regression.
///
/// Position by position, the candidate minimising the regression loss
/// `|y - K₁₂ (K₂₂ + λI)⁻¹ y₂|²` of the resulting coresubset is selected, where `K₁₂` is the
/// kernel matrix between all points and the coresubset and `K₂₂` the kernel matrix of the
/// coresubset. Candidates are drawn in batches of `batch_size` (all points if `None`).
/// Only uniform weights are produced.
pub struct GreedyKernelInducingPoints<K: Kernel> {
    /// Number of points in the coresubset
    pub coreset_size: usize,
    /// Key for random number generation
    pub random_key: RandomKey,
    /// Kernel on the feature space
    pub feature_kernel: K,
    /// Regularisation parameter λ of the kernel ridge regression
    pub regularisation_parameter: f64,
    /// Whether every point may be selected at most once
    pub unique: bool,
    /// Number of candidates considered per position
    pub batch_size: Option<usize>,
    /// Solver for the regularised systems
    pub least_squares_solver: Box<dyn RegularisedLeastSquaresSolver>,
}

impl<K: Kernel> GreedyKernelInducingPoints<K> {
    const DEFAULT_REGULARISATION_PARAMETER: f64 = 1e-6;

    /// Creates a [`GreedyKernelInducingPoints`] solver.
    pub fn new(coreset_size: usize, random_key: RandomKey, feature_kernel: K) -> Self {
        GreedyKernelInducingPoints {
            coreset_size,
            random_key,
            feature_kernel,
            regularisation_parameter: Self::DEFAULT_REGULARISATION_PARAMETER,
            unique: true,
            batch_size: None,
            least_squares_solver: Box::new(MinimalEuclideanNormSolver),
        }
    }

    /// Sets the regularisation parameter.
    pub fn with_regularisation_parameter(mut self, regularisation_parameter: f64) -> Self {
        self.regularisation_parameter = regularisation_parameter;
        self
    }

    /// Sets whether indices must be unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets the number of candidates considered per position.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = Some(batch_size);
        self
    }

    /// Sets the solver for the regularised systems.
    pub fn with_least_squares_solver(
        mut self,
        least_squares_solver: Box<dyn RegularisedLeastSquaresSolver>,
    ) -> Self {
        self.least_squares_solver = least_squares_solver;
        self
    }
}

/// Computes the greedy loss of every candidate coresubset (one per row of `candidates`).
///
/// The term `|y|²` is omitted as it does not depend on the candidate. `responses` and
/// `feature_gramian` are padded so that the sentinel index addresses zeros.
fn greedy_kernel_inducing_points_loss(
    candidates: ArrayView2<usize>,
    responses: ArrayView1<f64>,
    feature_gramian: &PrecomputedGramian,
    regularisation_parameter: f64,
    identity: ArrayView2<f64>,
    least_squares_solver: &dyn RegularisedLeastSquaresSolver,
) -> Result<Array1<f64>> {
    let (b, m) = candidates.dim();
    let n = feature_gramian.size();
    let mut gramians = Array3::zeros((b, m, m));
    let mut targets = Array2::zeros((b, m));
    for (r, candidate) in candidates.outer_iter().enumerate() {
        for (a, &ca) in candidate.iter().enumerate() {
            targets[(r, a)] = responses[ca];
            for (c, &cc) in candidate.iter().enumerate() {
                gramians[(r, a, c)] = feature_gramian.get(ca, cc);
            }
        }
    }
    let coefficients = least_squares_solver.solve_stack(
        gramians.view(),
        regularisation_parameter,
        targets.view(),
        identity,
    )?;

    let mut loss = Array1::<f64>::zeros(b);
    for ((candidate, coeffs), l) in candidates
        .outer_iter()
        .zip(coefficients.outer_iter())
        .zip(loss.iter_mut())
    {
        let mut acc = 0.0;
        for j in 0..n {
            let prediction: f64 = candidate
                .iter()
                .zip(coeffs.iter())
                .map(|(&ca, &coeff)| feature_gramian.get(j, ca) * coeff)
                .sum();
            acc += (prediction - 2.0 * responses[j]) * prediction;
        }
        *l = acc;
    }
    Ok(loss)
}

impl<K: Kernel> Solver<SupervisedData> for GreedyKernelInducingPoints<K> {
    type State = GreedyKernelInducingPointsState;

    fn reduce<'a>(
        &self,
        dataset: &'a SupervisedData,
        state: Option<GreedyKernelInducingPointsState>,
    ) -> Result<(
        Coresubset<'a, SupervisedData>,
        GreedyKernelInducingPointsState,
    )> {
        let initial = Coresubset::placeholder(0, self.coreset_size, dataset)?;
        self.refine(&initial, state)
    }
}

impl<K: Kernel> RefinementSolver<SupervisedData> for GreedyKernelInducingPoints<K> {
    fn refine<'a>(
        &self,
        coresubset: &Coresubset<'a, SupervisedData>,
        state: Option<GreedyKernelInducingPointsState>,
    ) -> Result<(
        Coresubset<'a, SupervisedData>,
        GreedyKernelInducingPointsState,
    )> {
        let dataset = coresubset.dataset();
        let n = dataset.len();
        let m = self.coreset_size;
        if self.unique && m > n {
            return Err(CoresetError::Sizing {
                coreset_size: m,
                dataset_size: n,
            });
        }
        let sentinel = n;

        // zero-weighted entries have not been selected yet
        let mut coreset_indices: Vec<usize> = coresubset
            .indices()
            .iter()
            .zip(coresubset.weights().iter())
            .map(|(&idx, &w)| if w > 0.0 { idx } else { sentinel })
            .collect();
        if m < coreset_indices.len() {
            warn!(
                "Requested coreset size {} is smaller than input 'coresubset' ({}), \
                 clipping to the correct size and proceeding...",
                m,
                coreset_indices.len()
            );
        }
        coreset_indices.resize(m, sentinel);

        let feature_gramian = match state {
            Some(state) if state.feature_gramian.covers(n) => state.feature_gramian,
            Some(state) => {
                return Err(CoresetError::ShapeMismatch(format!(
                    "cached feature gramian of {} points has shape {:?} but the dataset has {}",
                    state.feature_gramian.size(),
                    state.feature_gramian.matrix().dim(),
                    n
                )))
            }
            None => {
                debug!("computing feature gramian of {} points", n);
                PrecomputedGramian::from(&self.feature_kernel, dataset.features())
            }
        };

        let mut padded_responses = Array1::<f64>::zeros(n + 1);
        padded_responses
            .slice_mut(ndarray::s![..n])
            .assign(&dataset.responses());

        let batch_size = match self.batch_size {
            Some(batch_size) if batch_size < n => batch_size,
            _ => n,
        };
        let batch_indices = sample_batch_indices(self.random_key, n, batch_size, m)?;
        debug!(
            "greedy kernel inducing points selecting {} of {} points in batches of {}",
            m, n, batch_size
        );

        // one candidate coresubset per row
        let mut candidates = Array2::from_shape_fn((batch_size, m), |(_, c)| coreset_indices[c]);
        if m > 0 {
            candidates.column_mut(0).assign(&batch_indices.row(0));
        }

        // zero diagonal entries leave the systems of unfilled positions unregularised
        let mut identity_diag: Array1<f64> = coreset_indices
            .iter()
            .map(|&idx| if idx != sentinel { 1.0 } else { 0.0 })
            .collect();

        for i in 0..m {
            identity_diag[i] = 1.0;
            let identity = Array2::from_diag(&identity_diag);
            let mut loss = greedy_kernel_inducing_points_loss(
                candidates.view(),
                padded_responses.view(),
                &feature_gramian,
                self.regularisation_parameter,
                identity.view(),
                self.least_squares_solver.as_ref(),
            )?;

            if self.unique {
                // the current entry of position i may be retained
                for (l, &candidate) in loss.iter_mut().zip(candidates.column(i).iter()) {
                    let taken = coreset_indices
                        .iter()
                        .enumerate()
                        .any(|(j, &idx)| j != i && idx == candidate);
                    if taken {
                        *l = f64::INFINITY;
                    }
                }
            }
            let chosen = match nan_argmin(loss.view()) {
                Some(r) if loss[r].is_finite() || !self.unique => candidates[(r, i)],
                _ => self.fallback_index(&coreset_indices, i, sentinel)?,
            };
            trace!("step {}: selected index {}", i, chosen);

            candidates.column_mut(i).fill(chosen);
            if i + 1 < m {
                candidates.column_mut(i + 1).assign(&batch_indices.row(i + 1));
            }
            coreset_indices[i] = chosen;
        }

        Ok((
            Coresubset::new(coreset_indices, dataset)?,
            GreedyKernelInducingPointsState { feature_gramian },
        ))
    }
}

impl<K: Kernel> GreedyKernelInducingPoints<K> {
    /// Picks an index for position `i` when every batch candidate is already taken.
    ///
    /// Keeps the current entry if there is one, otherwise takes the smallest unused index.
    fn fallback_index(
        &self,
        coreset_indices: &[usize],
        i: usize,
        sentinel: usize,
    ) -> Result<usize> {
        let current = coreset_indices[i];
        if current != sentinel {
            return Ok(current);
        }
        (0..sentinel)
            .find(|idx| !coreset_indices.contains(idx))
            .ok_or_else(|| CoresetError::Sampling(format!("no unused index left in step {i}")))
    }
}
