//! (Regularised) Stein thinning
use log::{debug, warn};
use ndarray::Array1;

use super::greedy::greedy_kernel_selection;
use super::{check_size, RefinementSolver, Solver};
use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::Result;
use crate::kde::GaussianKde;
use crate::kernel::{DifferentiableKernel, Kernel, SteinKernel};
use crate::max::nan_argmin;
use crate::score_matching::{CachedScore, KernelDensityMatching, ScoreFunction, ScoreMatching};

/// Stein thinning: deterministic greedy minimisation of the kernelised Stein discrepancy.
///
/// Having selected `T` points, the next point minimises
/// `k_p(x, x) + 2 Σₜ k_p(x, xₜ) + Δ⁺ log p(x) - λ T log p(x)` where `k_p` is the Stein
/// kernel induced by the base kernel and the score function. The last two terms are only
/// present with regularisation enabled: `Δ⁺` sums the positive part of the diagonal of the
/// score Jacobian, `log p` is a kernel density estimate and `λ = 1 / coreset length`.
///
/// The score function is taken from (in this order) the configured score matching, the
/// configured score function, or a kernel density estimate using the length scale of the
/// base kernel (`1.0` if it has none). Its values at the dataset points are computed once.
///
/// If no density estimate can be fitted (a single effective sample or a singular
/// covariance, e.g. a constant feature), the regularisation terms are dropped with a
/// warning.
pub struct SteinThinning<K: DifferentiableKernel> {
    /// Number of points in the coresubset
    pub coreset_size: usize,
    /// Base kernel of the Stein kernel
    pub kernel: K,
    /// Known score function of the target distribution
    pub score_function: Option<Box<dyn ScoreFunction>>,
    /// Procedure estimating the score function from the dataset
    pub score_matching: Option<Box<dyn ScoreMatching>>,
    /// Whether every point may be selected at most once
    pub unique: bool,
    /// Whether to apply the Laplace correction and entropic regularisation
    pub regularise: bool,
    /// Block size of the kernel mean computations (`None` for a single block)
    pub block_size: Option<usize>,
}

impl<K: DifferentiableKernel> SteinThinning<K> {
    const DEFAULT_UNIQUE: bool = true;
    const DEFAULT_REGULARISE: bool = true;
    const DEFAULT_LENGTH_SCALE: f64 = 1.0;

    /// Creates a [`SteinThinning`] solver.
    pub fn new(coreset_size: usize, kernel: K) -> Self {
        SteinThinning {
            coreset_size,
            kernel,
            score_function: None,
            score_matching: None,
            unique: Self::DEFAULT_UNIQUE,
            regularise: Self::DEFAULT_REGULARISE,
            block_size: None,
        }
    }

    /// Sets a known score function.
    pub fn with_score_function(mut self, score_function: Box<dyn ScoreFunction>) -> Self {
        self.score_function = Some(score_function);
        self
    }

    /// Sets the score matching procedure.
    pub fn with_score_matching(mut self, score_matching: Box<dyn ScoreMatching>) -> Self {
        self.score_matching = Some(score_matching);
        self
    }

    /// Sets whether indices must be unique.
    pub fn with_unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Sets whether to regularise.
    pub fn with_regularise(mut self, regularise: bool) -> Self {
        self.regularise = regularise;
        self
    }

    /// Sets the block size of the kernel mean computations.
    pub fn with_block_size(mut self, block_size: usize) -> Self {
        self.block_size = Some(block_size);
        self
    }
}

impl<D: Dataset, K: DifferentiableKernel> Solver<D> for SteinThinning<K> {
    type State = ();

    fn reduce<'a>(&self, dataset: &'a D, state: Option<()>) -> Result<(Coresubset<'a, D>, ())> {
        let initial = Coresubset::placeholder(0, self.coreset_size, dataset)?;
        self.refine(&initial, state)
    }
}

impl<D: Dataset, K: DifferentiableKernel> RefinementSolver<D> for SteinThinning<K> {
    fn refine<'a>(
        &self,
        coresubset: &Coresubset<'a, D>,
        _state: Option<()>,
    ) -> Result<(Coresubset<'a, D>, ())> {
        let dataset = coresubset.dataset();
        let (x, w) = (dataset.features(), dataset.weights());
        let n = dataset.len();
        check_size(self.coreset_size, n, self.unique)?;

        let fitted: Box<dyn ScoreFunction>;
        let score: &dyn ScoreFunction = match (&self.score_matching, &self.score_function) {
            (Some(matching), _) => {
                fitted = matching.fit(x, w)?;
                fitted.as_ref()
            }
            (None, Some(score_function)) => score_function.as_ref(),
            (None, None) => {
                let length_scale = self
                    .kernel
                    .length_scale()
                    .unwrap_or(Self::DEFAULT_LENGTH_SCALE);
                fitted = KernelDensityMatching::new(length_scale).fit(x, w)?;
                fitted.as_ref()
            }
        };
        let score = CachedScore::from(score, x);
        debug!("cached score of {} distinct points", score.size());
        let stein_kernel = SteinKernel::new(&self.kernel, &score);
        let stein_kernel_diagonal = stein_kernel.diagonal(x);

        let kde = if self.regularise && n > 0 {
            // no length scale: the density estimate falls back to Scott's rule
            match GaussianKde::new(x, w, self.kernel.length_scale()) {
                Ok(kde) => Some(kde),
                Err(err) => {
                    warn!("skipping Stein thinning regularisation: {}", err);
                    None
                }
            }
        } else {
            None
        };
        let (laplace_correction, regularised_log_pdf) = if let Some(kde) = kde {
            let regulariser_lambda = 1.0 / coresubset.len().max(1) as f64;
            let regularised_log_pdf = kde.logpdf(x) * regulariser_lambda;
            let laplace_correction: Array1<f64> = x
                .outer_iter()
                .map(|xi| score.jacobian_diagonal(xi).mapv(|v| v.max(0.0)).sum())
                .collect();
            debug!("regularised Stein thinning with λ = {}", regulariser_lambda);
            (laplace_correction, regularised_log_pdf)
        } else {
            (Array1::zeros(n), Array1::zeros(n))
        };

        let selection_function = |i: usize, penalty: &Array1<f64>| {
            let ksd = &stein_kernel_diagonal + &(penalty * 2.0);
            let objective = ksd + &laplace_correction - &(&regularised_log_pdf * i as f64);
            nan_argmin(objective.view())
        };
        let refined = greedy_kernel_selection(
            coresubset,
            selection_function,
            self.coreset_size,
            &stein_kernel,
            self.unique,
            self.block_size,
        )?;
        Ok((refined, ()))
    }
}
