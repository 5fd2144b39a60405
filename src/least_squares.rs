//! Regularised least-squares solvers for stacks of small linear systems
#[cfg(feature = "lapack")]
mod lapack;
#[cfg(feature = "lapack")]
use lapack::solve_minimal_norm;
#[cfg(not(feature = "lapack"))]
mod nolapack;
#[cfg(not(feature = "lapack"))]
use nolapack::solve_minimal_norm;

use ndarray::{Array2, ArrayView2, ArrayView3, Axis};

use crate::error::{CoresetError, Result};

/// Solver for stacks of regularised linear systems `(A + |λ| I) x = b`
pub trait RegularisedLeastSquaresSolver {
    /// Solves one regularised system per leading index of `arrays` and `targets`.
    ///
    /// * `arrays`: stack of square matrices, shape `(b, m, m)`
    /// * `regularisation_parameter`: λ, negative values are replaced by `|λ|`
    /// * `targets`: stack of right-hand sides, shape `(b, m)`
    /// * `identity`: the `(m, m)` matrix scaled by `|λ|` and added to every system
    ///
    /// Returns the solutions with shape `(b, m)`.
    fn solve_stack(
        &self,
        arrays: ArrayView3<f64>,
        regularisation_parameter: f64,
        targets: ArrayView2<f64>,
        identity: ArrayView2<f64>,
    ) -> Result<Array2<f64>>;
}

/// Computes the solution of minimal Euclidean norm for every system.
///
/// Singular or ill-posed systems (for example ones containing all-zero rows) fall back
/// to the pseudo-inverse.
#[derive(Clone, Copy, Debug, Default)]
pub struct MinimalEuclideanNormSolver;

impl RegularisedLeastSquaresSolver for MinimalEuclideanNormSolver {
    fn solve_stack(
        &self,
        arrays: ArrayView3<f64>,
        regularisation_parameter: f64,
        targets: ArrayView2<f64>,
        identity: ArrayView2<f64>,
    ) -> Result<Array2<f64>> {
        let (b, m, m2) = arrays.dim();
        if m != m2 || targets.dim() != (b, m) || identity.dim() != (m, m) {
            return Err(CoresetError::ShapeMismatch(format!(
                "cannot solve systems of shape {:?} with targets {:?} and identity {:?}",
                arrays.dim(),
                targets.dim(),
                identity.dim()
            )));
        }
        let lambda = regularisation_parameter.abs();
        let mut solutions = Array2::zeros((b, m));
        for ((mat, rhs), mut sol) in arrays
            .axis_iter(Axis(0))
            .zip(targets.outer_iter())
            .zip(solutions.outer_iter_mut())
        {
            let regularised = &mat + &(&identity * lambda);
            sol.assign(&solve_minimal_norm(regularised.view(), rhs)?);
        }
        Ok(solutions)
    }
}
