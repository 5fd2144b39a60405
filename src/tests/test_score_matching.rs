use approx::assert_abs_diff_eq;
use ndarray::{array, Array1, ArrayView1};

use crate::error::CoresetError;
use crate::kde::GaussianKde;
use crate::score_matching::{AnalyticScore, KernelDensityMatching, ScoreFunction, ScoreMatching};
use crate::tests::test_data::make_gaussian;

#[test]
fn test_kernel_density_score_points_to_data() {
    let x = array![[-1.0], [1.0]];
    let w = Array1::ones(2);
    let score = KernelDensityMatching::new(1.0).fit(x.view(), w.view()).unwrap();
    assert_abs_diff_eq!(score.score(array![0.0].view())[0], 0.0, epsilon = 1e-12);
    assert!(score.score(array![3.0].view())[0] < 0.0);
    assert!(score.score(array![-3.0].view())[0] > 0.0);
    // far from every sample the score is dominated by the nearest one
    assert_abs_diff_eq!(score.score(array![50.0].view())[0], -49.0, epsilon = 1e-6);
}

#[test]
fn test_kernel_density_jacobian_matches_finite_differences() {
    let x = make_gaussian(25, 2, 61);
    let w: Array1<f64> = (0..25).map(|i| 0.5 + (i % 3) as f64).collect();
    let score = KernelDensityMatching::new(0.7).fit(x.view(), w.view()).unwrap();
    let numeric = AnalyticScore::new(|p: ArrayView1<f64>| score.score(p));
    for point in [array![0.1, -0.2], array![1.5, 0.7]] {
        let analytic = score.jacobian_diagonal(point.view());
        let approx = numeric.jacobian_diagonal(point.view());
        for k in 0..2 {
            assert_abs_diff_eq!(analytic[k], approx[k], epsilon = 1e-5);
        }
    }
}

#[test]
fn test_kernel_density_matching_validates_input() {
    let x = array![[0.0], [1.0]];
    let result = KernelDensityMatching::new(0.0).fit(x.view(), Array1::ones(2).view());
    assert!(matches!(result, Err(CoresetError::InvalidParameter(_))));
    let result = KernelDensityMatching::new(1.0).fit(x.view(), Array1::ones(3).view());
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
}

#[test]
fn test_gaussian_kde_logpdf() {
    // a single-bandwidth estimate over two samples
    let x = array![[-1.0], [1.0]];
    let w = Array1::ones(2);
    let kde = GaussianKde::new(x.view(), w.view(), Some(0.5)).unwrap();
    // covariance: Σ w (x - μ)² / (1 - Σw²) = 1 / 0.5 = 2, bandwidth variance 2 · 0.25
    let var: f64 = 0.5;
    let expected = |y: f64| {
        let density = 0.5
            * ((-(y + 1.0).powi(2) / (2.0 * var)).exp() + (-(y - 1.0).powi(2) / (2.0 * var)).exp())
            / (2.0 * std::f64::consts::PI * var).sqrt();
        density.ln()
    };
    let logpdf = kde.logpdf(array![[0.0], [1.0], [4.0]].view());
    assert_abs_diff_eq!(logpdf[0], expected(0.0), epsilon = 1e-10);
    assert_abs_diff_eq!(logpdf[1], expected(1.0), epsilon = 1e-10);
    assert_abs_diff_eq!(logpdf[2], expected(4.0), epsilon = 1e-10);
}

#[test]
fn test_gaussian_kde_needs_two_samples() {
    let x = array![[0.5, 0.5]];
    let result = GaussianKde::new(x.view(), Array1::ones(1).view(), None);
    assert!(matches!(result, Err(CoresetError::InvalidParameter(_))));
    let x = array![[0.0], [1.0]];
    let result = GaussianKde::new(x.view(), Array1::zeros(2).view(), None);
    assert!(matches!(result, Err(CoresetError::InvalidWeights(_))));
}
