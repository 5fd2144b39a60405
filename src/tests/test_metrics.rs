use approx::assert_abs_diff_eq;
use ndarray::{Array1, Array2};

use crate::coreset::Coresubset;
use crate::data::{Data, Dataset};
use crate::error::CoresetError;
use crate::kernel::SquaredExponentialKernel;
use crate::metrics::MMD;
use crate::tests::test_data::make_gaussian;

#[test]
fn test_mmd_of_identical_sets_vanishes() {
    let x = make_gaussian(30, 2, 51);
    let w = Array1::ones(30);
    let mmd = MMD::new(SquaredExponentialKernel::new(1.0));
    let value = mmd.compute(x.view(), w.view(), x.view(), w.view()).unwrap();
    assert_abs_diff_eq!(value, 0.0, epsilon = 1e-6);

    // rescaled weights describe the same distribution
    let w2 = Array1::from_elem(30, 4.0);
    let value = mmd.compute(x.view(), w.view(), x.view(), w2.view()).unwrap();
    assert_abs_diff_eq!(value, 0.0, epsilon = 1e-6);
}

#[test]
fn test_mmd_of_two_points() {
    // MMD² = 2 - 2 k(x, y) for single points
    let x = Array2::from_elem((1, 1), 0.0);
    let y = Array2::from_elem((1, 1), 1.0);
    let w = Array1::ones(1);
    let mmd = MMD::new(SquaredExponentialKernel::new(1.0)).with_block_size(1);
    let value = mmd.compute(x.view(), w.view(), y.view(), w.view()).unwrap();
    assert_abs_diff_eq!(value, (2.0 - 2.0 * (-0.5f64).exp()).sqrt(), epsilon = 1e-12);
    let reverse = mmd.compute(y.view(), w.view(), x.view(), w.view()).unwrap();
    assert_abs_diff_eq!(value, reverse, epsilon = 1e-12);
}

#[test]
fn test_mmd_of_full_coresubset() {
    let data = Data::new(make_gaussian(20, 3, 52));
    let full = Coresubset::new((0..20).collect(), &data).unwrap();
    let mmd = MMD::new(SquaredExponentialKernel::new(1.0));
    assert_abs_diff_eq!(mmd.compute_coresubset(&full).unwrap(), 0.0, epsilon = 1e-6);

    let partial = Coresubset::new(vec![0, 1], &data).unwrap();
    assert!(mmd.compute_coresubset(&partial).unwrap() > 1e-3);
    assert_eq!(partial.points().nrows(), 2);
    assert_eq!(data.len(), 20);
}

#[test]
fn test_mmd_shape_mismatch() {
    let x = make_gaussian(5, 2, 53);
    let y = make_gaussian(5, 3, 54);
    let w = Array1::ones(5);
    let mmd = MMD::new(SquaredExponentialKernel::new(1.0));
    let result = mmd.compute(x.view(), w.view(), y.view(), w.view());
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
    let short = Array1::ones(4);
    let result = mmd.compute(x.view(), short.view(), x.view(), w.view());
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
}
