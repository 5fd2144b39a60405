use approx::assert_abs_diff_eq;
use ndarray::{array, Array2, Array3};

use crate::error::CoresetError;
use crate::least_squares::{MinimalEuclideanNormSolver, RegularisedLeastSquaresSolver};

#[test]
fn test_solve_regularised_stack() {
    let mut arrays = Array3::zeros((2, 2, 2));
    arrays
        .index_axis_mut(ndarray::Axis(0), 0)
        .assign(&array![[2.0, 1.0], [1.0, 3.0]]);
    arrays
        .index_axis_mut(ndarray::Axis(0), 1)
        .assign(&array![[4.0, 0.0], [0.0, 1.0]]);
    let targets = array![[3.0, 4.0], [2.0, 2.0]];
    let identity = Array2::eye(2);

    // negative parameters act as their absolute value
    let solutions = MinimalEuclideanNormSolver
        .solve_stack(arrays.view(), -1.0, targets.view(), identity.view())
        .unwrap();
    // [[3, 1], [1, 4]] x = [3, 4]
    assert_abs_diff_eq!(solutions[(0, 0)], 8.0 / 11.0, epsilon = 1e-10);
    assert_abs_diff_eq!(solutions[(0, 1)], 9.0 / 11.0, epsilon = 1e-10);
    // diag(5, 2) x = [2, 2]
    assert_abs_diff_eq!(solutions[(1, 0)], 0.4, epsilon = 1e-10);
    assert_abs_diff_eq!(solutions[(1, 1)], 1.0, epsilon = 1e-10);
}

#[test]
fn test_singular_system_gives_minimal_norm_solution() {
    let mut arrays = Array3::zeros((1, 3, 3));
    arrays
        .index_axis_mut(ndarray::Axis(0), 0)
        .assign(&array![[1.0, 0.0, 0.0], [0.0, 2.0, 0.0], [0.0, 0.0, 0.0]]);
    let targets = array![[2.0, 4.0, 0.0]];
    let identity = Array2::from_diag(&array![1.0, 1.0, 0.0]);
    let solutions = MinimalEuclideanNormSolver
        .solve_stack(arrays.view(), 1.0, targets.view(), identity.view())
        .unwrap();
    assert_abs_diff_eq!(solutions[(0, 0)], 1.0, epsilon = 1e-10);
    assert_abs_diff_eq!(solutions[(0, 1)], 4.0 / 3.0, epsilon = 1e-10);
    assert_abs_diff_eq!(solutions[(0, 2)], 0.0, epsilon = 1e-10);
}

#[test]
fn test_shape_mismatch() {
    let arrays = Array3::zeros((2, 3, 3));
    let targets = Array2::zeros((2, 2));
    let identity = Array2::eye(3);
    let result =
        MinimalEuclideanNormSolver.solve_stack(arrays.view(), 1.0, targets.view(), identity.view());
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
}

#[test]
fn test_empty_systems() {
    let arrays = Array3::zeros((4, 0, 0));
    let targets = Array2::zeros((4, 0));
    let identity = Array2::eye(0);
    let solutions = MinimalEuclideanNormSolver
        .solve_stack(arrays.view(), 1.0, targets.view(), identity.view())
        .unwrap();
    assert_eq!(solutions.dim(), (4, 0));
}
