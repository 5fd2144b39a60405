use crate::error::{CoresetError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};
use ndarray_linalg::LeastSquaresSvd;

pub fn solve_minimal_norm(mat: ArrayView2<f64>, rhs: ArrayView1<f64>) -> Result<Array1<f64>> {
    if rhs.is_empty() {
        return Ok(Array1::zeros(0));
    }
    let result = mat
        .least_squares(&rhs)
        .map_err(|err| CoresetError::LinearAlgebra(err.to_string()))?;
    Ok(result.solution)
}
