use crate::error::{CoresetError, Result};
use ndarray::{Array1, ArrayView1, ArrayView2};

use rulinalg::matrix::decomposition::PartialPivLu;
use rulinalg::matrix::Matrix;
use rulinalg::vector::Vector;

pub fn solve_minimal_norm(mat: ArrayView2<f64>, rhs: ArrayView1<f64>) -> Result<Array1<f64>> {
    let m = rhs.len();
    if m == 0 {
        return Ok(Array1::zeros(0));
    }
    let matrix = Matrix::new(m, m, mat.iter().cloned().collect::<Vec<f64>>());
    let vector = Vector::new(rhs.to_vec());
    if let Ok(mat_fact) = PartialPivLu::decompose(matrix.clone()) {
        if let Ok(sol) = mat_fact.solve(vector.clone()) {
            if sol.iter().all(|v| v.is_finite()) {
                return Ok(Array1::from(sol.into_vec()));
            }
        }
    }
    pseudo_inverse_solve(matrix, vector, m)
}

/// Applies the pseudo-inverse obtained from a singular value decomposition.
fn pseudo_inverse_solve(matrix: Matrix<f64>, rhs: Vector<f64>, m: usize) -> Result<Array1<f64>> {
    let (sigma, u, v) = matrix
        .svd()
        .map_err(|err| CoresetError::LinearAlgebra(err.to_string()))?;
    let s_max = (0..m).fold(0.0, |acc: f64, i| acc.max(sigma[[i, i]].abs()));
    let cutoff = f64::EPSILON * m as f64 * s_max;
    let mut sol = Array1::<f64>::zeros(m);
    for i in 0..m {
        let s = sigma[[i, i]];
        if s.abs() <= cutoff {
            continue;
        }
        let mut ui_rhs = 0.0;
        for r in 0..m {
            ui_rhs += u[[r, i]] * rhs[r];
        }
        let coeff = ui_rhs / s;
        for r in 0..m {
            sol[r] += v[[r, i]] * coeff;
        }
    }
    Ok(sol)
}
