use log::{debug, trace};
use ndarray::{Array1, Axis};

use super::check_size;
use crate::coreset::Coresubset;
use crate::data::Dataset;
use crate::error::{CoresetError, Result};
use crate::kernel::{CachedKernel, Kernel};

const MAX_CACHED_ROWS: usize = 64;

/// Runs `output_size` steps of greedy kernel-based point selection.
///
/// Shorter initial coresubsets are padded with zero-weighted entries. The kernel similarity
/// penalty starts as the weighted mean kernel value between every point and the
/// positively weighted entries of `coresubset`; in step `i` the selection function receives
/// the penalty (NaN for points of zero weight, which may not be chosen) and returns the
/// index written to position `i`. The kernel row of the chosen point is then added to the
/// penalty, and with `unique` set its own penalty becomes `+∞`.
///
/// * `selection_function`: maps step and penalty to the chosen index (`None` if no point
///   can be selected)
/// * `block_size`: block size of the initial kernel mean computation
pub fn greedy_kernel_selection<'a, D, K, F>(
    coresubset: &Coresubset<'a, D>,
    mut selection_function: F,
    output_size: usize,
    kernel: &K,
    unique: bool,
    block_size: Option<usize>,
) -> Result<Coresubset<'a, D>>
where
    D: Dataset,
    K: Kernel,
    F: FnMut(usize, &Array1<f64>) -> Option<usize>,
{
    let dataset = coresubset.dataset();
    let x = dataset.features();
    let weights = dataset.weights();
    let n = dataset.len();
    check_size(output_size, n, unique || n == 0)?;

    let mut indices = coresubset.indices().to_vec();
    let mut coreset_weights = coresubset.weights().to_vec();
    if indices.len() < output_size {
        indices.resize(output_size, 0);
        coreset_weights.resize(output_size, 0.0);
    }
    debug!(
        "greedy selection of {} points from {} candidates (initial entries: {})",
        output_size,
        n,
        coresubset.len()
    );

    let coreset_points = x.select(Axis(0), &indices);
    let coreset_weights = Array1::from(coreset_weights);
    let mut penalty = kernel.compute_mean(
        x,
        None,
        coreset_points.view(),
        Some(coreset_weights.view()),
        Axis(1),
        block_size,
    );

    let capacity = if unique {
        1
    } else {
        usize::min(output_size, MAX_CACHED_ROWS)
    };
    let mut rows = CachedKernel::from(kernel, x, capacity);
    for i in 0..output_size {
        let valid_penalty: Array1<f64> = penalty
            .iter()
            .zip(weights.iter())
            .map(|(&p, &w)| if w > 0.0 { p } else { f64::NAN })
            .collect();
        let chosen = selection_function(i, &valid_penalty).ok_or_else(|| {
            CoresetError::Sampling(format!("no selectable point left in step {i}"))
        })?;
        if chosen >= n {
            return Err(CoresetError::IndexOutOfBounds {
                index: chosen,
                len: n,
            });
        }
        trace!("step {}: selected index {}", i, chosen);
        indices[i] = chosen;
        rows.use_rows(&[chosen], &mut |ki: Vec<&[f64]>| {
            for (p, &k) in penalty.iter_mut().zip(ki[0].iter()) {
                *p += k;
            }
        });
        if unique {
            penalty[chosen] = f64::INFINITY;
        }
    }
    indices.truncate(output_size);
    Coresubset::new(indices, dataset)
}
