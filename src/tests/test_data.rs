//! Synthetic datasets shared by the tests
use ndarray::{Array1, Array2};
use rand::Rng;

use crate::random::RandomKey;

/// Draws one standard normal sample (Box-Muller).
pub fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen();
    (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
}

/// Samples `n` points from a standard normal distribution in `d` dimensions.
pub fn make_gaussian(n: usize, d: usize, seed: u64) -> Array2<f64> {
    let mut rng = RandomKey::new(seed).rng();
    Array2::from_shape_fn((n, d), |_| standard_normal(&mut rng))
}

/// Samples `per_cluster` points around every center and returns them with cluster labels.
pub fn make_clusters(
    centers: &[[f64; 2]],
    per_cluster: usize,
    std: f64,
    seed: u64,
) -> (Array2<f64>, Vec<usize>) {
    let mut rng = RandomKey::new(seed).rng();
    let n = centers.len() * per_cluster;
    let mut data = Array2::zeros((n, 2));
    let mut labels = Vec::with_capacity(n);
    for (c, center) in centers.iter().enumerate() {
        for p in 0..per_cluster {
            let i = c * per_cluster + p;
            data[(i, 0)] = center[0] + std * standard_normal(&mut rng);
            data[(i, 1)] = center[1] + std * standard_normal(&mut rng);
            labels.push(c);
        }
    }
    (data, labels)
}

/// Samples `n` inputs uniformly from `[0, 2π]` with responses `sin(x)`.
pub fn make_sinusoid(n: usize, seed: u64) -> (Array2<f64>, Array1<f64>) {
    let mut rng = RandomKey::new(seed).rng();
    let x: Array1<f64> = (0..n)
        .map(|_| rng.gen_range(0.0..2.0 * std::f64::consts::PI))
        .collect();
    let y = x.mapv(f64::sin);
    (x.insert_axis(ndarray::Axis(1)), y)
}

pub fn is_unique(indices: &[usize]) -> bool {
    let mut sorted = indices.to_vec();
    sorted.sort_unstable();
    sorted.windows(2).all(|w| w[0] != w[1])
}
