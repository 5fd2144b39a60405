use log::debug;

use crate::data::Data;
use crate::error::CoresetError;
use crate::kernel::SquaredExponentialKernel;
use crate::random::RandomKey;
use crate::solvers::{RPCholesky, Solver};
use crate::tests::{
    init,
    test_data::{is_unique, make_clusters, make_gaussian},
};

#[test]
fn test_rpcholesky_picks_one_point_per_cluster() {
    init();
    let centers = [
        [0.0, 0.0],
        [20.0, 0.0],
        [0.0, 20.0],
        [20.0, 20.0],
        [10.0, 10.0],
    ];
    let (x, labels) = make_clusters(&centers, 100, 0.01, 3);
    let data = Data::new(x);
    let kernel = SquaredExponentialKernel::new(1.0);

    let trials = 20;
    let mut recovered = 0;
    for seed in 0..trials {
        let solver = RPCholesky::new(5, RandomKey::new(seed), kernel.clone());
        let (coresubset, state) = solver.reduce(&data, None).unwrap();
        assert_eq!(state.gramian_diagonal.len(), 500);
        assert!(state.gramian_diagonal.iter().all(|&d| (d - 1.0).abs() < 1e-12));

        let mut clusters: Vec<usize> = coresubset.indices().iter().map(|&i| labels[i]).collect();
        clusters.sort_unstable();
        if clusters == vec![0, 1, 2, 3, 4] {
            recovered += 1;
        }
    }
    debug!("one pivot per cluster in {} of {} runs", recovered, trials);
    assert!(recovered >= trials - 2);
}

#[test]
fn test_rpcholesky_is_reproducible() {
    let data = Data::new(make_gaussian(80, 2, 21));
    let solver = RPCholesky::new(12, RandomKey::new(5), SquaredExponentialKernel::new(0.7));
    let (first, state) = solver.reduce(&data, None).unwrap();
    let (second, _) = solver.reduce(&data, Some(state)).unwrap();
    assert_eq!(first.indices(), second.indices());
    assert_eq!(first.len(), 12);
    assert!(is_unique(first.indices()));
}

#[test]
fn test_rpcholesky_exhausts_dataset() {
    // once every point is explained the remaining pivots are drawn uniformly
    let data = Data::new(make_gaussian(10, 2, 22));
    let solver = RPCholesky::new(10, RandomKey::new(9), SquaredExponentialKernel::new(5.0));
    let (coresubset, _) = solver.reduce(&data, None).unwrap();
    let mut indices = coresubset.indices().to_vec();
    indices.sort_unstable();
    assert_eq!(indices, (0..10).collect::<Vec<_>>());
}

#[test]
fn test_rpcholesky_sizes() {
    let data = Data::new(make_gaussian(10, 2, 23));
    let kernel = SquaredExponentialKernel::new(1.0);

    let (empty, _) = RPCholesky::new(0, RandomKey::new(0), kernel.clone())
        .reduce(&data, None)
        .unwrap();
    assert!(empty.is_empty());

    let result = RPCholesky::new(11, RandomKey::new(0), kernel.clone()).reduce(&data, None);
    assert!(matches!(result, Err(CoresetError::Sizing { .. })));

    let (repeated, _) = RPCholesky::new(6, RandomKey::new(0), kernel)
        .with_unique(false)
        .reduce(&data, None)
        .unwrap();
    assert_eq!(repeated.len(), 6);
}
