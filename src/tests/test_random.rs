use crate::error::CoresetError;
use crate::random::{sample_batch_indices, sample_indices, RandomKey};
use crate::tests::test_data::is_unique;

#[test]
fn test_keys_are_reproducible() {
    let key = RandomKey::new(42);
    assert_eq!(key.fold_in(3), RandomKey::new(42).fold_in(3));
    assert_ne!(key.fold_in(3), key.fold_in(4));
    let split = key.split(5);
    assert_eq!(split.len(), 5);
    assert_eq!(split, key.split(5));
    assert!(split.windows(2).all(|w| w[0] != w[1]));
}

#[test]
fn test_sample_without_replacement() {
    let key = RandomKey::new(0);
    let indices = sample_indices(key, 20, 20, None, false).unwrap();
    assert_eq!(indices.len(), 20);
    assert!(is_unique(&indices));
    assert_eq!(indices, sample_indices(key, 20, 20, None, false).unwrap());

    let result = sample_indices(key, 5, 6, None, false);
    assert!(matches!(result, Err(CoresetError::Sizing { .. })));
    assert_eq!(sample_indices(key, 5, 6, None, true).unwrap().len(), 6);
}

#[test]
fn test_weighted_sampling_skips_zero_weights() {
    let weights = [0.0, 1.0, 0.0, 2.0, 1.0, 0.0];
    let key = RandomKey::new(7);
    let with_replacement = sample_indices(key, 6, 50, Some(&weights), true).unwrap();
    assert!(with_replacement.iter().all(|&i| weights[i] > 0.0));

    let mut without = sample_indices(key, 6, 3, Some(&weights), false).unwrap();
    without.sort_unstable();
    assert_eq!(without, vec![1, 3, 4]);

    let result = sample_indices(key, 6, 4, Some(&weights), false);
    assert!(matches!(result, Err(CoresetError::Sampling(_))));
}

#[test]
fn test_batch_indices() {
    let key = RandomKey::new(11);
    let batches = sample_batch_indices(key, 30, 8, 5).unwrap();
    assert_eq!(batches.dim(), (5, 8));
    for row in batches.outer_iter() {
        let row = row.to_vec();
        assert!(is_unique(&row));
        assert!(row.iter().all(|&i| i < 30));
    }
    assert_eq!(batches, sample_batch_indices(key, 30, 8, 5).unwrap());

    let result = sample_batch_indices(key, 4, 8, 1);
    assert!(matches!(result, Err(CoresetError::InvalidParameter(_))));
}
