use ndarray::{array, Array1};

use crate::coreset::Coresubset;
use crate::data::{Data, Dataset};
use crate::error::CoresetError;
use crate::tests::test_data::make_gaussian;

#[test]
fn test_coresubset_construction() {
    let data = Data::new(make_gaussian(5, 2, 71));
    let coresubset =
        Coresubset::with_weights(vec![4, 0, 2], array![1.0, 0.0, 2.0], &data).unwrap();
    assert_eq!(coresubset.len(), 3);
    assert_eq!(coresubset.selected(), vec![4, 2]);
    let points = coresubset.points();
    assert_eq!(points.row(0), data.point(4));
    assert_eq!(points.row(2), data.point(2));

    let placeholder = Coresubset::placeholder(0, 5, &data).unwrap();
    assert!(placeholder.selected().is_empty());
    assert!(placeholder.weights().iter().all(|&w| w == 0.0));
}

#[test]
fn test_coresubset_validation() {
    let data = Data::new(make_gaussian(3, 2, 72));
    let result = Coresubset::new(vec![0, 1, 2, 0], &data);
    match result {
        Err(err @ CoresetError::Sizing { .. }) => {
            assert!(err.to_string().contains("by definition of a coreset"))
        }
        other => panic!("expected sizing error, got {:?}", other.map(|c| c.len())),
    }
    let result = Coresubset::new(vec![3], &data);
    assert!(matches!(
        result,
        Err(CoresetError::IndexOutOfBounds { index: 3, len: 3 })
    ));
    let result = Coresubset::with_weights(vec![0, 1], Array1::ones(3), &data);
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
}

#[test]
fn test_data_weights_are_validated() {
    let x = make_gaussian(3, 1, 73);
    assert_eq!(Data::new(x.clone()).weights(), Array1::<f64>::ones(3));
    let result = Data::new(x.clone()).with_weights(array![1.0, -1.0, 0.0]);
    assert!(matches!(result, Err(CoresetError::InvalidWeights(_))));
    let result = Data::new(x).with_weights(array![1.0, 1.0]);
    assert!(matches!(result, Err(CoresetError::ShapeMismatch(_))));
}
