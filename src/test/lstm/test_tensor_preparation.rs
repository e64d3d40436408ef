use crate::error::ForecastError;
use crate::lstm::step_1_tensor_preparation::{
    build_windows, split_train_test, windows_to_tensors, WindowSet,
};
use crate::test::test_utils::generate_linear_series;
use burn::tensor::backend::Backend;
use burn_ndarray::{NdArray, NdArrayDevice};

type TestBackend = NdArray<f32>;

#[test]
fn test_window_count_and_targets() {
    let values: Vec<f64> = (0..100).map(|i| i as f64 * 0.5).collect();

    for n_steps in [1usize, 5, 24, 99] {
        let windows = build_windows(&values, n_steps);
        assert_eq!(windows.len(), values.len() - n_steps);
        assert_eq!(windows.inputs.len(), windows.targets.len());

        for (i, (input, target)) in windows.inputs.iter().zip(windows.targets.iter()).enumerate() {
            assert_eq!(input.as_slice(), &values[i..i + n_steps]);
            assert_eq!(*target, values[n_steps + i]);
        }
    }
}

#[test]
fn test_windows_keep_source_order() {
    let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0];
    let windows = build_windows(&values, 3);
    assert_eq!(
        windows.inputs,
        vec![
            vec![3.0, 1.0, 4.0],
            vec![1.0, 4.0, 1.0],
            vec![4.0, 1.0, 5.0],
            vec![1.0, 5.0, 9.0],
        ]
    );
    assert_eq!(windows.targets, vec![1.0, 5.0, 9.0, 2.0]);
}

#[test]
fn test_short_series_yields_no_windows() {
    assert!(build_windows(&[1.0, 2.0, 3.0], 3).is_empty());
    assert!(build_windows(&[1.0, 2.0], 3).is_empty());
    assert!(build_windows(&[], 3).is_empty());
    assert!(build_windows(&[1.0, 2.0], 0).is_empty());
    assert_eq!(build_windows(&[1.0, 2.0, 3.0, 4.0], 3).len(), 1);
}

#[test]
fn test_split_keeps_last_records_for_testing() {
    let series = generate_linear_series(100);
    let (train, test) = split_train_test(&series, 48).unwrap();
    assert_eq!(train.len(), 52);
    assert_eq!(test.len(), 48);
    assert_eq!(train.last().unwrap().close, 51.0);
    assert_eq!(test.first().unwrap().close, 52.0);

    assert!(matches!(
        split_train_test(&series[..48], 48),
        Err(ForecastError::InsufficientData(_))
    ));
}

#[test]
fn test_windows_to_tensors_shapes() {
    let device = <TestBackend as Backend>::Device::default();
    let values: Vec<f64> = (0..30).map(|i| i as f64 / 30.0).collect();
    let windows = build_windows(&values, 24);

    let (features, targets) = windows_to_tensors::<TestBackend>(&windows, &device).unwrap();
    assert_eq!(features.dims(), [6, 24, 1]);
    assert_eq!(targets.dims(), [6, 1]);

    let flat = targets.into_data().convert::<f32>().to_vec::<f32>().unwrap();
    for (i, v) in flat.iter().enumerate() {
        assert!((*v as f64 - values[24 + i]).abs() < 1e-6);
    }
}

#[test]
fn test_windows_to_tensors_rejects_bad_input() {
    let device = NdArrayDevice::default();

    let empty = WindowSet::default();
    assert!(windows_to_tensors::<TestBackend>(&empty, &device).is_err());

    let ragged = WindowSet {
        inputs: vec![vec![0.1, 0.2], vec![0.3]],
        targets: vec![0.3, 0.4],
    };
    assert!(matches!(
        windows_to_tensors::<TestBackend>(&ragged, &device),
        Err(ForecastError::InvalidData(_))
    ));

    let misaligned = WindowSet {
        inputs: vec![vec![0.1, 0.2]],
        targets: vec![0.3, 0.4],
    };
    assert!(matches!(
        windows_to_tensors::<TestBackend>(&misaligned, &device),
        Err(ForecastError::DimensionMismatch { .. })
    ));
}
