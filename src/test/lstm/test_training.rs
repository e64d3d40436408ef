use crate::lstm::step_1_tensor_preparation::build_windows;
use crate::lstm::step_3_lstm_model_arch::PriceLstmModelConfig;
use crate::lstm::step_4_train_model::{LstmRegressor, Regressor};
use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use burn_autodiff::Autodiff;
use burn_ndarray::{NdArray, NdArrayDevice};

type TrainBackend = Autodiff<NdArray<f32>>;

fn tiny_config() -> PriceLstmModelConfig {
    PriceLstmModelConfig {
        input_size: 1,
        lstm_units: 4,
        dense_units: 8,
        dense_layers: 2,
        output_size: 1,
    }
}

fn wave(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 0.5 + 0.4 * (i as f64 * 0.3).sin())
        .collect()
}

#[test]
fn test_model_output_shape() {
    let device = NdArrayDevice::default();
    let model = tiny_config().init::<NdArray<f32>>(&device);

    let input = Tensor::<NdArray<f32>, 3>::zeros([5, 24, 1], &device);
    let output = model.forward(input);
    assert_eq!(output.dims(), [5, 1]);
}

#[test]
fn test_regressor_fit_reduces_loss() {
    TrainBackend::seed(42);
    let device = NdArrayDevice::default();
    let windows = build_windows(&wave(60), 6);

    let mut regressor = LstmRegressor::<TrainBackend>::new(&tiny_config(), 0.01, &device);
    let history = regressor.fit(&windows, 30, 0).unwrap();

    assert_eq!(history.len(), 30);
    assert!(history.iter().all(|l| l.is_finite()));
    let best = history.iter().copied().fold(f64::INFINITY, f64::min);
    assert!(
        best < history[0],
        "loss never improved: first {} best {}",
        history[0],
        best
    );
}

#[test]
fn test_regressor_predicts_one_value_per_window() {
    let device = NdArrayDevice::default();
    let windows = build_windows(&wave(40), 6);

    let mut regressor = LstmRegressor::<TrainBackend>::new(&tiny_config(), 0.01, &device);
    regressor.fit(&windows, 2, 8).unwrap();

    let predictions = regressor.predict(&windows.inputs).unwrap();
    assert_eq!(predictions.len(), windows.len());
    assert!(predictions.iter().all(|p| p.is_finite()));
}

#[test]
fn test_regressor_rejects_empty_windows() {
    let device = NdArrayDevice::default();
    let mut regressor = LstmRegressor::<TrainBackend>::new(&tiny_config(), 0.01, &device);
    assert!(regressor.fit(&build_windows(&[0.1, 0.2], 6), 1, 0).is_err());
    assert!(regressor.predict(&[]).is_err());
}
