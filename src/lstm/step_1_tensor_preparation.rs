// External crates
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor};
use log::debug;

// Internal modules
use crate::error::{ForecastError, Result};
use crate::util::pre_processor::PricePoint;

/// Sliding-window samples: each input is `n_steps` consecutive values and
/// each target is the value right after its window
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WindowSet {
    pub inputs: Vec<Vec<f64>>,
    pub targets: Vec<f64>,
}

impl WindowSet {
    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    /// Window length, or 0 for an empty set
    pub fn n_steps(&self) -> usize {
        self.inputs.first().map(Vec::len).unwrap_or(0)
    }
}

/// Builds sliding windows over an ordered series
///
/// # Arguments
///
/// * `values` - Scaled values in chronological order
/// * `n_steps` - Window length
///
/// # Returns
///
/// Returns `values.len() - n_steps` windows in source order, or an empty set
/// when the series is not longer than the window
pub fn build_windows(values: &[f64], n_steps: usize) -> WindowSet {
    if n_steps == 0 || values.len() <= n_steps {
        return WindowSet::default();
    }

    let count = values.len() - n_steps;
    let mut inputs = Vec::with_capacity(count);
    let mut targets = Vec::with_capacity(count);

    for start in 0..count {
        inputs.push(values[start..start + n_steps].to_vec());
        targets.push(values[start + n_steps]);
    }

    WindowSet { inputs, targets }
}

/// Splits the series chronologically; the last `test_size` records form the test set
///
/// # Returns
///
/// Returns `(train, test)` or `InsufficientData` when nothing would be left to train on
pub fn split_train_test(
    series: &[PricePoint],
    test_size: usize,
) -> Result<(&[PricePoint], &[PricePoint])> {
    if series.len() <= test_size {
        return Err(ForecastError::InsufficientData(format!(
            "{} records cannot be split into a training set and a {}-record test set",
            series.len(),
            test_size
        )));
    }

    let split_idx = series.len() - test_size;
    Ok(series.split_at(split_idx))
}

/// Flattens window inputs into a `[samples, n_steps, 1]` tensor
pub fn inputs_to_tensor<B: Backend>(
    inputs: &[Vec<f64>],
    device: &B::Device,
) -> Result<Tensor<B, 3>> {
    let n_samples = inputs.len();
    let n_steps = inputs.first().map(Vec::len).unwrap_or(0);
    if n_samples == 0 || n_steps == 0 {
        return Err(ForecastError::InsufficientData(
            "no windows to convert into a tensor".into(),
        ));
    }

    let mut feature_buffer = Vec::with_capacity(n_samples * n_steps);
    for (idx, window) in inputs.iter().enumerate() {
        if window.len() != n_steps {
            return Err(ForecastError::InvalidData(format!(
                "window {} has {} steps, expected {}",
                idx,
                window.len(),
                n_steps
            )));
        }
        feature_buffer.extend(window.iter().map(|&v| v as f32));
    }

    let shape = Shape::new([n_samples, n_steps, 1]);
    Ok(Tensor::<B, 1>::from_floats(feature_buffer.as_slice(), device).reshape(shape))
}

/// Converts a window set into `(features [samples, n_steps, 1], targets [samples, 1])`
pub fn windows_to_tensors<B: Backend>(
    windows: &WindowSet,
    device: &B::Device,
) -> Result<(Tensor<B, 3>, Tensor<B, 2>)> {
    if windows.inputs.len() != windows.targets.len() {
        return Err(ForecastError::DimensionMismatch {
            left: windows.inputs.len(),
            right: windows.targets.len(),
        });
    }

    let features = inputs_to_tensor::<B>(&windows.inputs, device)?;

    let target_buffer: Vec<f32> = windows.targets.iter().map(|&v| v as f32).collect();
    let targets = Tensor::<B, 1>::from_floats(target_buffer.as_slice(), device)
        .reshape(Shape::new([windows.len(), 1]));

    debug!(
        "Window tensors: features {:?}, targets {:?}",
        features.dims(),
        targets.dims()
    );

    Ok((features, targets))
}
