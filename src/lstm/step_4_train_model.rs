// External imports
use anyhow::{anyhow, bail, Result};
use burn::module::AutodiffModule;
use burn::optim::{AdamConfig, GradientsParams, Optimizer};
use burn::tensor::backend::{AutodiffBackend, Backend};
use burn::tensor::cast::ToElement;
use burn::tensor::Tensor;
use log::{debug, info};

// Internal imports
use super::step_1_tensor_preparation::{inputs_to_tensor, windows_to_tensors, WindowSet};
use super::step_3_lstm_model_arch::{PriceLstmModel, PriceLstmModelConfig};

/// Narrow training/inference interface the forecast pipeline depends on
pub trait Regressor {
    /// Trains on the windows and returns the mean loss of every epoch
    ///
    /// A `batch_size` of 0 trains on the whole set as a single batch.
    fn fit(&mut self, windows: &WindowSet, epochs: usize, batch_size: usize) -> Result<Vec<f64>>;

    /// Predicts one value per input window
    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>>;
}

/// Mean squared error between predictions and targets
pub fn mse_loss<B: Backend>(predictions: Tensor<B, 2>, targets: Tensor<B, 2>) -> Tensor<B, 1> {
    let diff = predictions - targets;
    (diff.clone() * diff).mean()
}

fn batch_ranges(num_samples: usize, batch_size: usize) -> Vec<(usize, usize)> {
    let batch_size = if batch_size == 0 { num_samples } else { batch_size };
    let mut ranges = Vec::new();
    let mut start = 0;
    while start < num_samples {
        let end = usize::min(start + batch_size, num_samples);
        ranges.push((start, end - start));
        start = end;
    }
    ranges
}

/// [`Regressor`] backed by a burn [`PriceLstmModel`] trained with Adam on MSE
pub struct LstmRegressor<B: AutodiffBackend> {
    model: PriceLstmModel<B>,
    learning_rate: f64,
    log_interval: usize,
    device: B::Device,
}

impl<B: AutodiffBackend> LstmRegressor<B> {
    pub fn new(config: &PriceLstmModelConfig, learning_rate: f64, device: &B::Device) -> Self {
        info!(
            "Building LSTM({}) -> {} x Dense({}) -> Dense({})",
            config.lstm_units, config.dense_layers, config.dense_units, config.output_size
        );
        Self {
            model: config.init::<B>(device),
            learning_rate,
            log_interval: 100,
            device: device.clone(),
        }
    }

    /// Epochs between two info-level loss lines
    pub fn with_log_interval(mut self, log_interval: usize) -> Self {
        self.log_interval = log_interval.max(1);
        self
    }

    pub fn model(&self) -> &PriceLstmModel<B> {
        &self.model
    }
}

impl<B: AutodiffBackend> Regressor for LstmRegressor<B> {
    fn fit(&mut self, windows: &WindowSet, epochs: usize, batch_size: usize) -> Result<Vec<f64>> {
        if windows.is_empty() {
            bail!("cannot train on an empty window set");
        }

        let (features, targets) = windows_to_tensors::<B>(windows, &self.device)?;
        let num_samples = windows.len();
        let batches = batch_ranges(num_samples, batch_size);

        info!(
            "Training on {} windows for {} epochs ({} batches per epoch, lr = {})",
            num_samples,
            epochs,
            batches.len(),
            self.learning_rate
        );

        let mut model = self.model.clone();
        let mut optimizer = AdamConfig::new().init();
        let mut loss_history = Vec::with_capacity(epochs);

        for epoch in 1..=epochs {
            let mut epoch_loss = 0.0;
            for &(start, len) in &batches {
                let batch_features = features.clone().narrow(0, start, len);
                let batch_targets = targets.clone().narrow(0, start, len);

                let predictions = model.forward(batch_features);
                let loss = mse_loss(predictions, batch_targets);
                epoch_loss += loss.clone().into_scalar().to_f64();

                let grads = loss.backward();
                let grads = GradientsParams::from_grads(grads, &model);
                model = optimizer.step(self.learning_rate, model, grads);
            }

            let avg_loss = epoch_loss / batches.len() as f64;
            loss_history.push(avg_loss);

            if epoch % self.log_interval == 0 || epoch == epochs {
                info!("Epoch {}/{} - loss: {:.6}", epoch, epochs, avg_loss);
            } else {
                debug!("Epoch {}/{} - loss: {:.6}", epoch, epochs, avg_loss);
            }
        }

        self.model = model;
        Ok(loss_history)
    }

    fn predict(&self, inputs: &[Vec<f64>]) -> Result<Vec<f64>> {
        let model = self.model.valid();
        let features = inputs_to_tensor::<B::InnerBackend>(inputs, &self.device)?;

        let predictions = model.forward(features);
        let values = predictions
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|e| anyhow!("Failed to read predictions: {:?}", e))?;

        Ok(values.into_iter().map(f64::from).collect())
    }
}
