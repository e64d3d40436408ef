// External imports
use burn::module::Module;
use burn::nn::{Linear, LinearConfig};
use burn::tensor::{activation, backend::Backend, Tensor};
use serde::{Deserialize, Serialize};

// Internal imports
use super::step_2_lstm_cell::PriceLstmCell;
use crate::constants::{DENSE_LAYERS, DENSE_UNITS, LSTM_UNITS};

/// LSTM followed by a stack of GELU dense layers and a single-unit GELU head
#[derive(Module, Debug)]
pub struct PriceLstmModel<B: Backend> {
    lstm: PriceLstmCell<B>,
    dense_layers: Vec<Linear<B>>,
    output_layer: Linear<B>,
}

impl<B: Backend> PriceLstmModel<B> {
    /// Create a new model
    ///
    /// # Arguments
    ///
    /// * `config` - Layer sizes
    /// * `device` - Device to place tensors on
    pub fn new(config: &PriceLstmModelConfig, device: &B::Device) -> Self {
        let lstm = PriceLstmCell::new(config.input_size, config.lstm_units, device);

        let mut dense_layers = Vec::with_capacity(config.dense_layers);
        let mut width = config.lstm_units;
        for _ in 0..config.dense_layers {
            dense_layers.push(LinearConfig::new(width, config.dense_units).init(device));
            width = config.dense_units;
        }

        let output_layer = LinearConfig::new(width, config.output_size).init(device);

        Self {
            lstm,
            dense_layers,
            output_layer,
        }
    }

    /// Forward pass
    ///
    /// # Arguments
    ///
    /// * `x` - Input tensor of shape [batch_size, sequence_length, input_size]
    ///
    /// # Returns
    ///
    /// Returns the output tensor of shape [batch_size, output_size]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 2> {
        let mut out = self.lstm.forward(x);
        for layer in &self.dense_layers {
            out = activation::gelu(layer.forward(out));
        }
        activation::gelu(self.output_layer.forward(out))
    }
}

/// Layer sizes of [`PriceLstmModel`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLstmModelConfig {
    pub input_size: usize,
    pub lstm_units: usize,
    pub dense_units: usize,
    pub dense_layers: usize,
    pub output_size: usize,
}

impl Default for PriceLstmModelConfig {
    fn default() -> Self {
        Self {
            input_size: 1,
            lstm_units: LSTM_UNITS,
            dense_units: DENSE_UNITS,
            dense_layers: DENSE_LAYERS,
            output_size: 1,
        }
    }
}

impl PriceLstmModelConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> PriceLstmModel<B> {
        PriceLstmModel::new(self, device)
    }
}
