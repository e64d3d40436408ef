// External crates
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

// Local modules
use crate::constants;
use crate::error::Result;
use crate::lstm::step_3_lstm_model_arch::PriceLstmModelConfig;
use crate::util::scaler::ScalerFit;

/// Settings of one forecast run
///
/// Every field has a default, so a JSON config file only needs the keys it changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    pub data_path: PathBuf,
    pub sequence_length: usize,
    pub test_size: usize,
    pub scaler_fit: ScalerFit,
    pub epochs: usize,
    /// 0 trains on all windows as a single batch
    pub batch_size: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub lstm_units: usize,
    pub dense_units: usize,
    pub dense_layers: usize,
    pub log_interval: usize,
    pub plot_path: Option<PathBuf>,
    pub report_dir: Option<PathBuf>,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(constants::PRICE_CSV_PATH),
            sequence_length: constants::SEQUENCE_LENGTH,
            test_size: constants::TEST_SIZE,
            scaler_fit: ScalerFit::default(),
            epochs: constants::EPOCHS,
            batch_size: 0,
            learning_rate: constants::LEARNING_RATE,
            seed: constants::SEED,
            lstm_units: constants::LSTM_UNITS,
            dense_units: constants::DENSE_UNITS,
            dense_layers: constants::DENSE_LAYERS,
            log_interval: 100,
            plot_path: Some(PathBuf::from(constants::PLOT_PATH)),
            report_dir: Some(PathBuf::from(constants::REPORT_DIR)),
        }
    }
}

impl ForecastConfig {
    /// Reads a JSON config file; missing keys keep their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }

    pub fn model_config(&self) -> PriceLstmModelConfig {
        PriceLstmModelConfig {
            input_size: 1,
            lstm_units: self.lstm_units,
            dense_units: self.dense_units,
            dense_layers: self.dense_layers,
            output_size: 1,
        }
    }
}
