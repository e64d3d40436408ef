use anyhow::Result;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::built_info;
use crate::config::ForecastConfig;
use crate::util::metrics::RegressionMetrics;
use crate::util::scaler::{MinMaxScaler, ScalerFit};

/// JSON record of one forecast run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub timestamp: String,
    pub crate_version: String,
    pub rustc_version: String,
    pub data_path: PathBuf,
    pub sequence_length: usize,
    pub test_size: usize,
    pub scaler_fit: ScalerFit,
    pub scaler_min: f64,
    pub scaler_max: f64,
    pub epochs: usize,
    pub batch_size: usize,
    pub learning_rate: f64,
    pub seed: u64,
    pub lstm_units: usize,
    pub dense_units: usize,
    pub dense_layers: usize,
    pub train_windows: usize,
    pub test_windows: usize,
    pub final_train_loss: Option<f64>,
    pub metrics: RegressionMetrics,
    pub training_time_seconds: f64,
    pub notes: String,
}

impl RunReport {
    pub fn new(
        config: &ForecastConfig,
        scaler: &MinMaxScaler,
        train_windows: usize,
        test_windows: usize,
        metrics: RegressionMetrics,
    ) -> Self {
        Self {
            timestamp: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            crate_version: built_info::PKG_VERSION.to_string(),
            rustc_version: built_info::RUSTC_VERSION.to_string(),
            data_path: config.data_path.clone(),
            sequence_length: config.sequence_length,
            test_size: config.test_size,
            scaler_fit: config.scaler_fit,
            scaler_min: scaler.min(),
            scaler_max: scaler.max(),
            epochs: config.epochs,
            batch_size: config.batch_size,
            learning_rate: config.learning_rate,
            seed: config.seed,
            lstm_units: config.lstm_units,
            dense_units: config.dense_units,
            dense_layers: config.dense_layers,
            train_windows,
            test_windows,
            final_train_loss: None,
            metrics,
            training_time_seconds: 0.0,
            notes: String::new(),
        }
    }

    pub fn set_final_train_loss(&mut self, loss: Option<f64>) {
        self.final_train_loss = loss;
    }

    pub fn set_training_time(&mut self, seconds: f64) {
        self.training_time_seconds = seconds;
    }

    pub fn add_note(&mut self, note: &str) {
        if !self.notes.is_empty() {
            self.notes.push('\n');
        }
        self.notes.push_str(note);
    }

    pub fn save(&self, report_dir: &Path) -> Result<PathBuf> {
        fs::create_dir_all(report_dir)?;

        let filename = format!(
            "btc_lstm_n{}_e{}_{}.json",
            self.sequence_length,
            self.epochs,
            Local::now().format("%Y%m%d_%H%M%S"),
        );
        let file_path = report_dir.join(filename);

        let json = serde_json::to_string_pretty(&self)?;
        let mut file = fs::File::create(&file_path)?;
        file.write_all(json.as_bytes())?;

        Ok(file_path)
    }
}
