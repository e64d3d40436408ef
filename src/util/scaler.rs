// External crates
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

// Local modules
use crate::error::{ForecastError, Result};

/// Which part of the series the scaler statistics are computed on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
#[value(rename_all = "kebab-case")]
pub enum ScalerFit {
    /// Fit on the training partition only
    TrainOnly,
    /// Fit on train and test combined (leaks test statistics into training)
    FullSeries,
}

impl Default for ScalerFit {
    fn default() -> Self {
        ScalerFit::TrainOnly
    }
}

/// Min-max scaler mapping the fitted minimum to 0.0 and the fitted maximum to 1.0
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MinMaxScaler {
    min: f64,
    max: f64,
}

impl MinMaxScaler {
    /// Fits the scaler on the observed values
    ///
    /// # Arguments
    ///
    /// * `values` - Raw values; non-finite values are rejected
    ///
    /// # Returns
    ///
    /// Returns the fitted scaler, or `InsufficientData` for an empty slice
    pub fn fit(values: &[f64]) -> Result<Self> {
        if values.is_empty() {
            return Err(ForecastError::InsufficientData(
                "cannot fit a scaler on an empty series".into(),
            ));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(ForecastError::InvalidData(format!(
                "cannot fit a scaler on non-finite value {}",
                bad
            )));
        }

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Ok(Self { min, max })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    // A constant series gets a unit range so every value maps to 0.0
    fn range(&self) -> f64 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            1.0
        } else {
            range
        }
    }

    pub fn transform(&self, value: f64) -> f64 {
        (value - self.min) / self.range()
    }

    pub fn inverse_transform(&self, scaled: f64) -> f64 {
        scaled * self.range() + self.min
    }

    pub fn transform_all(&self, values: &[f64]) -> Vec<f64> {
        values.iter().map(|&v| self.transform(v)).collect()
    }

    pub fn inverse_transform_all(&self, scaled: &[f64]) -> Vec<f64> {
        scaled.iter().map(|&v| self.inverse_transform(v)).collect()
    }
}
