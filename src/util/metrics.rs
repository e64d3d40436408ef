use serde::{Deserialize, Serialize};

use crate::error::{ForecastError, Result};

/// Regression metrics in the units of the compared values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RegressionMetrics {
    pub mse: f64,
    pub rmse: f64,
    pub mae: f64,
    pub r2: f64,
}

/// Computes MSE, RMSE, MAE and the coefficient of determination
///
/// # Arguments
///
/// * `actual` - Ground truth values
/// * `predicted` - Predictions aligned with `actual`
///
/// # Returns
///
/// Returns the metrics, `InsufficientData` for empty input or
/// `DimensionMismatch` for sequences of different length
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<RegressionMetrics> {
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            left: actual.len(),
            right: predicted.len(),
        });
    }
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData(
            "cannot compute metrics on empty sequences".into(),
        ));
    }

    let n = actual.len() as f64;
    let mut squared_sum = 0.0;
    let mut absolute_sum = 0.0;
    for (a, p) in actual.iter().zip(predicted.iter()) {
        let diff = a - p;
        squared_sum += diff * diff;
        absolute_sum += diff.abs();
    }

    let mse = squared_sum / n;
    let mae = absolute_sum / n;

    let mean = actual.iter().sum::<f64>() / n;
    let total_sum: f64 = actual.iter().map(|a| (a - mean) * (a - mean)).sum();
    let r2 = if total_sum == 0.0 {
        // No variance in the ground truth: only a perfect fit counts
        if squared_sum == 0.0 {
            1.0
        } else {
            0.0
        }
    } else {
        1.0 - squared_sum / total_sum
    };

    Ok(RegressionMetrics {
        mse,
        rmse: mse.sqrt(),
        mae,
        r2,
    })
}
