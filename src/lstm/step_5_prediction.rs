// External imports
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

// Internal imports
use super::step_1_tensor_preparation::WindowSet;
use super::step_4_train_model::Regressor;
use crate::error::{ForecastError, Result};
use crate::util::pre_processor::PricePoint;
use crate::util::scaler::MinMaxScaler;

/// A prediction aligned with the timestamp of the price it forecasts
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub timestamp: NaiveDateTime,
    pub actual: f64,
    pub predicted: f64,
}

/// Predicts every window of the test partition and maps results back to price units
///
/// # Arguments
///
/// * `model` - Trained regressor
/// * `windows` - Windows built from the scaled test prices
/// * `test_points` - The raw test partition the windows were built from
/// * `scaler` - Scaler used to build the windows
///
/// # Returns
///
/// Returns one row per window; row `i` forecasts `test_points[n_steps + i]`
pub fn predict_test_windows<R: Regressor + ?Sized>(
    model: &R,
    windows: &WindowSet,
    test_points: &[PricePoint],
    scaler: &MinMaxScaler,
) -> Result<Vec<PredictionRow>> {
    if windows.is_empty() {
        return Err(ForecastError::InsufficientData(
            "no test windows to predict".into(),
        ));
    }

    let n_steps = windows.n_steps();
    if test_points.len() != windows.len() + n_steps {
        return Err(ForecastError::DimensionMismatch {
            left: test_points.len() - n_steps.min(test_points.len()),
            right: windows.len(),
        });
    }

    let scaled = model.predict(&windows.inputs)?;
    if scaled.len() != windows.len() {
        return Err(ForecastError::DimensionMismatch {
            left: windows.len(),
            right: scaled.len(),
        });
    }

    let predicted = scaler.inverse_transform_all(&scaled);

    Ok(test_points[n_steps..]
        .iter()
        .zip(predicted)
        .map(|(point, predicted)| PredictionRow {
            timestamp: point.timestamp,
            actual: point.close,
            predicted,
        })
        .collect())
}

/// Splits prediction rows into `(actual, predicted)` columns
pub fn actual_and_predicted(rows: &[PredictionRow]) -> (Vec<f64>, Vec<f64>) {
    rows.iter().map(|r| (r.actual, r.predicted)).unzip()
}

/// Renders the prediction rows as a fixed-width table
pub fn format_prediction_table(rows: &[PredictionRow]) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "{:<20} {:>14} {:>16}",
        "Date", "Close", "Predicted_Close"
    );
    for row in rows {
        let _ = writeln!(
            table,
            "{:<20} {:>14.2} {:>16.2}",
            row.timestamp.format("%Y-%m-%d %H:%M:%S"),
            row.actual,
            row.predicted
        );
    }
    table
}
