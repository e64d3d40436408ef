// External crates
use burn::tensor::backend::AutodiffBackend;
use log::{info, warn};
use std::path::PathBuf;
use std::time::Instant;

// Local modules
use crate::config::ForecastConfig;
use crate::error::{ForecastError, Result};
use crate::lstm::step_1_tensor_preparation::{build_windows, split_train_test, WindowSet};
use crate::lstm::step_4_train_model::{LstmRegressor, Regressor};
use crate::lstm::step_5_prediction::{
    actual_and_predicted, format_prediction_table, predict_test_windows, PredictionRow,
};
use crate::util::metrics::{evaluate, RegressionMetrics};
use crate::util::model_logger::RunReport;
use crate::util::plotting::try_render_prediction_chart;
use crate::util::pre_processor::{load_price_series, PricePoint};
use crate::util::scaler::{MinMaxScaler, ScalerFit};

/// Explicit run initialisation: the seed and the device models are placed on
#[derive(Debug, Clone)]
pub struct RunContext<B: AutodiffBackend> {
    pub seed: u64,
    pub device: B::Device,
}

impl<B: AutodiffBackend> RunContext<B> {
    /// Seeds the backend RNG and keeps the device for model construction
    pub fn new(seed: u64, device: B::Device) -> Self {
        B::seed(seed);
        Self { seed, device }
    }
}

/// Scaled, windowed train and test sets ready for a [`Regressor`]
#[derive(Debug, Clone)]
pub struct PreparedData {
    pub scaler: MinMaxScaler,
    pub train_windows: WindowSet,
    pub test_windows: WindowSet,
    pub test_points: Vec<PricePoint>,
}

/// Result of a forecast run
#[derive(Debug, Clone)]
pub struct ForecastOutcome {
    pub rows: Vec<PredictionRow>,
    pub metrics: RegressionMetrics,
    pub loss_history: Vec<f64>,
    pub plot_written: bool,
    pub report_path: Option<PathBuf>,
}

/// Splits, scales and windows a price series
///
/// # Arguments
///
/// * `series` - Chronologically ordered prices
/// * `config` - Window length, test size and scaler fit policy
///
/// # Returns
///
/// Returns the prepared data or `InsufficientData` if either partition yields no window
pub fn prepare_datasets(series: &[PricePoint], config: &ForecastConfig) -> Result<PreparedData> {
    let (train, test) = split_train_test(series, config.test_size)?;
    info!(
        "Training dataset size: {} rows, testing dataset size: {} rows",
        train.len(),
        test.len()
    );

    let train_closes: Vec<f64> = train.iter().map(|p| p.close).collect();
    let test_closes: Vec<f64> = test.iter().map(|p| p.close).collect();

    let scaler = match config.scaler_fit {
        ScalerFit::TrainOnly => MinMaxScaler::fit(&train_closes)?,
        ScalerFit::FullSeries => {
            warn!("Fitting the scaler on train and test data leaks test statistics");
            let all: Vec<f64> = series.iter().map(|p| p.close).collect();
            MinMaxScaler::fit(&all)?
        }
    };

    let train_windows = build_windows(&scaler.transform_all(&train_closes), config.sequence_length);
    let test_windows = build_windows(&scaler.transform_all(&test_closes), config.sequence_length);

    if train_windows.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "{} training records do not fill a single {}-step window",
            train.len(),
            config.sequence_length
        )));
    }
    if test_windows.is_empty() {
        return Err(ForecastError::InsufficientData(format!(
            "{} test records do not fill a single {}-step window",
            test.len(),
            config.sequence_length
        )));
    }

    Ok(PreparedData {
        scaler,
        train_windows,
        test_windows,
        test_points: test.to_vec(),
    })
}

/// Runs the forecast pipeline on an already loaded series with any [`Regressor`]
pub fn run_forecast_with<R: Regressor + ?Sized>(
    config: &ForecastConfig,
    series: &[PricePoint],
    regressor: &mut R,
) -> Result<ForecastOutcome> {
    let data = prepare_datasets(series, config)?;

    let started = Instant::now();
    let loss_history = regressor.fit(&data.train_windows, config.epochs, config.batch_size)?;
    let training_time = started.elapsed().as_secs_f64();
    info!("Training finished in {:.1}s", training_time);

    let rows = predict_test_windows(&*regressor, &data.test_windows, &data.test_points, &data.scaler)?;
    info!("Predictions:\n{}", format_prediction_table(&rows));

    let (actual, predicted) = actual_and_predicted(&rows);
    let metrics = evaluate(&actual, &predicted)?;
    info!(
        "Root Mean Squared Error (RMSE): {:.4} | MSE: {:.4} | MAE: {:.4} | R2: {:.4}",
        metrics.rmse, metrics.mse, metrics.mae, metrics.r2
    );

    let plot_written = config
        .plot_path
        .as_deref()
        .map(|path| try_render_prediction_chart(&rows, metrics.rmse, path))
        .unwrap_or(false);

    let report_path = match config.report_dir.as_deref() {
        Some(dir) => {
            let mut report = RunReport::new(
                config,
                &data.scaler,
                data.train_windows.len(),
                data.test_windows.len(),
                metrics,
            );
            report.set_final_train_loss(loss_history.last().copied());
            report.set_training_time(training_time);
            if config.scaler_fit == ScalerFit::FullSeries {
                report.add_note("scaler fitted on train and test data");
            }
            match report.save(dir) {
                Ok(path) => {
                    info!("Run report saved to {}", path.display());
                    Some(path)
                }
                Err(e) => {
                    warn!("Failed to save run report: {}", e);
                    None
                }
            }
        }
        None => None,
    };

    Ok(ForecastOutcome {
        rows,
        metrics,
        loss_history,
        plot_written,
        report_path,
    })
}

/// Loads the configured CSV and runs the pipeline with the burn LSTM regressor
pub fn run_forecast<B: AutodiffBackend>(
    config: &ForecastConfig,
    ctx: &RunContext<B>,
) -> Result<ForecastOutcome> {
    info!("Starting forecast run with seed {}", ctx.seed);
    let series = load_price_series(&config.data_path)?;

    let mut regressor = LstmRegressor::<B>::new(&config.model_config(), config.learning_rate, &ctx.device)
        .with_log_interval(config.log_interval);

    run_forecast_with(config, &series, &mut regressor)
}
