// External crates
use anyhow::{Context, Result};
use burn_autodiff::Autodiff;
use burn_ndarray::{NdArray, NdArrayDevice};
use clap::{Parser, Subcommand};
use log::info;
use std::path::PathBuf;

// Local modules
use btc_price_lstm::config::ForecastConfig;
use btc_price_lstm::constants;
use btc_price_lstm::pipeline::{run_forecast, RunContext};
use btc_price_lstm::util::csv_reshape::reshape_file;
use btc_price_lstm::util::scaler::ScalerFit;

type BurnBackend = Autodiff<NdArray<f32>>;

#[derive(Parser)]
#[command(name = "btc_price_lstm", version, about = "Bitcoin LSTM forecaster and exchange CSV reshaper")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train the LSTM on the price CSV and evaluate it on the trailing test window
    Forecast {
        /// Price CSV with Date and Close columns
        #[arg(long)]
        data: Option<PathBuf>,
        /// JSON file overriding the default run settings
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        epochs: Option<usize>,
        #[arg(long)]
        seed: Option<u64>,
        /// Fit the scaler on the training rows only or on the whole series
        #[arg(long, value_enum)]
        scaler_fit: Option<ScalerFit>,
        /// SVG chart destination
        #[arg(long)]
        plot: Option<PathBuf>,
        /// Skip chart rendering
        #[arg(long)]
        no_plot: bool,
        /// Directory for the JSON run report
        #[arg(long)]
        report_dir: Option<PathBuf>,
    },
    /// Rewrite a 9-column exchange export into Date,Open,High,Low,Close,Adj Close
    Reshape {
        #[arg(long, default_value = constants::EXCHANGE_CSV_PATH)]
        input: PathBuf,
        /// Defaults to <input>_output.csv
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match Cli::parse().command {
        Command::Forecast {
            data,
            config,
            epochs,
            seed,
            scaler_fit,
            plot,
            no_plot,
            report_dir,
        } => {
            let mut run_config = match config {
                Some(path) => ForecastConfig::from_json_file(&path)
                    .with_context(|| format!("Failed to read config {}", path.display()))?,
                None => ForecastConfig::default(),
            };
            if let Some(data) = data {
                run_config.data_path = data;
            }
            if let Some(epochs) = epochs {
                run_config.epochs = epochs;
            }
            if let Some(seed) = seed {
                run_config.seed = seed;
            }
            if let Some(scaler_fit) = scaler_fit {
                run_config.scaler_fit = scaler_fit;
            }
            if plot.is_some() {
                run_config.plot_path = plot;
            }
            if no_plot {
                run_config.plot_path = None;
            }
            if report_dir.is_some() {
                run_config.report_dir = report_dir;
            }

            let ctx = RunContext::<BurnBackend>::new(run_config.seed, NdArrayDevice::default());
            let outcome = run_forecast(&run_config, &ctx).context("Forecast pipeline failed")?;
            info!("Root Mean Squared Error (RMSE): {:.4}", outcome.metrics.rmse);
        }
        Command::Reshape { input, output } => {
            let summary = reshape_file(&input, output.as_deref())
                .with_context(|| format!("Failed to reshape {}", input.display()))?;
            println!(
                "Data has been converted and saved to {}",
                summary.output_path.display()
            );
        }
    }

    Ok(())
}
