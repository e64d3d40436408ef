// External crates
use anyhow::{anyhow, Result};
use log::{info, warn};
use plotters::prelude::*;
use std::path::Path;

// Local modules
use crate::lstm::step_5_prediction::PredictionRow;

const ACTUAL_COLOR: RGBColor = RGBColor(0, 0, 255);
const PREDICTED_COLOR: RGBColor = RGBColor(255, 0, 0);

/// Draws actual and predicted prices to an SVG file
///
/// # Arguments
///
/// * `rows` - Prediction rows in chronological order
/// * `rmse` - Shown in the chart title
/// * `path` - Destination SVG file
pub fn render_prediction_chart(rows: &[PredictionRow], rmse: f64, path: &Path) -> Result<()> {
    if rows.is_empty() {
        return Err(anyhow!("nothing to plot"));
    }

    let (y_min, y_max) = rows
        .iter()
        .flat_map(|r| [r.actual, r.predicted])
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !y_min.is_finite() || !y_max.is_finite() {
        return Err(anyhow!("no finite values to plot"));
    }
    let pad = ((y_max - y_min) * 0.05).max(1.0);
    let x_max = (rows.len() - 1).max(1) as f64;

    let root = SVGBackend::new(path, (1800, 600)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("BTC Price Prediction with LSTM (Burn) - RMSE: {:.4}", rmse),
            ("sans-serif", 24),
        )
        .margin(20)
        .set_label_area_size(LabelAreaPosition::Left, 80)
        .set_label_area_size(LabelAreaPosition::Bottom, 50)
        .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Price")
        .x_label_formatter(&|x| {
            let idx = x.round().max(0.0) as usize;
            rows.get(idx)
                .map(|r| r.timestamp.format("%m-%d %H:%M").to_string())
                .unwrap_or_default()
        })
        .y_label_formatter(&|y| format!("{:.0}", y))
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            rows.iter().enumerate().map(|(i, r)| (i as f64, r.actual)),
            &ACTUAL_COLOR,
        ))?
        .label("Actual Prices")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], ACTUAL_COLOR));

    chart
        .draw_series(LineSeries::new(
            rows.iter().enumerate().map(|(i, r)| (i as f64, r.predicted)),
            &PREDICTED_COLOR,
        ))?
        .label("Predicted Prices")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], PREDICTED_COLOR));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    info!("Chart written to {}", path.display());
    Ok(())
}

/// Renders the chart, logging instead of failing when rendering is not possible
pub fn try_render_prediction_chart(rows: &[PredictionRow], rmse: f64, path: &Path) -> bool {
    match render_prediction_chart(rows, rmse, path) {
        Ok(()) => true,
        Err(e) => {
            warn!("Skipping chart {}: {}", path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn sample_rows(n: usize) -> Vec<PredictionRow> {
        let start = NaiveDate::from_ymd_opt(2021, 10, 19)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        (0..n)
            .map(|i| PredictionRow {
                timestamp: start + Duration::hours(i as i64),
                actual: 61000.0 + i as f64 * 10.0,
                predicted: 60990.0 + i as f64 * 12.0,
            })
            .collect()
    }

    #[test]
    fn test_render_writes_svg() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("chart.svg");

        render_prediction_chart(&sample_rows(24), 12.5, &path).unwrap();

        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("RMSE: 12.5000"));
        assert!(svg.contains("Actual Prices"));
        assert!(svg.contains("Predicted Prices"));
    }

    #[test]
    fn test_single_row_chart() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.svg");
        assert!(try_render_prediction_chart(&sample_rows(1), 0.0, &path));
        assert!(path.exists());
    }

    #[test]
    fn test_empty_rows_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.svg");

        assert!(render_prediction_chart(&[], 0.0, &path).is_err());
        assert!(!try_render_prediction_chart(&[], 0.0, &path));
        assert!(!path.exists());
    }
}
