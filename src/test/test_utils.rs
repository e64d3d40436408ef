// External imports
use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

// Internal imports
use crate::util::pre_processor::PricePoint;

/// Hourly random-walk closes starting near 60 000, reproducible per seed
pub fn generate_price_series(num_rows: usize, seed: u64) -> Vec<PricePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let base = NaiveDateTime::parse_from_str("2021-10-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();

    let mut current_price = 60000.0 + rng.random::<f64>() * 1000.0;
    (0..num_rows)
        .map(|i| {
            // Random movement between -1% and +1%
            let movement = (rng.random::<f64>() * 2.0 - 1.0) * 0.01;
            current_price *= 1.0 + movement;
            PricePoint {
                timestamp: base + Duration::hours(i as i64),
                close: current_price,
            }
        })
        .collect()
}

/// Series whose close equals its index, handy for checking window alignment
pub fn generate_linear_series(num_rows: usize) -> Vec<PricePoint> {
    let base = NaiveDateTime::parse_from_str("2021-10-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
    (0..num_rows)
        .map(|i| PricePoint {
            timestamp: base + Duration::hours(i as i64),
            close: i as f64,
        })
        .collect()
}
