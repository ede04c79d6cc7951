//! Synthetic OHLCV data generation.
//!
//! Produces a seeded random walk over business days with a slight upward
//! drift, alternating volatility regimes and volume correlated with the
//! size of the daily move. Deterministic for a given seed.

use crate::domain::ohlcv::OhlcvBar;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

const BASE_VOLUME: f64 = 1_000_000.0;
const DAILY_DRIFT: f64 = 0.0005;
const DAILY_VOLATILITY: f64 = 0.02;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleDataConfig {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub initial_price: f64,
    pub seed: u64,
}

impl Default for SampleDataConfig {
    fn default() -> Self {
        Self {
            start_date: NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
            initial_price: 100.0,
            seed: 42,
        }
    }
}

/// Generate a bar table over the business days in the configured range.
pub fn generate(config: &SampleDataConfig) -> Vec<OhlcvBar> {
    let dates = business_days(config.start_date, config.end_date);
    let n_days = dates.len();
    if n_days == 0 {
        return Vec::new();
    }

    let mut rng = StdRng::seed_from_u64(config.seed);

    // Daily returns: normal draws scaled by a two-regime volatility factor,
    // plus a slowly increasing trend.
    let mut returns = Vec::with_capacity(n_days);
    for i in 0..n_days {
        let draw: f64 = rng.sample(StandardNormal);
        let base = DAILY_DRIFT + DAILY_VOLATILITY * draw;
        let regime = if rng.gen_bool(0.5) { 0.015 } else { 0.025 };
        let trend = if n_days > 1 {
            0.001 * i as f64 / (n_days - 1) as f64
        } else {
            0.0
        };
        returns.push(base * (regime / DAILY_VOLATILITY) + trend);
    }

    let mut closes = Vec::with_capacity(n_days);
    let mut prev = config.initial_price;
    closes.push(prev);
    for ret in &returns[1..] {
        prev *= 1.0 + ret;
        closes.push(prev);
    }

    let mut bars = Vec::with_capacity(n_days);
    for (i, (&date, &close)) in dates.iter().zip(&closes).enumerate() {
        let range_pct: f64 = rng.gen_range(0.01..0.03);
        let high = close * (1.0 + range_pct / 2.0);
        let low = close * (1.0 - range_pct / 2.0);

        let open = if i == 0 {
            close * rng.gen_range(0.99..1.01)
        } else {
            let gap: f64 = rng.gen_range(-0.005..0.005);
            (closes[i - 1] * (1.0 + gap)).clamp(low, high)
        };

        // Heavier volume on larger moves.
        let volume_multiplier = 1.0 + returns[i].abs() * 10.0;
        let volume = (BASE_VOLUME * volume_multiplier * rng.gen_range(0.7..1.3)) as i64;

        bars.push(OhlcvBar {
            date,
            open: round_cents(open),
            high: round_cents(high),
            low: round_cents(low),
            close: round_cents(close),
            volume,
        });
    }

    bars
}

fn business_days(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date += Duration::days(1);
    }
    dates
}

fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
