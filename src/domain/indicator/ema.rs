//! Exponential Moving Average indicator.
//!
//! α = 2/(period+1), seeded with the first observation:
//! ema[0] = s[0], ema[i] = α·s[i] + (1-α)·ema[i-1].

pub fn ema(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; series.len()];
    }

    let alpha = 2.0 / (period as f64 + 1.0);
    let mut out = Vec::with_capacity(series.len());
    let mut prev = 0.0;

    for (i, &value) in series.iter().enumerate() {
        let smoothed = if i == 0 {
            value
        } else {
            alpha * value + (1.0 - alpha) * prev
        };
        out.push(smoothed);
        prev = smoothed;
    }

    out
}
