//! Simple Moving Average indicator.
//!
//! The window shrinks near the start of the series: the first `period - 1`
//! outputs average only the available prefix, so there are no leading
//! undefined values.

pub fn sma(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![f64::NAN; series.len()];
    }

    let mut out = Vec::with_capacity(series.len());
    let mut window_sum = 0.0;

    for (i, &value) in series.iter().enumerate() {
        window_sum += value;
        if i >= period {
            window_sum -= series[i - period];
        }
        let width = (i + 1).min(period);
        out.push(window_sum / width as f64);
    }

    out
}
