//! Relative Strength Index indicator.
//!
//! Gains and losses come from successive differences, each averaged over a
//! window of up to `period` observations that shrinks near the start of the
//! series (same prefix rule as the SMA). RSI = 100 - 100/(1 + gain/loss).
//!
//! Any undefined result is replaced with the neutral value 50. The first
//! element has no prior difference and is therefore always 50; a window with
//! gains but no losses yields 100, losses but no gains yields 0.

const NEUTRAL_RSI: f64 = 50.0;

pub fn rsi(series: &[f64], period: usize) -> Vec<f64> {
    if period == 0 {
        return vec![NEUTRAL_RSI; series.len()];
    }

    // Per-index gains/losses; index 0 has no prior difference.
    let mut gains = vec![0.0; series.len()];
    let mut losses = vec![0.0; series.len()];
    for i in 1..series.len() {
        let delta = series[i] - series[i - 1];
        if delta > 0.0 {
            gains[i] = delta;
        } else {
            losses[i] = -delta;
        }
    }

    let mut out = Vec::with_capacity(series.len());
    for i in 0..series.len() {
        if i == 0 {
            out.push(NEUTRAL_RSI);
            continue;
        }

        // Window over difference indices, which start at 1.
        let start = if i >= period { i + 1 - period } else { 1 };
        let width = (i - start + 1) as f64;
        let avg_gain: f64 = gains[start..=i].iter().sum::<f64>() / width;
        let avg_loss: f64 = losses[start..=i].iter().sum::<f64>() / width;

        let value = if avg_loss == 0.0 {
            if avg_gain == 0.0 {
                NEUTRAL_RSI
            } else {
                100.0
            }
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        };
        out.push(value);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn rsi_empty_series() {
        assert!(rsi(&[], 14).is_empty());
    }

    #[test]
    fn rsi_first_element_neutral() {
        let out = rsi(&[100.0, 105.0, 102.0], 14);
        assert_relative_eq!(out[0], 50.0);
    }

    #[test]
    fn rsi_all_gains_is_100() {
        let series: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&series, 14);
        for &v in &out[1..] {
            assert_relative_eq!(v, 100.0);
        }
    }

    #[test]
    fn rsi_all_losses_is_0() {
        let series: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&series, 14);
        for &v in &out[1..] {
            assert_relative_eq!(v, 0.0);
        }
    }

    #[test]
    fn rsi_flat_series_neutral() {
        let out = rsi(&[100.0; 10], 14);
        for &v in &out {
            assert_relative_eq!(v, 50.0);
        }
    }

    #[test]
    fn rsi_bounded_0_100() {
        let series: Vec<f64> = (0..50)
            .map(|i| 100.0 + ((i * 7) % 13) as f64 - 6.0)
            .collect();
        for &v in &rsi(&series, 14) {
            assert!((0.0..=100.0).contains(&v), "RSI {} out of range", v);
        }
    }

    #[test]
    fn rsi_balanced_moves() {
        // Alternating +2/-2: equal average gain and loss inside a full
        // window, so RSI sits at 50 once the window holds a gain-loss pair.
        let series = [100.0, 102.0, 100.0, 102.0, 100.0];
        let out = rsi(&series, 2);
        assert_relative_eq!(out[2], 50.0);
        assert_relative_eq!(out[4], 50.0);
    }

    #[test]
    fn rsi_shrinking_prefix_window() {
        // At index 1 only one difference exists; a gain there is RSI 100
        // even though the full period is 14.
        let out = rsi(&[100.0, 101.0, 100.0], 14);
        assert_relative_eq!(out[1], 100.0);
        // Index 2 averages one gain and one loss of equal size.
        assert_relative_eq!(out[2], 50.0);
    }
}
