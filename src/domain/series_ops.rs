//! Lag, change, and crossover transforms over aligned numeric series.
//!
//! Shifting introduces NaN for the leading indices; NaN is the undefined
//! marker throughout evaluation and never compares true.

/// Value from `offset` rows earlier. Indices below `offset` are NaN.
pub fn shift(series: &[f64], offset: usize) -> Vec<f64> {
    series
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if i < offset {
                f64::NAN
            } else {
                series[i - offset]
            }
        })
        .collect()
}

/// Absolute change over `n` rows: `s[i] - s[i-n]`.
pub fn change(series: &[f64], n: usize) -> Vec<f64> {
    let lagged = shift(series, n);
    series.iter().zip(&lagged).map(|(s, l)| s - l).collect()
}

/// Percentage change over `n` rows: `(s[i] - s[i-n]) / s[i-n] * 100`.
pub fn percent_change(series: &[f64], n: usize) -> Vec<f64> {
    let lagged = shift(series, n);
    series
        .iter()
        .zip(&lagged)
        .map(|(s, l)| (s - l) / l * 100.0)
        .collect()
}

/// True at index i iff `a[i] > b[i]` and `a[i-1] <= b[i-1]`.
///
/// Index 0 has no previous row and is always false. NaN on either side of
/// either comparison makes the result false.
pub fn crosses_above(a: &[f64], b: &[f64]) -> Vec<bool> {
    (0..a.len().min(b.len()))
        .map(|i| i > 0 && a[i] > b[i] && a[i - 1] <= b[i - 1])
        .collect()
}

/// Mirror of [`crosses_above`]: `a[i] < b[i]` and `a[i-1] >= b[i-1]`.
pub fn crosses_below(a: &[f64], b: &[f64]) -> Vec<bool> {
    (0..a.len().min(b.len()))
        .map(|i| i > 0 && a[i] < b[i] && a[i - 1] >= b[i - 1])
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn shift_introduces_leading_nan() {
        let out = shift(&[1.0, 2.0, 3.0, 4.0], 2);
        assert!(out[0].is_nan());
        assert!(out[1].is_nan());
        assert_relative_eq!(out[2], 1.0);
        assert_relative_eq!(out[3], 2.0);
    }

    #[test]
    fn shift_zero_is_identity() {
        assert_eq!(shift(&[1.0, 2.0], 0), vec![1.0, 2.0]);
    }

    #[test]
    fn shift_beyond_length_all_nan() {
        let out = shift(&[1.0, 2.0], 5);
        assert!(out.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn change_over_one_row() {
        let out = change(&[10.0, 12.0, 9.0], 1);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 2.0);
        assert_relative_eq!(out[2], -3.0);
    }

    #[test]
    fn percent_change_over_one_row() {
        let out = percent_change(&[100.0, 110.0, 99.0], 1);
        assert!(out[0].is_nan());
        assert_relative_eq!(out[1], 10.0);
        assert_relative_eq!(out[2], -10.0);
    }

    #[test]
    fn crosses_above_detects_transition() {
        let a = [1.0, 3.0, 4.0];
        let b = [2.0, 2.0, 2.0];
        assert_eq!(crosses_above(&a, &b), vec![false, true, false]);
    }

    #[test]
    fn crosses_above_requires_prior_at_or_below() {
        // Already above on the previous row: no crossover.
        let a = [3.0, 4.0];
        let b = [2.0, 2.0];
        assert_eq!(crosses_above(&a, &b), vec![false, false]);
    }

    #[test]
    fn crosses_above_touch_counts_as_below() {
        // Equality on the previous row satisfies the <= side.
        let a = [2.0, 3.0];
        let b = [2.0, 2.0];
        assert_eq!(crosses_above(&a, &b), vec![false, true]);
    }

    #[test]
    fn crosses_below_detects_transition() {
        let a = [3.0, 1.0, 0.5];
        let b = [2.0, 2.0, 2.0];
        assert_eq!(crosses_below(&a, &b), vec![false, true, false]);
    }

    #[test]
    fn crossover_false_at_index_0() {
        let a = [5.0];
        let b = [1.0];
        assert_eq!(crosses_above(&a, &b), vec![false]);
        assert_eq!(crosses_below(&b, &a), vec![false]);
    }

    #[test]
    fn crossover_nan_never_true() {
        let a = [f64::NAN, 3.0, 4.0];
        let b = [2.0, 2.0, 2.0];
        // Previous value NaN: the <= comparison fails, no crossover.
        assert_eq!(crosses_above(&a, &b), vec![false, false, false]);
    }

    #[test]
    fn crossover_never_both_directions() {
        let a = [1.0, 3.0, 1.0, 3.0];
        let b = [2.0, 2.0, 2.0, 2.0];
        let above = crosses_above(&a, &b);
        let below = crosses_below(&a, &b);
        for i in 0..a.len() {
            assert!(!(above[i] && below[i]));
        }
    }
}
