//! Robust statistics shared by the preprocessing and analysis stages.
//!
//! Median/MAD are preferred over mean/std throughout the pipeline because
//! motion artifacts would otherwise dominate the estimates.

/// Consistency constant relating MAD to the standard deviation of a
/// normal distribution.
pub const MAD_SCALE: f64 = 1.4826;

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation. Empty input yields 0.0.
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let var = values.iter().map(|v| (v - m) * (v - m)).sum::<f64>() / values.len() as f64;
    var.sqrt()
}

/// Median via a sorted copy. Empty input yields 0.0.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Median absolute deviation around the given center.
pub fn mad(values: &[f64], center: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let deviations: Vec<f64> = values.iter().map(|v| (v - center).abs()).collect();
    median(&deviations)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_median_odd_even() {
        assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
        assert_eq!(median(&[]), 0.0);
    }

    #[test]
    fn test_mad_constant_signal() {
        let values = [5.0; 10];
        assert_eq!(mad(&values, median(&values)), 0.0);
    }

    #[test]
    fn test_mad_with_outlier() {
        // A single outlier should barely move the MAD
        let values = [1.0, 1.1, 0.9, 1.0, 100.0];
        let m = median(&values);
        assert_eq!(m, 1.0);
        assert!(mad(&values, m) < 0.2);
    }

    #[test]
    fn test_std_dev() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert!((std_dev(&values) - 2.0).abs() < 1e-12);
    }
}
