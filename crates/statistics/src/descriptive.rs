//! Descriptive statistics over f64 samples.
//!
//! All functions are total over their inputs: empty or degenerate samples
//! return `None` or a neutral value rather than NaN, so downstream report
//! fields stay JSON-representable.

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (n−1 divisor); `None` for fewer than two values.
pub fn sample_variance(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean_val = mean(values)?;
    let sum_sq: f64 = values.iter().map(|v| (v - mean_val).powi(2)).sum();
    Some(sum_sq / (n - 1) as f64)
}

/// Sample standard deviation (n−1 divisor).
pub fn sample_std_dev(values: &[f64]) -> Option<f64> {
    sample_variance(values).map(f64::sqrt)
}

/// Median of the values; `None` for an empty slice.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Biased sample skewness (g1, population-moment form). Zero for samples
/// with no variance.
pub fn skewness(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let Some(mean_val) = mean(values) else {
        return 0.0;
    };
    let m2 = values.iter().map(|v| (v - mean_val).powi(2)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return 0.0;
    }
    let m3 = values.iter().map(|v| (v - mean_val).powi(3)).sum::<f64>() / n;
    m3 / m2.powf(1.5)
}

/// Biased excess kurtosis (g2, population-moment form; normal = 0). Zero
/// for samples with no variance.
pub fn kurtosis(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    let Some(mean_val) = mean(values) else {
        return 0.0;
    };
    let m2 = values.iter().map(|v| (v - mean_val).powi(2)).sum::<f64>() / n;
    if m2 <= 0.0 {
        return 0.0;
    }
    let m4 = values.iter().map(|v| (v - mean_val).powi(4)).sum::<f64>() / n;
    m4 / m2.powi(2) - 3.0
}

/// Rank transform with average ranks assigned to ties (1-based), as used
/// by the Spearman correlation and the Mann-Whitney test.
pub fn ranks(values: &[f64]) -> Vec<f64> {
    let mut indexed: Vec<(usize, f64)> = values.iter().copied().enumerate().collect();
    indexed.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap_or(std::cmp::Ordering::Equal));

    let mut result = vec![0.0; values.len()];
    let mut i = 0;
    while i < indexed.len() {
        let mut j = i;
        while j + 1 < indexed.len() && indexed[j + 1].1 == indexed[i].1 {
            j += 1;
        }
        // Average of the 1-based ranks i+1..=j+1.
        let avg_rank = (i + j + 2) as f64 / 2.0;
        for entry in &indexed[i..=j] {
            result[entry.0] = avg_rank;
        }
        i = j + 1;
    }
    result
}
