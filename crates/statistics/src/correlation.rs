use crate::descriptive::ranks;
use crate::inference::{correlation_p_value, normal_quantile};
use crate::report::CorrelationAnalysis;
use tracing::warn;

/// Minimum paired observations for a computed (non-placeholder) result.
pub const MIN_CORRELATION_SAMPLES: usize = 3;

/// Pearson product-moment correlation coefficient. Zero for degenerate
/// inputs (mismatched lengths or no variance in either operand).
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for (xi, yi) in x.iter().zip(y) {
        covariance += (xi - mean_x) * (yi - mean_y);
        var_x += (xi - mean_x).powi(2);
        var_y += (yi - mean_y).powi(2);
    }

    if var_x <= 0.0 || var_y <= 0.0 {
        return 0.0;
    }
    covariance / (var_x.sqrt() * var_y.sqrt())
}

/// Spearman rank correlation: Pearson over average-rank transforms.
pub fn spearman(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.len() < 2 {
        return 0.0;
    }
    pearson(&ranks(x), &ranks(y))
}

/// 95% (or other) confidence interval on a Pearson coefficient via the
/// Fisher z-transformation.
///
/// For n < 4 the standard error 1/√(n−3) is undefined, so the interval
/// degrades to the full [-1, 1] range, which still contains the point
/// estimate.
pub fn fisher_confidence_interval(r: f64, n: usize, confidence: f64) -> (f64, f64) {
    if n < 4 {
        return (-1.0, 1.0);
    }

    // Guard the transform against |r| = 1; the clamp pulls the interval
    // strictly inside (-1, 1), so the bounds are widened back out to the
    // point estimate afterwards for exactly linear inputs.
    let clamped = r.clamp(-0.999_999_9, 0.999_999_9);
    let z = 0.5 * ((1.0 + clamped) / (1.0 - clamped)).ln();
    let standard_error = 1.0 / ((n - 3) as f64).sqrt();
    let critical = normal_quantile(1.0 - (1.0 - confidence) / 2.0);

    let lower = (z - critical * standard_error).tanh().min(r).max(-1.0);
    let upper = (z + critical * standard_error).tanh().max(r).min(1.0);
    (lower, upper)
}

/// Classifies a correlation by strength (|r| thresholds), direction, and
/// significance at α = 0.05.
pub fn interpret(r: f64, p_value: f64) -> String {
    let abs_r = r.abs();
    let strength = if abs_r < 0.1 {
        "negligible"
    } else if abs_r < 0.3 {
        "weak"
    } else if abs_r < 0.5 {
        "moderate"
    } else if abs_r < 0.7 {
        "strong"
    } else {
        "very strong"
    };
    let direction = if r > 0.0 { "positive" } else { "negative" };
    let significance = if p_value < 0.05 {
        "significant"
    } else {
        "not significant"
    };

    format!("{strength} {direction} correlation ({significance})")
}

/// Full correlation analysis of one metric pair over the subset of records
/// where both operands are defined and finite.
pub fn analyze(x: &[f64], y: &[f64], label: &str, confidence: f64) -> CorrelationAnalysis {
    let paired: (Vec<f64>, Vec<f64>) = x
        .iter()
        .zip(y)
        .filter(|(xi, yi)| xi.is_finite() && yi.is_finite())
        .map(|(xi, yi)| (*xi, *yi))
        .unzip();
    let (x_clean, y_clean) = paired;
    let n = x_clean.len();

    if n < MIN_CORRELATION_SAMPLES {
        warn!(pair = label, n, "insufficient data for correlation");
        return CorrelationAnalysis::insufficient(n);
    }

    let pearson_r = pearson(&x_clean, &y_clean);
    let pearson_p = correlation_p_value(pearson_r, n);
    let spearman_r = spearman(&x_clean, &y_clean);
    let spearman_p = correlation_p_value(spearman_r, n);

    CorrelationAnalysis {
        pearson_correlation: pearson_r,
        pearson_p_value: pearson_p,
        spearman_correlation: spearman_r,
        spearman_p_value: spearman_p,
        sample_size: n,
        confidence_interval_95: fisher_confidence_interval(pearson_r, n, confidence),
        interpretation: interpret(pearson_r, pearson_p),
    }
}
