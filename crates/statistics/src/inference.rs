//! Hypothesis-test statistics backed by `statrs` distributions.
//!
//! Degenerate inputs (zero variance, too-small samples) yield the neutral
//! result (statistic 0, p = 1) rather than NaN or infinity, keeping every
//! report field finite and serializable.

use crate::descriptive::{mean, ranks, sample_variance};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};

/// Two-sided p-value for a t statistic with the given degrees of freedom.
pub fn t_p_value_two_sided(t: f64, df: f64) -> f64 {
    if df < 1.0 || !t.is_finite() {
        return 1.0;
    }
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * (1.0 - dist.cdf(t.abs()))).clamp(0.0, 1.0),
        Err(_) => 1.0,
    }
}

/// Standard two-sample t-test with pooled variance (equal-variance form).
///
/// Returns `(t, p)`. Requires at least two values per group; degenerate
/// pooled variance yields the neutral `(0.0, 1.0)`.
pub fn pooled_t_test(a: &[f64], b: &[f64]) -> (f64, f64) {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return (0.0, 1.0);
    }

    let (mean_a, mean_b) = (mean(a).unwrap_or(0.0), mean(b).unwrap_or(0.0));
    let (var_a, var_b) = (
        sample_variance(a).unwrap_or(0.0),
        sample_variance(b).unwrap_or(0.0),
    );

    let df = (n1 + n2 - 2) as f64;
    let pooled_variance = ((n1 - 1) as f64 * var_a + (n2 - 1) as f64 * var_b) / df;
    let standard_error = (pooled_variance * (1.0 / n1 as f64 + 1.0 / n2 as f64)).sqrt();
    if standard_error <= 0.0 {
        return (0.0, 1.0);
    }

    let t = (mean_a - mean_b) / standard_error;
    (t, t_p_value_two_sided(t, df))
}

/// One-way ANOVA across two or more groups.
///
/// Returns `(F, p)` via the Fisher-Snedecor distribution. Fewer than two
/// groups, or groups with no within-variance, yield `(0.0, 1.0)`.
pub fn one_way_anova(groups: &[Vec<f64>]) -> (f64, f64) {
    let k = groups.len();
    let total_n: usize = groups.iter().map(Vec::len).sum();
    if k < 2 || total_n <= k {
        return (0.0, 1.0);
    }

    let grand_mean = groups.iter().flatten().sum::<f64>() / total_n as f64;

    let mut ss_between = 0.0;
    let mut ss_within = 0.0;
    for group in groups {
        let Some(group_mean) = mean(group) else {
            continue;
        };
        ss_between += group.len() as f64 * (group_mean - grand_mean).powi(2);
        ss_within += group.iter().map(|v| (v - group_mean).powi(2)).sum::<f64>();
    }

    let df_between = (k - 1) as f64;
    let df_within = (total_n - k) as f64;
    let ms_between = ss_between / df_between;
    let ms_within = ss_within / df_within;
    if ms_within <= 0.0 {
        return (0.0, 1.0);
    }

    let f = ms_between / ms_within;
    let p = match FisherSnedecor::new(df_between, df_within) {
        Ok(dist) => (1.0 - dist.cdf(f)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    };
    (f, p)
}

/// Two-sided Mann-Whitney U test via the normal approximation with tie
/// correction and continuity correction.
///
/// Returns `(U₁, p)` where U₁ is the U statistic of the first sample; the
/// p-value is computed from the smaller of U₁/U₂. The approximation is the
/// appropriate regime for the sample sizes this pipeline sees; an exact
/// enumeration for tiny ties-free samples is deliberately not implemented.
pub fn mann_whitney_u(a: &[f64], b: &[f64]) -> (f64, f64) {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    if a.is_empty() || b.is_empty() {
        return (0.0, 1.0);
    }

    let mut combined: Vec<f64> = Vec::with_capacity(a.len() + b.len());
    combined.extend_from_slice(a);
    combined.extend_from_slice(b);
    let all_ranks = ranks(&combined);

    let rank_sum_a: f64 = all_ranks[..a.len()].iter().sum();
    let u1 = rank_sum_a - n1 * (n1 + 1.0) / 2.0;
    let u2 = n1 * n2 - u1;
    let u_min = u1.min(u2);

    let n = n1 + n2;
    let mean_u = n1 * n2 / 2.0;

    // Tie correction to the variance of U.
    let mut tie_term = 0.0;
    let mut sorted = combined;
    sorted.sort_by(|x, y| x.partial_cmp(y).unwrap_or(std::cmp::Ordering::Equal));
    let mut i = 0;
    while i < sorted.len() {
        let mut j = i;
        while j + 1 < sorted.len() && sorted[j + 1] == sorted[i] {
            j += 1;
        }
        let t = (j - i + 1) as f64;
        tie_term += t.powi(3) - t;
        i = j + 1;
    }

    let variance = n1 * n2 / 12.0 * ((n + 1.0) - tie_term / (n * (n - 1.0)));
    if variance <= 0.0 {
        // All observations identical.
        return (u1, 1.0);
    }

    let z = (u_min - mean_u + 0.5) / variance.sqrt();
    let p = match Normal::new(0.0, 1.0) {
        Ok(dist) => (2.0 * dist.cdf(z)).clamp(0.0, 1.0),
        Err(_) => 1.0,
    };
    (u1, p)
}

/// Cohen's d effect size using the pooled standard deviation. Zero when
/// the pooled deviation is degenerate.
pub fn cohens_d(a: &[f64], b: &[f64]) -> f64 {
    let (n1, n2) = (a.len(), b.len());
    if n1 < 2 || n2 < 2 {
        return 0.0;
    }
    let (var_a, var_b) = (
        sample_variance(a).unwrap_or(0.0),
        sample_variance(b).unwrap_or(0.0),
    );
    let pooled = (((n1 - 1) as f64 * var_a + (n2 - 1) as f64 * var_b)
        / (n1 + n2 - 2) as f64)
        .sqrt();
    if pooled <= 0.0 {
        return 0.0;
    }
    (mean(a).unwrap_or(0.0) - mean(b).unwrap_or(0.0)) / pooled
}

/// Classifies an effect size by |d| thresholds.
pub fn interpret_effect_size(d: f64) -> &'static str {
    let abs_d = d.abs();
    if abs_d < 0.2 {
        "negligible effect"
    } else if abs_d < 0.5 {
        "small effect"
    } else if abs_d < 0.8 {
        "medium effect"
    } else {
        "large effect"
    }
}

/// Quantile of the standard normal distribution.
pub fn normal_quantile(p: f64) -> f64 {
    match Normal::new(0.0, 1.0) {
        Ok(dist) => dist.inverse_cdf(p),
        Err(_) => 0.0,
    }
}

/// Two-sided p-value for a correlation coefficient via the t-transform
/// with n−2 degrees of freedom.
pub fn correlation_p_value(r: f64, n: usize) -> f64 {
    if n < 3 {
        return 1.0;
    }
    let df = (n - 2) as f64;
    let denominator = 1.0 - r * r;
    if denominator <= f64::EPSILON {
        // Perfectly (anti-)correlated: the t statistic diverges.
        return 0.0;
    }
    let t = r * (df / denominator).sqrt();
    t_p_value_two_sided(t, df)
}
