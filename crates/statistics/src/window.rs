use crate::descriptive::{mean, sample_std_dev};
use crate::inference::{cohens_d, interpret_effect_size, mann_whitney_u, pooled_t_test};
use crate::report::{GroupComparison, GroupStats, WindowComparisonReport};
use core_types::CombinedRecord;
use tracing::debug;

/// Minimum defined observations each partition needs for a computed
/// comparison.
pub const MIN_WINDOW_SAMPLES: usize = 3;

/// Compares behavior inside the ±2-day full-moon window against all other
/// days, for absolute returns and rolling volatility.
///
/// Each metric degrades independently: a partition that cannot field three
/// defined observations yields a structured insufficient-data result for
/// that metric without affecting the other.
pub fn analyze_full_moon_window(records: &[CombinedRecord], alpha: f64) -> WindowComparisonReport {
    let (window, baseline): (Vec<&CombinedRecord>, Vec<&CombinedRecord>) =
        records.iter().partition(|r| r.full_moon_window);

    debug!(
        window = window.len(),
        baseline = baseline.len(),
        "partitioned records around the full moon window"
    );

    let abs_return = compare_metric(
        &collect(&window, |r| r.abs_return),
        &collect(&baseline, |r| r.abs_return),
        "absolute return",
        alpha,
    );
    let volatility = compare_metric(
        &collect(&window, |r| r.volatility),
        &collect(&baseline, |r| r.volatility),
        "volatility",
        alpha,
    );

    WindowComparisonReport {
        full_moon_periods: window.len(),
        baseline_periods: baseline.len(),
        abs_return,
        volatility,
    }
}

fn collect(records: &[&CombinedRecord], accessor: impl Fn(&CombinedRecord) -> Option<f64>) -> Vec<f64> {
    records
        .iter()
        .filter_map(|r| accessor(r))
        .filter(|v| v.is_finite())
        .collect()
}

/// Runs the full two-group battery (t-test, Mann-Whitney, Cohen's d) when
/// both partitions meet the sample floor.
fn compare_metric(window: &[f64], baseline: &[f64], metric: &str, alpha: f64) -> GroupComparison {
    if window.len() < MIN_WINDOW_SAMPLES || baseline.len() < MIN_WINDOW_SAMPLES {
        return GroupComparison::Insufficient {
            reason: format!(
                "insufficient data for {metric} comparison: {} window / {} baseline observations (minimum {MIN_WINDOW_SAMPLES} each)",
                window.len(),
                baseline.len(),
            ),
        };
    }

    let (t_statistic, t_p_value) = pooled_t_test(window, baseline);
    let (u_statistic, u_p_value) = mann_whitney_u(window, baseline);
    let d = cohens_d(window, baseline);

    GroupComparison::Computed {
        window: group_stats(window),
        baseline: group_stats(baseline),
        t_statistic,
        t_p_value,
        u_statistic,
        u_p_value,
        cohens_d: d,
        effect_size: interpret_effect_size(d).to_string(),
        significant: t_p_value < alpha,
    }
}

fn group_stats(values: &[f64]) -> GroupStats {
    GroupStats {
        mean: mean(values).unwrap_or(0.0),
        std: sample_std_dev(values).unwrap_or(0.0),
        n: values.len(),
    }
}
