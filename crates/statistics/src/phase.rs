use crate::inference::{one_way_anova, pooled_t_test};
use crate::report::{PhaseComparisonResult, PhasePairDifference};
use core_types::{CombinedRecord, LunarPhase, PhaseMetric};
use tracing::debug;

/// Minimum volatility observations a phase needs to join the ANOVA and the
/// pairwise follow-up tests.
pub const MIN_PHASE_SAMPLES: usize = 3;

/// Groups records by lunar phase, computes per-phase metrics, and tests
/// whether volatility differs across phases.
///
/// Pairwise t-tests only run when the overall ANOVA is significant at
/// `alpha`, and use a Bonferroni-corrected threshold of `alpha / C(k, 2)`
/// over the k qualifying phases.
pub fn analyze_phases(records: &[CombinedRecord], alpha: f64) -> PhaseComparisonResult {
    let mut phase_metrics = Vec::new();
    let mut qualifying: Vec<(LunarPhase, Vec<f64>)> = Vec::new();

    for phase in LunarPhase::ALL {
        let points: Vec<&CombinedRecord> = records.iter().filter(|r| r.phase == phase).collect();
        if points.is_empty() {
            continue;
        }

        let returns: Vec<f64> = points.iter().filter_map(|r| r.daily_return).collect();
        let volatilities: Vec<f64> = points.iter().filter_map(|r| r.volatility).collect();

        let green_days = returns.iter().filter(|r| **r > 0.0).count();
        let green_day_percentage = if returns.is_empty() {
            0.0
        } else {
            green_days as f64 / returns.len() as f64 * 100.0
        };

        phase_metrics.push(PhaseMetric {
            phase,
            avg_volatility: mean_or_zero(&volatilities),
            green_day_percentage,
            mean_return: mean_or_zero(&returns),
            sample_count: points.len(),
        });

        if volatilities.len() >= MIN_PHASE_SAMPLES {
            qualifying.push((phase, volatilities));
        }
    }

    if qualifying.len() < 2 {
        debug!(
            qualifying = qualifying.len(),
            "fewer than two phases with enough volatility samples; skipping ANOVA"
        );
        return PhaseComparisonResult {
            phase_metrics,
            anova_f_statistic: 0.0,
            anova_p_value: 1.0,
            significant_differences: Vec::new(),
        };
    }

    let groups: Vec<Vec<f64>> = qualifying.iter().map(|(_, v)| v.clone()).collect();
    let (anova_f, anova_p) = one_way_anova(&groups);

    let significant_differences = if anova_p < alpha {
        pairwise_comparisons(&qualifying, alpha)
    } else {
        Vec::new()
    };

    PhaseComparisonResult {
        phase_metrics,
        anova_f_statistic: anova_f,
        anova_p_value: anova_p,
        significant_differences,
    }
}

/// Pairwise t-tests between every pair of qualifying phases, keeping only
/// pairs below the Bonferroni-corrected threshold.
fn pairwise_comparisons(
    qualifying: &[(LunarPhase, Vec<f64>)],
    alpha: f64,
) -> Vec<PhasePairDifference> {
    let k = qualifying.len();
    let comparisons = k * (k - 1) / 2;
    let corrected_alpha = alpha / comparisons as f64;

    let mut significant = Vec::new();
    for i in 0..k {
        for j in (i + 1)..k {
            let (phase_a, ref volatilities_a) = qualifying[i];
            let (phase_b, ref volatilities_b) = qualifying[j];

            let (_, p_value) = pooled_t_test(volatilities_a, volatilities_b);
            if p_value < corrected_alpha {
                significant.push(PhasePairDifference {
                    phase_a,
                    phase_b,
                    p_value,
                });
            }
        }
    }
    significant
}

fn mean_or_zero(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::{parse_timestamp, LunarRecord, StockRecord};

    fn record(
        day: u32,
        phase: LunarPhase,
        daily_return: f64,
        volatility: Option<f64>,
    ) -> CombinedRecord {
        let ts = parse_timestamp(&format!("2024-03-{day:02}")).unwrap();
        let stock = StockRecord::new(ts, 100.0, 101.0, 99.0, 100.0, 1_000).unwrap();
        let (lo, hi) = phase.expected_illumination();
        let lunar = LunarRecord::new(ts, phase, (lo + hi) / 2.0, 5, false).unwrap();
        let mut combined = CombinedRecord::from_parts(&stock, &lunar, ts.with_timezone(&Utc), true);
        combined.daily_return = Some(daily_return);
        combined.abs_return = Some(daily_return.abs());
        combined.volatility = volatility;
        combined
    }

    #[test]
    fn phases_with_no_records_are_skipped() {
        let records = vec![
            record(1, LunarPhase::Full, 1.0, Some(2.0)),
            record(2, LunarPhase::Full, -0.5, Some(2.1)),
        ];
        let result = analyze_phases(&records, 0.05);
        assert_eq!(result.phase_metrics.len(), 1);
        assert_eq!(result.phase_metrics[0].phase, LunarPhase::Full);
        assert_eq!(result.phase_metrics[0].sample_count, 2);
    }

    #[test]
    fn phase_metric_aggregates() {
        let records = vec![
            record(1, LunarPhase::New, 1.0, Some(2.0)),
            record(2, LunarPhase::New, -1.0, Some(4.0)),
            record(3, LunarPhase::New, 3.0, None),
            record(4, LunarPhase::New, 1.0, None),
        ];
        let result = analyze_phases(&records, 0.05);
        let metric = &result.phase_metrics[0];
        assert_eq!(metric.sample_count, 4);
        assert_eq!(metric.avg_volatility, 3.0);
        assert_eq!(metric.mean_return, 1.0);
        assert_eq!(metric.green_day_percentage, 75.0);
    }

    #[test]
    fn anova_requires_two_qualifying_phases() {
        // Full has three volatility samples, New only two: no ANOVA.
        let records = vec![
            record(1, LunarPhase::Full, 1.0, Some(2.0)),
            record(2, LunarPhase::Full, 1.0, Some(2.5)),
            record(3, LunarPhase::Full, 1.0, Some(2.2)),
            record(4, LunarPhase::New, 1.0, Some(1.0)),
            record(5, LunarPhase::New, 1.0, Some(1.1)),
        ];
        let result = analyze_phases(&records, 0.05);
        assert_eq!(result.anova_f_statistic, 0.0);
        assert_eq!(result.anova_p_value, 1.0);
        assert!(result.significant_differences.is_empty());
    }

    #[test]
    fn clearly_separated_phases_produce_significant_pairs() {
        let mut records = Vec::new();
        for day in 1..=5 {
            records.push(record(day, LunarPhase::Full, 0.5, Some(10.0 + day as f64 * 0.01)));
        }
        for day in 6..=10 {
            records.push(record(day, LunarPhase::New, 0.5, Some(1.0 + day as f64 * 0.01)));
        }

        let result = analyze_phases(&records, 0.05);
        assert!(result.anova_p_value < 0.05);
        assert_eq!(result.significant_differences.len(), 1);
        let pair = &result.significant_differences[0];
        assert_eq!((pair.phase_a, pair.phase_b), (LunarPhase::New, LunarPhase::Full));
    }

    #[test]
    fn no_pairwise_tests_when_anova_is_not_significant() {
        let mut records = Vec::new();
        for day in 1..=4 {
            records.push(record(day, LunarPhase::Full, 0.5, Some(2.0 + day as f64 * 0.1)));
        }
        for day in 5..=8 {
            records.push(record(day, LunarPhase::New, 0.5, Some(2.05 + (day - 4) as f64 * 0.1)));
        }

        let result = analyze_phases(&records, 0.05);
        assert!(result.anova_p_value >= 0.05);
        assert!(result.significant_differences.is_empty());
    }
}
