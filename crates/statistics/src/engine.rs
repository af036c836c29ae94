use crate::correlation;
use crate::descriptive::{kurtosis, mean, median, sample_std_dev, skewness};
use crate::error::StatisticsError;
use crate::phase::analyze_phases;
use crate::report::{AnalysisReport, StatisticalSummary};
use crate::volatility::analyze_volatility_patterns;
use crate::window::analyze_full_moon_window;
use core_types::CombinedRecord;
use std::collections::BTreeMap;
use tracing::info;

/// Records below which the whole analysis is meaningless and rejected.
pub const MIN_ANALYSIS_RECORDS: usize = 10;

/// A stateless analyzer for stock-lunar relationships.
///
/// Carries only its significance and confidence levels; every `analyze`
/// call is a pure function of its input.
#[derive(Debug, Clone, Copy)]
pub struct StatisticalEngine {
    significance_level: f64,
    confidence_level: f64,
}

impl Default for StatisticalEngine {
    fn default() -> Self {
        Self::new(0.05, 0.95)
    }
}

impl StatisticalEngine {
    pub fn new(significance_level: f64, confidence_level: f64) -> Self {
        Self {
            significance_level,
            confidence_level,
        }
    }

    /// The main entry point: runs every sub-analysis over an enriched,
    /// aligned record sequence and assembles the report.
    ///
    /// Fails hard below `MIN_ANALYSIS_RECORDS`; within a valid analysis,
    /// individual sub-results degrade independently.
    pub fn analyze(&self, records: &[CombinedRecord]) -> Result<AnalysisReport, StatisticsError> {
        if records.len() < MIN_ANALYSIS_RECORDS {
            return Err(StatisticsError::InsufficientData {
                required: MIN_ANALYSIS_RECORDS,
                actual: records.len(),
            });
        }

        info!(records = records.len(), "running statistical analysis");

        let report = AnalysisReport {
            records: records.to_vec(),
            correlations: self.analyze_correlations(records),
            phase_comparison: analyze_phases(records, self.significance_level),
            volatility_analysis: analyze_volatility_patterns(records),
            full_moon_comparison: analyze_full_moon_window(records, self.significance_level),
            summaries: self.summarize(records),
        };

        info!("statistical analysis complete");
        Ok(report)
    }

    /// Correlates each derived stock metric against each lunar metric over
    /// the subset of records where the stock metric is defined.
    fn analyze_correlations(
        &self,
        records: &[CombinedRecord],
    ) -> BTreeMap<String, crate::report::CorrelationAnalysis> {
        let stock_metrics: [(&str, fn(&CombinedRecord) -> Option<f64>); 3] = [
            ("daily_return", |r| r.daily_return),
            ("abs_return", |r| r.abs_return),
            ("volatility", |r| r.volatility),
        ];
        let lunar_metrics: [(&str, fn(&CombinedRecord) -> f64); 2] = [
            ("illumination", |r| r.illumination),
            ("days_from_full", |r| r.days_from_full as f64),
        ];

        let mut correlations = BTreeMap::new();
        for (stock_name, stock_accessor) in stock_metrics {
            for (lunar_name, lunar_accessor) in lunar_metrics {
                let label = format!("{stock_name}_vs_{lunar_name}");

                let (x, y): (Vec<f64>, Vec<f64>) = records
                    .iter()
                    .filter_map(|r| stock_accessor(r).map(|value| (value, lunar_accessor(r))))
                    .unzip();

                let analysis = correlation::analyze(&x, &y, &label, self.confidence_level);
                correlations.insert(label, analysis);
            }
        }
        correlations
    }

    /// Distribution summaries for the key metrics, over defined values.
    fn summarize(&self, records: &[CombinedRecord]) -> BTreeMap<String, StatisticalSummary> {
        let mut summaries = BTreeMap::new();

        let returns: Vec<f64> = records.iter().filter_map(|r| r.daily_return).collect();
        if let Some(summary) = summarize_values(&returns) {
            summaries.insert("daily_return".to_string(), summary);
        }

        let volatilities: Vec<f64> = records.iter().filter_map(|r| r.volatility).collect();
        if let Some(summary) = summarize_values(&volatilities) {
            summaries.insert("volatility".to_string(), summary);
        }

        let illuminations: Vec<f64> = records.iter().map(|r| r.illumination).collect();
        if let Some(summary) = summarize_values(&illuminations) {
            summaries.insert("illumination".to_string(), summary);
        }

        summaries
    }
}

fn summarize_values(values: &[f64]) -> Option<StatisticalSummary> {
    let mean_value = mean(values)?;
    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for value in values {
        min = min.min(*value);
        max = max.max(*value);
    }

    Some(StatisticalSummary {
        sample_size: values.len(),
        mean: mean_value,
        std: sample_std_dev(values).unwrap_or(0.0),
        min,
        max,
        median: median(values)?,
        skewness: skewness(values),
        kurtosis: kurtosis(values),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use core_types::{parse_timestamp, LunarPhase, LunarRecord, StockRecord};

    fn record(day: u32, phase: LunarPhase, offset: i32, illumination: f64) -> CombinedRecord {
        let ts = parse_timestamp(&format!("2024-03-{day:02}")).unwrap();
        let close = 100.0 + day as f64;
        let stock = StockRecord::new(ts, close, close + 1.0, close - 1.0, close, 1_000).unwrap();
        let lunar = LunarRecord::new(ts, phase, illumination, offset, offset.abs() <= 2).unwrap();
        let mut combined = CombinedRecord::from_parts(&stock, &lunar, ts.with_timezone(&Utc), true);
        combined.daily_return = Some(if day == 1 { 0.0 } else { 1.0 / close * 100.0 });
        combined.abs_return = combined.daily_return.map(f64::abs);
        combined.volatility = if day > 3 { Some(0.5 + day as f64 * 0.01) } else { None };
        combined
    }

    fn sample_records(n: u32) -> Vec<CombinedRecord> {
        (1..=n)
            .map(|day| {
                let offset = day as i32 - 8;
                let phase = if offset.abs() <= 3 { LunarPhase::Full } else { LunarPhase::LastQuarter };
                let illumination = (100 - 6 * offset.abs()) as f64;
                record(day, phase, offset, illumination)
            })
            .collect()
    }

    #[test]
    fn nine_records_fail_ten_succeed() {
        let engine = StatisticalEngine::default();

        let nine = sample_records(9);
        assert!(matches!(
            engine.analyze(&nine),
            Err(StatisticsError::InsufficientData { required: 10, actual: 9 })
        ));

        let ten = sample_records(10);
        assert!(engine.analyze(&ten).is_ok());
    }

    #[test]
    fn report_contains_all_six_correlation_pairs() {
        let report = StatisticalEngine::default()
            .analyze(&sample_records(15))
            .unwrap();

        let keys: Vec<&str> = report.correlations.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            vec![
                "abs_return_vs_days_from_full",
                "abs_return_vs_illumination",
                "daily_return_vs_days_from_full",
                "daily_return_vs_illumination",
                "volatility_vs_days_from_full",
                "volatility_vs_illumination",
            ]
        );
    }

    #[test]
    fn correlation_intervals_contain_their_point_estimates() {
        let report = StatisticalEngine::default()
            .analyze(&sample_records(20))
            .unwrap();

        for (label, analysis) in &report.correlations {
            let (lower, upper) = analysis.confidence_interval_95;
            let r = analysis.pearson_correlation;
            assert!(lower <= r && r <= upper, "{label}: ({lower}, {upper}) misses {r}");
            assert!((-1.0..=1.0).contains(&lower) && (-1.0..=1.0).contains(&upper));
        }
    }

    #[test]
    fn summaries_cover_the_three_key_metrics() {
        let report = StatisticalEngine::default()
            .analyze(&sample_records(15))
            .unwrap();

        for key in ["daily_return", "volatility", "illumination"] {
            let summary = report.summaries.get(key).unwrap_or_else(|| panic!("missing {key}"));
            assert!(summary.sample_size > 0);
            assert!(summary.min <= summary.median && summary.median <= summary.max);
        }
        assert_eq!(report.summaries["illumination"].sample_size, 15);
        // Volatility is undefined for the first three sample days.
        assert_eq!(report.summaries["volatility"].sample_size, 12);
    }

    #[test]
    fn volatility_patterns_degrade_below_their_own_floor() {
        use crate::report::VolatilityAnalysis;

        // Ten records clear the analysis floor but leave only seven
        // defined volatilities, below the pattern-analysis minimum.
        let report = StatisticalEngine::default()
            .analyze(&sample_records(10))
            .unwrap();
        assert!(matches!(
            report.volatility_analysis,
            VolatilityAnalysis::Insufficient { .. }
        ));

        let report = StatisticalEngine::default()
            .analyze(&sample_records(15))
            .unwrap();
        assert!(matches!(
            report.volatility_analysis,
            VolatilityAnalysis::Computed { .. }
        ));
    }

    #[test]
    fn report_preserves_the_input_sequence() {
        let records = sample_records(12);
        let report = StatisticalEngine::default().analyze(&records).unwrap();
        assert_eq!(report.records, records);
    }
}
