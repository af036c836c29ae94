use core_types::{CombinedRecord, LunarPhase, PhaseMetric};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Correlation between one derived stock metric and one lunar metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationAnalysis {
    pub pearson_correlation: f64,
    pub pearson_p_value: f64,
    pub spearman_correlation: f64,
    pub spearman_p_value: f64,
    pub sample_size: usize,
    /// 95% confidence interval on the Pearson coefficient (Fisher z).
    pub confidence_interval_95: (f64, f64),
    /// Human-readable strength/direction/significance classification.
    pub interpretation: String,
}

impl CorrelationAnalysis {
    /// The placeholder returned when fewer than three paired observations
    /// are available: no correlation, nothing significant.
    pub fn insufficient(sample_size: usize) -> Self {
        Self {
            pearson_correlation: 0.0,
            pearson_p_value: 1.0,
            spearman_correlation: 0.0,
            spearman_p_value: 1.0,
            sample_size,
            confidence_interval_95: (0.0, 0.0),
            interpretation: "insufficient data".to_string(),
        }
    }
}

/// A phase pair whose volatility difference survived the Bonferroni
/// correction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhasePairDifference {
    pub phase_a: LunarPhase,
    pub phase_b: LunarPhase,
    pub p_value: f64,
}

/// Per-phase metrics plus the across-phase ANOVA and its follow-up
/// pairwise tests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseComparisonResult {
    pub phase_metrics: Vec<PhaseMetric>,
    pub anova_f_statistic: f64,
    pub anova_p_value: f64,
    pub significant_differences: Vec<PhasePairDifference>,
}

/// Descriptive statistics for one partition of a group comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupStats {
    pub mean: f64,
    pub std: f64,
    pub n: usize,
}

/// One full-moon-window vs. baseline comparison for a single metric.
///
/// A tagged result: sub-analyses that lack their minimum sample size
/// report a structured reason instead of failing the whole report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupComparison {
    Computed {
        window: GroupStats,
        baseline: GroupStats,
        t_statistic: f64,
        t_p_value: f64,
        u_statistic: f64,
        u_p_value: f64,
        cohens_d: f64,
        effect_size: String,
        significant: bool,
    },
    Insufficient {
        reason: String,
    },
}

/// Full-moon-window analysis over absolute returns and rolling volatility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindowComparisonReport {
    pub full_moon_periods: usize,
    pub baseline_periods: usize,
    pub abs_return: GroupComparison,
    pub volatility: GroupComparison,
}

/// Autocorrelation of the rolling-volatility series at one lag, evidence
/// of volatility clustering when positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityAutocorrelation {
    pub lag: usize,
    pub autocorrelation: f64,
}

/// Mean volatility over the records whose illumination falls in one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminationBin {
    pub illumination_min: f64,
    pub illumination_max: f64,
    pub mean_volatility: f64,
    pub n: usize,
}

/// Volatility as a function of lunar illumination: the overall correlation
/// plus per-band averages across the illumination range.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IlluminationRelationship {
    pub correlation: f64,
    pub p_value: f64,
    pub bins: Vec<IlluminationBin>,
}

/// High/low volatility regime structure, split at the median.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VolatilityRegimes {
    pub threshold: f64,
    pub high_periods: usize,
    pub low_periods: usize,
    pub average_regime_length: f64,
    pub max_regime_length: usize,
    pub regime_switches: usize,
}

/// Volatility-pattern analysis over the defined rolling-volatility values.
///
/// Same degradation contract as `GroupComparison`: too few observations
/// yields a structured reason, not a report failure. Within a computed
/// result, clustering and regime detection additionally require their own
/// larger sample floor and are absent below it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum VolatilityAnalysis {
    Computed {
        sample_size: usize,
        mean_volatility: f64,
        volatility_of_volatility: f64,
        min_volatility: f64,
        max_volatility: f64,
        illumination_relationship: IlluminationRelationship,
        clustering: Option<Vec<VolatilityAutocorrelation>>,
        regimes: Option<VolatilityRegimes>,
    },
    Insufficient {
        reason: String,
    },
}

/// Distribution summary for one metric across all defined values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalSummary {
    pub sample_size: usize,
    pub mean: f64,
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    pub skewness: f64,
    pub kurtosis: f64,
}

/// The complete analysis output: the enriched record sequence plus every
/// sub-analysis, serializable as a single nested JSON document with
/// ISO-8601 dates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub records: Vec<CombinedRecord>,
    /// Correlation results keyed by metric-pair name, in stable order.
    pub correlations: BTreeMap<String, CorrelationAnalysis>,
    pub phase_comparison: PhaseComparisonResult,
    pub volatility_analysis: VolatilityAnalysis,
    pub full_moon_comparison: WindowComparisonReport,
    pub summaries: BTreeMap<String, StatisticalSummary>,
}
