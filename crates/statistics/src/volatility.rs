use crate::correlation::pearson;
use crate::descriptive::{mean, median, sample_std_dev};
use crate::inference::correlation_p_value;
use crate::report::{
    IlluminationBin, IlluminationRelationship, VolatilityAnalysis, VolatilityAutocorrelation,
    VolatilityRegimes,
};
use core_types::CombinedRecord;
use tracing::{debug, warn};

/// Minimum defined volatility observations for any pattern analysis.
pub const MIN_VOLATILITY_SAMPLES: usize = 10;

/// Minimum observations for the clustering and regime sub-analyses, which
/// need enough history to say anything about serial structure.
pub const MIN_PATTERN_SAMPLES: usize = 20;

/// Lags at which volatility clustering is measured.
const AUTOCORRELATION_LAGS: [usize; 5] = [1, 2, 3, 5, 10];

const ILLUMINATION_BIN_WIDTH: f64 = 10.0;
const ILLUMINATION_BIN_COUNT: usize = 10;

/// Analyzes the structure of the rolling-volatility series: clustering
/// (autocorrelation), the relationship to lunar illumination, and high/low
/// regime persistence.
///
/// Operates on the subset of records whose volatility is defined, pairing
/// each value with that record's illumination.
pub fn analyze_volatility_patterns(records: &[CombinedRecord]) -> VolatilityAnalysis {
    let (volatilities, illuminations): (Vec<f64>, Vec<f64>) = records
        .iter()
        .filter_map(|r| r.volatility.map(|v| (v, r.illumination)))
        .filter(|(v, _)| v.is_finite())
        .unzip();
    let n = volatilities.len();

    if n < MIN_VOLATILITY_SAMPLES {
        warn!(n, "insufficient data for volatility pattern analysis");
        return VolatilityAnalysis::Insufficient {
            reason: format!(
                "insufficient data for volatility pattern analysis: {n} observations (minimum {MIN_VOLATILITY_SAMPLES})"
            ),
        };
    }

    let (mut min, mut max) = (f64::INFINITY, f64::NEG_INFINITY);
    for value in &volatilities {
        min = min.min(*value);
        max = max.max(*value);
    }

    VolatilityAnalysis::Computed {
        sample_size: n,
        mean_volatility: mean(&volatilities).unwrap_or(0.0),
        volatility_of_volatility: sample_std_dev(&volatilities).unwrap_or(0.0),
        min_volatility: min,
        max_volatility: max,
        illumination_relationship: illumination_relationship(&volatilities, &illuminations),
        clustering: clustering(&volatilities),
        regimes: detect_regimes(&volatilities),
    }
}

/// Autocorrelations of the volatility series at the fixed lag set, or
/// `None` below the pattern-analysis floor.
fn clustering(volatilities: &[f64]) -> Option<Vec<VolatilityAutocorrelation>> {
    if volatilities.len() < MIN_PATTERN_SAMPLES {
        debug!(
            n = volatilities.len(),
            "too few volatility observations for clustering analysis"
        );
        return None;
    }

    Some(
        AUTOCORRELATION_LAGS
            .iter()
            .filter(|&&lag| lag < volatilities.len())
            .map(|&lag| VolatilityAutocorrelation {
                lag,
                autocorrelation: pearson(
                    &volatilities[..volatilities.len() - lag],
                    &volatilities[lag..],
                ),
            })
            .collect(),
    )
}

/// Correlates volatility against illumination and averages it over ten
/// equal illumination bands. The last band is closed above so a fully
/// illuminated day still lands in it; empty bands are omitted.
fn illumination_relationship(volatilities: &[f64], illuminations: &[f64]) -> IlluminationRelationship {
    let correlation = pearson(volatilities, illuminations);
    let p_value = correlation_p_value(correlation, volatilities.len());

    let mut bins = Vec::new();
    for index in 0..ILLUMINATION_BIN_COUNT {
        let low = index as f64 * ILLUMINATION_BIN_WIDTH;
        let high = low + ILLUMINATION_BIN_WIDTH;
        let last = index == ILLUMINATION_BIN_COUNT - 1;

        let members: Vec<f64> = illuminations
            .iter()
            .zip(volatilities)
            .filter(|(illumination, _)| {
                **illumination >= low && (**illumination < high || (last && **illumination <= high))
            })
            .map(|(_, volatility)| *volatility)
            .collect();

        if let Some(mean_volatility) = mean(&members) {
            bins.push(IlluminationBin {
                illumination_min: low,
                illumination_max: high,
                mean_volatility,
                n: members.len(),
            });
        }
    }

    IlluminationRelationship {
        correlation,
        p_value,
        bins,
    }
}

/// Splits the series at its median into high/low regimes and measures
/// their persistence, or `None` below the pattern-analysis floor.
fn detect_regimes(volatilities: &[f64]) -> Option<VolatilityRegimes> {
    if volatilities.len() < MIN_PATTERN_SAMPLES {
        debug!(
            n = volatilities.len(),
            "too few volatility observations for regime detection"
        );
        return None;
    }
    let threshold = median(volatilities)?;

    let high: Vec<bool> = volatilities.iter().map(|v| *v > threshold).collect();
    let high_periods = high.iter().filter(|h| **h).count();

    let mut run_lengths = Vec::new();
    let mut current = 1usize;
    for pair in high.windows(2) {
        if pair[0] == pair[1] {
            current += 1;
        } else {
            run_lengths.push(current);
            current = 1;
        }
    }
    run_lengths.push(current);

    let average_regime_length =
        run_lengths.iter().sum::<usize>() as f64 / run_lengths.len() as f64;

    Some(VolatilityRegimes {
        threshold,
        high_periods,
        low_periods: volatilities.len() - high_periods,
        average_regime_length,
        max_regime_length: run_lengths.iter().copied().max().unwrap_or(0),
        regime_switches: run_lengths.len() - 1,
    })
}
