use crate::lunar;
use core_types::CombinedRecord;
use tracing::{debug, warn};

/// A stateless calculator for per-day derived metrics.
///
/// Input records are assumed pre-sorted ascending by date (the aligner's
/// output contract); the output is a new sequence of equal length with the
/// derived fields populated.
#[derive(Debug, Default, Clone, Copy)]
pub struct MetricsEngine;

impl MetricsEngine {
    pub fn new() -> Self {
        Self
    }

    /// Derives daily return, absolute return, and rolling volatility for
    /// every record, and validates the lunar fields along the way.
    ///
    /// The first record has no prior reference, so its return is 0.0.
    /// Volatility over `window` trailing returns is undefined (absent) for
    /// the first `window` records and whenever fewer than two returns are
    /// available in the window.
    pub fn calculate(&self, records: &[CombinedRecord], window: usize) -> Vec<CombinedRecord> {
        if records.len() < 2 {
            warn!(len = records.len(), "insufficient data for derived metrics");
            // A lone record still gets its defined zero return; volatility
            // stays undefined.
            return records
                .iter()
                .map(|record| {
                    lunar::validate_phase_consistency(record);
                    let mut enriched = record.clone();
                    enriched.daily_return = Some(0.0);
                    enriched.abs_return = Some(0.0);
                    enriched.volatility = None;
                    enriched
                })
                .collect();
        }

        debug!(len = records.len(), window, "calculating derived metrics");

        // Returns are recomputed from closes rather than read back from the
        // input, which keeps the calculation idempotent.
        let returns: Vec<f64> = records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                if i == 0 {
                    0.0
                } else {
                    daily_return(record.close, records[i - 1].close)
                }
            })
            .collect();

        records
            .iter()
            .enumerate()
            .map(|(i, record)| {
                lunar::validate_phase_consistency(record);

                let mut enriched = record.clone();
                enriched.daily_return = Some(returns[i]);
                enriched.abs_return = Some(returns[i].abs());
                enriched.volatility = rolling_volatility(&returns, i, window);
                enriched
            })
            .collect()
    }

    /// Price change over the last `lookback` records, as a percentage.
    /// Zero when there is not enough history.
    pub fn price_momentum(
        &self,
        records: &[CombinedRecord],
        index: usize,
        lookback: usize,
    ) -> f64 {
        if index < lookback || index >= records.len() {
            return 0.0;
        }
        daily_return(records[index].close, records[index - lookback].close)
    }

    /// The high-low range of one record as a percentage of its close.
    /// Zero when the close is non-positive.
    pub fn intraday_range(&self, record: &CombinedRecord) -> f64 {
        if record.close <= 0.0 {
            return 0.0;
        }
        (record.high - record.low) / record.close * 100.0
    }

    /// Rolling Garman-Klass volatility estimate over the full OHLC bar,
    /// annualized as a percentage. Undefined until the window fills;
    /// records with a non-positive price are skipped within the window.
    pub fn garman_klass_volatility(
        &self,
        records: &[CombinedRecord],
        window: usize,
    ) -> Vec<Option<f64>> {
        rolling_estimate(records, window, |record| {
            let ln_high_open = (record.high / record.open).ln();
            let ln_low_open = (record.low / record.open).ln();
            let ln_close_open = (record.close / record.open).ln();
            ln_high_open * (ln_high_open - ln_close_open)
                + ln_low_open * (ln_low_open - ln_close_open)
        })
    }

    /// Rolling Parkinson volatility estimate from the high-low range,
    /// annualized as a percentage. Same window and skipping rules as the
    /// Garman-Klass estimator.
    pub fn parkinson_volatility(
        &self,
        records: &[CombinedRecord],
        window: usize,
    ) -> Vec<Option<f64>> {
        let scale = 4.0 * 2.0_f64.ln();
        rolling_estimate(records, window, move |record| {
            (record.high / record.low).ln().powi(2) / scale
        })
    }
}

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

/// Shared shape of the range-based volatility estimators: average a
/// per-bar variance term over the trailing window, then annualize.
///
/// The Garman-Klass term can go slightly negative on pathological bars,
/// so the window mean is floored at zero before the square root.
fn rolling_estimate(
    records: &[CombinedRecord],
    window: usize,
    term: impl Fn(&CombinedRecord) -> f64,
) -> Vec<Option<f64>> {
    records
        .iter()
        .enumerate()
        .map(|(i, _)| {
            if window == 0 || i + 1 < window {
                return None;
            }
            let terms: Vec<f64> = records[i + 1 - window..=i]
                .iter()
                .filter(|r| r.open > 0.0 && r.high > 0.0 && r.low > 0.0 && r.close > 0.0)
                .map(&term)
                .collect();
            if terms.is_empty() {
                return None;
            }
            let mean = terms.iter().sum::<f64>() / terms.len() as f64;
            Some(mean.max(0.0).sqrt() * TRADING_DAYS_PER_YEAR.sqrt() * 100.0)
        })
        .collect()
}

/// Percentage change from `previous` to `current`, guarding against a
/// non-positive denominator.
fn daily_return(current: f64, previous: f64) -> f64 {
    if previous <= 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Sample standard deviation of the `window` returns ending at `index`,
/// or `None` when the window is not yet full.
///
/// `returns[0]` is a placeholder (the first record has no return), so the
/// window only holds real returns once `index >= window`.
fn rolling_volatility(returns: &[f64], index: usize, window: usize) -> Option<f64> {
    if window == 0 || index < window {
        return None;
    }
    let slice = &returns[index + 1 - window..=index];
    sample_std_dev(slice)
}

/// Sample standard deviation (n−1 divisor); `None` for fewer than two values.
fn sample_std_dev(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    let sum_sq: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    Some((sum_sq / (n - 1) as f64).sqrt())
}
