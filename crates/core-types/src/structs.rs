use crate::enums::LunarPhase;
use crate::error::CoreError;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// One trading interval of price and volume data, as delivered by the
/// market data provider.
///
/// The derived fields (`daily_return`, `abs_return`, `volatility`) are left
/// empty at construction and populated later by the metrics engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub daily_return: Option<f64>,
    pub abs_return: Option<f64>,
    pub volatility: Option<f64>,
}

impl StockRecord {
    /// Builds a validated record.
    ///
    /// Negative prices are rejected outright. An OHLC ordering violation
    /// (low ≤ open,close ≤ high not holding) is a data quality issue that
    /// providers do occasionally produce, so it is logged rather than
    /// rejected.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: u64,
    ) -> Result<Self, CoreError> {
        for (field, value) in [("open", open), ("high", high), ("low", low), ("close", close)] {
            if value < 0.0 {
                return Err(CoreError::NegativePrice { field, value });
            }
        }

        if !(low <= open && open <= high && low <= close && close <= high) {
            warn!(
                date = %timestamp.date_naive(),
                open, high, low, close,
                "OHLC relationship violation"
            );
        }

        Ok(Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
            daily_return: None,
            abs_return: None,
            volatility: None,
        })
    }

    /// The calendar date of this record in its current timezone.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// One calendar day of the lunar cycle: phase category, illumination, and
/// the signed day offset from the nearest full moon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LunarRecord {
    pub timestamp: DateTime<FixedOffset>,
    pub phase: LunarPhase,
    /// Illuminated fraction of the lunar disc, 0-100%.
    pub illumination: f64,
    /// Signed day count to the nearest full moon (negative = after).
    pub days_from_full: i32,
    /// True iff this day falls within ±2 days of a full moon.
    pub full_moon_window: bool,
}

impl LunarRecord {
    /// Builds a validated record.
    ///
    /// Illumination outside [0, 100] is rejected. An offset outside the
    /// roughly ±15 day half-cycle is suspicious but tolerated with a
    /// warning. The full-moon-window flag is an invariant of the offset;
    /// if the provider's flag disagrees it is corrected, with a warning.
    pub fn new(
        timestamp: DateTime<FixedOffset>,
        phase: LunarPhase,
        illumination: f64,
        days_from_full: i32,
        full_moon_window: bool,
    ) -> Result<Self, CoreError> {
        if !(0.0..=100.0).contains(&illumination) {
            return Err(CoreError::IlluminationOutOfRange(illumination));
        }

        if days_from_full.abs() > 15 {
            warn!(
                date = %timestamp.date_naive(),
                days_from_full,
                "days from full moon outside typical half-cycle range"
            );
        }

        let derived_window = days_from_full.abs() <= 2;
        if full_moon_window != derived_window {
            warn!(
                date = %timestamp.date_naive(),
                days_from_full,
                provided = full_moon_window,
                "full moon window flag disagrees with day offset; using derived value"
            );
        }

        Ok(Self {
            timestamp,
            phase,
            illumination,
            days_from_full,
            full_moon_window: derived_window,
        })
    }

    /// The calendar date of this record in its current timezone.
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// The date-aligned join of one stock record and one lunar record.
///
/// Created exclusively by the temporal aligner; the metrics engine produces
/// new instances with the derived fields filled in, never mutating shared
/// state. `anomaly_score` is reserved for a downstream anomaly detector and
/// is always `None` within this core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CombinedRecord {
    pub timestamp: DateTime<Utc>,
    // Stock fields
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
    pub daily_return: Option<f64>,
    pub abs_return: Option<f64>,
    pub volatility: Option<f64>,
    // Lunar fields
    pub phase: LunarPhase,
    pub illumination: f64,
    pub days_from_full: i32,
    pub full_moon_window: bool,
    // Analysis fields
    pub trading_day: bool,
    pub anomaly_score: Option<f64>,
}

impl CombinedRecord {
    /// Joins a stock record and a lunar record at the given (already
    /// normalized) timestamp.
    ///
    /// Gap filling deliberately pairs a trading date with lunar data from a
    /// nearby calendar day, so a date mismatch between the two sources is
    /// logged for the audit trail rather than rejected.
    pub fn from_parts(
        stock: &StockRecord,
        lunar: &LunarRecord,
        timestamp: DateTime<Utc>,
        trading_day: bool,
    ) -> Self {
        if stock.date() != lunar.date() {
            warn!(
                stock_date = %stock.date(),
                lunar_date = %lunar.date(),
                "joining stock and lunar records from different dates"
            );
        }

        Self {
            timestamp,
            open: stock.open,
            high: stock.high,
            low: stock.low,
            close: stock.close,
            volume: stock.volume,
            daily_return: stock.daily_return,
            abs_return: stock.abs_return,
            volatility: stock.volatility,
            phase: lunar.phase,
            illumination: lunar.illumination,
            days_from_full: lunar.days_from_full,
            full_moon_window: lunar.full_moon_window,
            trading_day,
            anomaly_score: None,
        }
    }

    /// The calendar date of this record (UTC).
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Aggregated metrics for all combined records sharing one lunar phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseMetric {
    pub phase: LunarPhase,
    pub avg_volatility: f64,
    /// Percentage of days in this phase that closed higher than the
    /// previous day.
    pub green_day_percentage: f64,
    pub mean_return: f64,
    pub sample_count: usize,
}

/// Parses a provider timestamp string into a timezone-aware timestamp.
///
/// Accepted formats, tried in order after trimming whitespace:
/// - RFC 3339 (`2024-01-02T00:00:00Z`, `2024-01-02T09:30:00-05:00`)
/// - `YYYY-MM-DDTHH:MM:SS` and `YYYY-MM-DD HH:MM:SS` (naive, assumed UTC)
/// - `YYYY-MM-DD` (naive midnight, assumed UTC)
///
/// Anything else is a `CoreError::InvalidTimestamp`. Timestamps without
/// timezone information are assumed to already be in the reference zone
/// (UTC); this matches the alignment contract.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, CoreError> {
    let trimmed = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(dt);
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return Ok(naive.and_utc().fixed_offset());
        }
    }

    Err(CoreError::InvalidTimestamp(trimmed.to_string()))
}
