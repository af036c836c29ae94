use crate::calendar::TradingCalendar;
use crate::error::AlignmentError;
use chrono::{DateTime, Duration, NaiveDate, Utc};
use core_types::{CombinedRecord, LunarRecord, StockRecord};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

/// How far (in calendar days) gap filling may search for a lunar record to
/// pair with an otherwise-unmatched trading day. Bounds the interpolation
/// error of nearest-neighbor pairing.
const DEFAULT_GAP_SEARCH_DAYS: i64 = 3;

/// Maximum tolerated span between consecutive aligned records before the
/// gap is flagged in the audit log.
const GAP_AUDIT_THRESHOLD_DAYS: i64 = 7;

/// A stateless aligner that joins stock and lunar series on trading dates.
#[derive(Debug, Clone)]
pub struct TemporalAligner {
    calendar: TradingCalendar,
    gap_search_days: i64,
}

impl Default for TemporalAligner {
    fn default() -> Self {
        Self::new(DEFAULT_GAP_SEARCH_DAYS)
    }
}

impl TemporalAligner {
    pub fn new(gap_search_days: i64) -> Self {
        Self {
            calendar: TradingCalendar::new(),
            gap_search_days,
        }
    }

    /// The main entry point: normalizes, joins, gap-fills, and validates.
    ///
    /// # Returns
    ///
    /// A strictly date-ascending sequence of `CombinedRecord`s, one per
    /// trading date present (directly or via bounded nearest-neighbor
    /// pairing) in both inputs. Fails with `AlignmentError::NoOverlap` when
    /// the two series share no dates at all; ordering violations in the
    /// output indicate an internal bug and are fatal.
    pub fn align(
        &self,
        stock: &[StockRecord],
        lunar: &[LunarRecord],
    ) -> Result<Vec<CombinedRecord>, AlignmentError> {
        let stock_by_date = self.normalize_stock(stock);
        let lunar_by_date = self.normalize_lunar(lunar);

        let mut combined = self.join(&stock_by_date, &lunar_by_date)?;
        self.fill_missing_trading_days(&mut combined, &stock_by_date, &lunar_by_date);

        combined.sort_by_key(|record| record.timestamp);
        self.post_validate(&combined)?;
        self.audit_gaps(&combined);

        info!(aligned = combined.len(), "alignment complete");
        Ok(combined)
    }

    /// Normalizes every stock timestamp to the reference zone (UTC) and
    /// indexes the records by calendar date.
    ///
    /// Timestamps that carried a non-UTC offset are converted; naive
    /// timestamps were already interpreted as UTC at parse time.
    fn normalize_stock(&self, stock: &[StockRecord]) -> BTreeMap<NaiveDate, (StockRecord, DateTime<Utc>)> {
        let mut corrections = 0usize;
        let mut by_date = BTreeMap::new();

        for record in stock {
            if record.timestamp.offset().local_minus_utc() != 0 {
                corrections += 1;
            }
            let normalized = record.timestamp.with_timezone(&Utc);
            if let Some(previous) = by_date.insert(normalized.date_naive(), (record.clone(), normalized))
            {
                warn!(date = %previous.1.date_naive(), "duplicate stock date in input; keeping latest");
            }
        }

        if corrections > 0 {
            info!(corrections, "converted non-UTC stock timestamps to the reference zone");
        }
        by_date
    }

    /// Normalizes every lunar timestamp to UTC and indexes by date.
    fn normalize_lunar(&self, lunar: &[LunarRecord]) -> BTreeMap<NaiveDate, LunarRecord> {
        let mut corrections = 0usize;
        let mut by_date = BTreeMap::new();

        for record in lunar {
            if record.timestamp.offset().local_minus_utc() != 0 {
                corrections += 1;
            }
            let date = record.timestamp.with_timezone(&Utc).date_naive();
            if by_date.insert(date, record.clone()).is_some() {
                warn!(date = %date, "duplicate lunar date in input; keeping latest");
            }
        }

        if corrections > 0 {
            info!(corrections, "converted non-UTC lunar timestamps to the reference zone");
        }
        by_date
    }

    /// Joins the two series on the intersection of their dates, keeping
    /// only trading days.
    fn join(
        &self,
        stock_by_date: &BTreeMap<NaiveDate, (StockRecord, DateTime<Utc>)>,
        lunar_by_date: &BTreeMap<NaiveDate, LunarRecord>,
    ) -> Result<Vec<CombinedRecord>, AlignmentError> {
        let mut combined = Vec::new();
        let mut overlap = 0usize;

        for (date, (stock, normalized)) in stock_by_date {
            let Some(lunar) = lunar_by_date.get(date) else {
                continue;
            };
            overlap += 1;

            if self.calendar.is_trading_day(*date) {
                combined.push(CombinedRecord::from_parts(stock, lunar, *normalized, true));
            } else {
                debug!(date = %date, "excluding non-trading date from join");
            }
        }

        if overlap == 0 {
            return Err(AlignmentError::NoOverlap);
        }

        debug!(overlap, joined = combined.len(), "date join complete");
        Ok(combined)
    }

    /// Pairs unmatched trading days with the nearest lunar record.
    ///
    /// Every trading day between the earliest and latest joined dates that
    /// has a stock record but no combined record searches outward, closest
    /// day first, up to `gap_search_days` in either direction. Days with no
    /// lunar record in that window stay unfilled; that is a data gap, not
    /// an error.
    fn fill_missing_trading_days(
        &self,
        combined: &mut Vec<CombinedRecord>,
        stock_by_date: &BTreeMap<NaiveDate, (StockRecord, DateTime<Utc>)>,
        lunar_by_date: &BTreeMap<NaiveDate, LunarRecord>,
    ) {
        let Some(start) = combined.iter().map(|r| r.date()).min() else {
            return;
        };
        let end = combined.iter().map(|r| r.date()).max().unwrap_or(start);

        let existing: std::collections::BTreeSet<NaiveDate> =
            combined.iter().map(|r| r.date()).collect();

        let mut filled = 0usize;
        for date in self.calendar.trading_days_between(start, end) {
            if existing.contains(&date) {
                continue;
            }
            let Some((stock, normalized)) = stock_by_date.get(&date) else {
                continue;
            };
            if let Some(lunar) = self.find_closest_lunar(date, lunar_by_date) {
                combined.push(CombinedRecord::from_parts(stock, lunar, *normalized, true));
                filled += 1;
            }
        }

        if filled > 0 {
            info!(filled, "filled missing trading days with nearest lunar data");
        }
    }

    /// Finds the lunar record closest to `target`, checking the exact date
    /// first and then stepping outward one day at a time.
    fn find_closest_lunar<'a>(
        &self,
        target: NaiveDate,
        lunar_by_date: &'a BTreeMap<NaiveDate, LunarRecord>,
    ) -> Option<&'a LunarRecord> {
        if let Some(record) = lunar_by_date.get(&target) {
            return Some(record);
        }

        for offset in 1..=self.gap_search_days {
            if let Some(record) = lunar_by_date.get(&(target - Duration::days(offset))) {
                return Some(record);
            }
            if let Some(record) = lunar_by_date.get(&(target + Duration::days(offset))) {
                return Some(record);
            }
        }
        None
    }

    /// Verifies the output contract: strictly ascending dates with no
    /// duplicates. The single-timezone guarantee is carried by the
    /// `DateTime<Utc>` type itself.
    fn post_validate(&self, combined: &[CombinedRecord]) -> Result<(), AlignmentError> {
        for pair in combined.windows(2) {
            let (prev, next) = (pair[0].date(), pair[1].date());
            if next == prev {
                return Err(AlignmentError::DuplicateDate(next));
            }
            if next < prev {
                return Err(AlignmentError::OutOfOrder(next));
            }
        }
        Ok(())
    }

    /// Logs any span between consecutive records that exceeds the audit
    /// threshold. Long gaps are legitimate (delistings, data outages) but
    /// worth surfacing before anyone trusts the downstream statistics.
    fn audit_gaps(&self, combined: &[CombinedRecord]) {
        for pair in combined.windows(2) {
            let gap = (pair[1].date() - pair[0].date()).num_days();
            if gap > GAP_AUDIT_THRESHOLD_DAYS {
                warn!(
                    from = %pair[0].date(),
                    to = %pair[1].date(),
                    gap_days = gap,
                    "large gap between aligned records"
                );
            }
        }
    }
}
