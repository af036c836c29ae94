use chrono::{Datelike, Duration, NaiveDate, Weekday};

/// US equity market trading calendar: weekdays minus a fixed holiday set.
///
/// The holiday set covers the closures that matter for daily-bar alignment:
/// New Year's Day, Independence Day, Thanksgiving (fourth Thursday of
/// November), the day after Thanksgiving, and Christmas Day, recomputed for
/// whichever year a queried date falls in.
#[derive(Debug, Default, Clone, Copy)]
pub struct TradingCalendar;

impl TradingCalendar {
    pub fn new() -> Self {
        Self
    }

    /// Returns `true` if `date` is a weekday that is not a market holiday.
    pub fn is_trading_day(&self, date: NaiveDate) -> bool {
        if matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        !self.holidays_for(date.year()).contains(&date)
    }

    /// All trading days in the inclusive range `[start, end]`, ascending.
    pub fn trading_days_between(&self, start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
        let mut days = Vec::new();
        let mut current = start;
        while current <= end {
            if self.is_trading_day(current) {
                days.push(current);
            }
            current += Duration::days(1);
        }
        days
    }

    /// The market holidays observed in `year`.
    fn holidays_for(&self, year: i32) -> [NaiveDate; 5] {
        // The unwraps cannot fail: month/day literals are valid for every year.
        let new_years = NaiveDate::from_ymd_opt(year, 1, 1).unwrap();
        let independence = NaiveDate::from_ymd_opt(year, 7, 4).unwrap();
        let christmas = NaiveDate::from_ymd_opt(year, 12, 25).unwrap();
        let thanksgiving = nth_weekday(year, 11, Weekday::Thu, 4);
        let day_after = thanksgiving + Duration::days(1);

        [new_years, independence, thanksgiving, day_after, christmas]
    }
}

/// The `n`th occurrence (1-based) of `weekday` in the given month.
fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> NaiveDate {
    let first = NaiveDate::from_ymd_opt(year, month, 1).unwrap();
    let offset = (7 + weekday.num_days_from_monday() - first.weekday().num_days_from_monday()) % 7;
    first + Duration::days(offset as i64 + 7 * (n as i64 - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn weekends_are_not_trading_days() {
        let cal = TradingCalendar::new();
        assert!(!cal.is_trading_day(d(2024, 1, 6))); // Saturday
        assert!(!cal.is_trading_day(d(2024, 1, 7))); // Sunday
        assert!(cal.is_trading_day(d(2024, 1, 8))); // Monday
    }

    #[test]
    fn fixed_holidays_are_excluded() {
        let cal = TradingCalendar::new();
        assert!(!cal.is_trading_day(d(2024, 1, 1)));
        assert!(!cal.is_trading_day(d(2024, 7, 4)));
        assert!(!cal.is_trading_day(d(2024, 12, 25)));
    }

    #[test]
    fn thanksgiving_and_black_friday_are_recomputed_per_year() {
        let cal = TradingCalendar::new();
        // 2024: fourth Thursday of November is the 28th.
        assert!(!cal.is_trading_day(d(2024, 11, 28)));
        assert!(!cal.is_trading_day(d(2024, 11, 29)));
        // 2023: the 23rd.
        assert!(!cal.is_trading_day(d(2023, 11, 23)));
        assert!(!cal.is_trading_day(d(2023, 11, 24)));
        // The Wednesday before is a normal trading day.
        assert!(cal.is_trading_day(d(2024, 11, 27)));
    }

    #[test]
    fn trading_days_between_skips_weekends_and_holidays() {
        let cal = TradingCalendar::new();
        let days = cal.trading_days_between(d(2024, 1, 1), d(2024, 1, 10));
        // Jan 1 is a holiday, Jan 6-7 a weekend.
        assert_eq!(
            days,
            vec![
                d(2024, 1, 2),
                d(2024, 1, 3),
                d(2024, 1, 4),
                d(2024, 1, 5),
                d(2024, 1, 8),
                d(2024, 1, 9),
                d(2024, 1, 10),
            ]
        );
    }

    #[test]
    fn nth_weekday_handles_month_starting_on_target_day() {
        // November 2024 starts on a Friday; first Friday is the 1st.
        assert_eq!(nth_weekday(2024, 11, Weekday::Fri, 1), d(2024, 11, 1));
        assert_eq!(nth_weekday(2024, 11, Weekday::Thu, 4), d(2024, 11, 28));
    }
}
