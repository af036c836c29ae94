//! End-to-end pipeline tests: raw records in, JSON-serializable report out.

use chrono::{Datelike, Duration, NaiveDate};
use syzygy::{
    parse_timestamp, run_analysis, AlignmentError, AnalysisSettings, GroupComparison, LunarPhase,
    LunarRecord, MetricsEngine, PipelineError, StatisticalEngine, StockRecord, StatisticsError,
    TemporalAligner, TradingCalendar,
};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

fn stock_record(day: NaiveDate, close: f64) -> StockRecord {
    let ts = parse_timestamp(&day.to_string()).unwrap();
    StockRecord::new(ts, close * 0.995, close * 1.01, close * 0.99, close, 1_000_000).unwrap()
}

/// Synthesizes a lunar record for the `index`-th day of a 30-day cycle,
/// with phase and illumination kept mutually consistent.
fn lunar_record(day: NaiveDate, index: usize) -> LunarRecord {
    let offset = 15 - (index % 30) as i32;
    let illumination = (15 - offset.abs()) as f64 / 15.0 * 100.0;
    let waxing = offset > 0;

    let phase = if illumination < 12.5 {
        LunarPhase::New
    } else if illumination < 37.5 {
        if waxing { LunarPhase::WaxingCrescent } else { LunarPhase::WaningCrescent }
    } else if illumination < 62.5 {
        if waxing { LunarPhase::FirstQuarter } else { LunarPhase::LastQuarter }
    } else if illumination < 87.5 {
        if waxing { LunarPhase::WaxingGibbous } else { LunarPhase::WaningGibbous }
    } else {
        LunarPhase::Full
    };

    let ts = parse_timestamp(&day.to_string()).unwrap();
    LunarRecord::new(ts, phase, illumination, offset, offset.abs() <= 2).unwrap()
}

/// A deterministic but non-trivial close series.
fn close_for(index: usize) -> f64 {
    100.0 + (index as f64 * 0.7).sin() * 5.0 + index as f64 * 0.05
}

/// Stock bars on every calendar day (providers also ship half-days and
/// occasional weekend artifacts) plus lunar data over the same span.
fn synthesize(start: NaiveDate, calendar_days: usize) -> (Vec<StockRecord>, Vec<LunarRecord>) {
    let mut stock = Vec::new();
    let mut lunar = Vec::new();
    for index in 0..calendar_days {
        let day = start + Duration::days(index as i64);
        stock.push(stock_record(day, close_for(index)));
        lunar.push(lunar_record(day, index));
    }
    (stock, lunar)
}

#[test]
fn january_week_alignment_scenario() {
    // Stock bars for every calendar day Jan 1-10 2024 and lunar data for
    // the 11 days Jan 1-11: the New Year holiday and the first weekend
    // must be excluded, leaving exactly seven trading days.
    let (stock, _) = synthesize(date(2024, 1, 1), 10);
    let (_, lunar) = synthesize(date(2024, 1, 1), 11);

    let aligned = TemporalAligner::default().align(&stock, &lunar).unwrap();

    let dates: Vec<NaiveDate> = aligned.iter().map(|r| r.date()).collect();
    assert_eq!(
        dates,
        vec![
            date(2024, 1, 2),
            date(2024, 1, 3),
            date(2024, 1, 4),
            date(2024, 1, 5),
            date(2024, 1, 8),
            date(2024, 1, 9),
            date(2024, 1, 10),
        ]
    );
    assert!(dates.iter().all(|d| d.weekday().num_days_from_monday() < 5));
}

#[test]
fn aligned_output_matches_raw_date_intersection_modulo_gap_fill() {
    let (stock, lunar) = synthesize(date(2024, 2, 1), 45);
    let aligned = TemporalAligner::default().align(&stock, &lunar).unwrap();

    let calendar = TradingCalendar::new();
    let expected: Vec<NaiveDate> = stock
        .iter()
        .map(|s| s.date())
        .filter(|d| calendar.is_trading_day(*d) && lunar.iter().any(|l| l.date() == *d))
        .collect();

    let actual: Vec<NaiveDate> = aligned.iter().map(|r| r.date()).collect();
    assert_eq!(actual, expected);
}

#[test]
fn full_pipeline_produces_a_serializable_report() {
    let (stock, lunar) = synthesize(date(2024, 1, 1), 90);
    let settings = configuration_defaults();

    let report = run_analysis(&stock, &lunar, &settings).unwrap();

    // Every record carries derived metrics once the pipeline has run.
    assert!(report.records.len() >= 50);
    assert!(report.records.iter().all(|r| r.daily_return.is_some()));
    assert!(report.records[0].volatility.is_none());
    assert!(report.records.last().unwrap().volatility.is_some());

    assert_eq!(report.correlations.len(), 6);
    assert!(report.summaries.contains_key("daily_return"));
    assert!(report.summaries.contains_key("volatility"));
    assert!(report.summaries.contains_key("illumination"));

    let json = serde_json::to_value(&report).unwrap();
    let first_date = json["records"][0]["timestamp"].as_str().unwrap();
    assert!(first_date.starts_with("2024-01-02T00:00:00"));
    assert!(json["correlations"]["volatility_vs_illumination"]["pearson_p_value"].is_number());
    assert!(json["phase_comparison"]["anova_p_value"].is_number());
    assert!(json["full_moon_comparison"]["abs_return"]["status"].is_string());
    // With ~60 trading days the volatility pattern analysis clears both
    // its own floor and the serial-structure floor.
    assert_eq!(json["volatility_analysis"]["status"], "computed");
    assert!(json["volatility_analysis"]["clustering"].is_array());
    assert!(json["volatility_analysis"]["regimes"]["threshold"].is_number());
    assert!(json["volatility_analysis"]["illumination_relationship"]["correlation"].is_number());
}

#[test]
fn metrics_stage_is_idempotent_within_the_pipeline() {
    let (stock, lunar) = synthesize(date(2024, 1, 1), 40);
    let aligned = TemporalAligner::default().align(&stock, &lunar).unwrap();

    let engine = MetricsEngine::new();
    let once = engine.calculate(&aligned, 7);
    let twice = engine.calculate(&once, 7);
    assert_eq!(once, twice);
}

#[test]
fn nine_aligned_records_fail_ten_pass() {
    // Jan 2-12 2024 spans exactly nine trading days.
    let (stock, lunar) = synthesize(date(2024, 1, 2), 11);
    let result = run_analysis(&stock, &lunar, &configuration_defaults());
    assert!(matches!(
        result,
        Err(PipelineError::Statistics(StatisticsError::InsufficientData {
            required: 10,
            actual: 9,
        }))
    ));

    // Extending through Monday Jan 15 adds the tenth.
    let (stock, lunar) = synthesize(date(2024, 1, 2), 14);
    assert!(run_analysis(&stock, &lunar, &configuration_defaults()).is_ok());
}

#[test]
fn disjoint_ranges_fail_with_a_distinct_alignment_error() {
    let (stock, _) = synthesize(date(2024, 1, 1), 20);
    let (_, lunar) = synthesize(date(2025, 6, 1), 20);

    let result = run_analysis(&stock, &lunar, &configuration_defaults());
    assert!(matches!(
        result,
        Err(PipelineError::Alignment(AlignmentError::NoOverlap))
    ));
}

#[test]
fn flat_prices_yield_zero_returns_and_zero_volatility_end_to_end() {
    let start = date(2024, 3, 4); // a Monday
    let mut stock = Vec::new();
    let mut lunar = Vec::new();
    for index in 0..12usize {
        let day = start + Duration::days(index as i64);
        stock.push(stock_record(day, 250.0));
        lunar.push(lunar_record(day, index));
    }

    let aligned = TemporalAligner::default().align(&stock, &lunar).unwrap();
    let enriched = MetricsEngine::new().calculate(&aligned, 3);

    for record in &enriched {
        assert_eq!(record.daily_return, Some(0.0));
    }
    for record in enriched.iter().skip(3) {
        assert_eq!(record.volatility, Some(0.0));
    }
}

#[test]
fn window_comparison_degrades_per_metric_not_per_report() {
    // Twenty calendar days from Monday 2024-04-01 give fifteen trading
    // days; with offsets walking 10, 9, ... the full-moon window covers
    // aligned positions 6-9. An 8-day rolling window leaves only two
    // in-window volatility samples (positions 8 and 9), while absolute
    // returns are defined everywhere: volatility must degrade, absolute
    // returns must not.
    let start = date(2024, 4, 1);
    let mut stock = Vec::new();
    let mut lunar = Vec::new();
    for index in 0..20usize {
        let day = start + Duration::days(index as i64);
        stock.push(stock_record(day, close_for(index)));
        let ts = parse_timestamp(&day.to_string()).unwrap();
        let offset = 10 - index as i32;
        let illumination = (15 - offset.abs()) as f64 / 15.0 * 100.0;
        lunar.push(
            LunarRecord::new(ts, LunarPhase::WaxingGibbous, illumination, offset, offset.abs() <= 2)
                .unwrap(),
        );
    }

    let aligned = TemporalAligner::default().align(&stock, &lunar).unwrap();
    let enriched = MetricsEngine::new().calculate(&aligned, 8);
    let report = StatisticalEngine::default().analyze(&enriched).unwrap();

    let comparison = &report.full_moon_comparison;
    assert_eq!(comparison.full_moon_periods, 4);
    assert!(matches!(comparison.abs_return, GroupComparison::Computed { .. }));
    assert!(matches!(comparison.volatility, GroupComparison::Insufficient { .. }));
}

fn configuration_defaults() -> AnalysisSettings {
    AnalysisSettings::default()
}
