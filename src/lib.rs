//! # Syzygy
//!
//! Detects and quantifies statistical relationships between a stock price
//! series and the lunar cycle. The core is a three-stage pipeline over two
//! independently sampled streams with different native calendars:
//!
//! 1. **Temporal alignment** (`aligner`) — timezone normalization, trading
//!    calendar filtering, date joining, bounded gap filling.
//! 2. **Derived metrics** (`metrics`) — daily returns, absolute returns,
//!    rolling volatility, lunar-field consistency checks.
//! 3. **Statistical analysis** (`statistics`) — correlations, phase-group
//!    ANOVA with Bonferroni-corrected pairwise tests, volatility-pattern
//!    analysis, full-moon-window comparisons, summary statistics.
//!
//! Every stage is a pure transformation over in-memory sequences: no
//! stage mutates its input, nothing blocks, and no module-level state
//! exists, so analyses for different symbols or windows can run on
//! parallel threads freely. Data acquisition, caching, and presentation
//! are external collaborators.

use tracing::info;

pub mod error;

pub use aligner::{AlignmentError, TemporalAligner, TradingCalendar};
pub use configuration::{load_settings, AnalysisSettings, ConfigError, Settings};
pub use core_types::{
    parse_timestamp, CombinedRecord, CoreError, LunarPhase, LunarRecord, PhaseMetric, StockRecord,
};
pub use error::PipelineError;
pub use metrics::MetricsEngine;
pub use statistics::{
    AnalysisReport, CorrelationAnalysis, GroupComparison, PhaseComparisonResult,
    StatisticalEngine, StatisticalSummary, StatisticsError, VolatilityAnalysis,
    WindowComparisonReport,
};

/// Runs the full pipeline: align, enrich, analyze.
///
/// The inputs are the raw record sequences produced by the external data
/// collaborators; the output is the complete, JSON-serializable analysis
/// report. Hard failures (no overlapping tradable dates, fewer than the
/// minimum aligned records) surface as distinct `PipelineError` variants.
pub fn run_analysis(
    stock: &[StockRecord],
    lunar: &[LunarRecord],
    settings: &AnalysisSettings,
) -> Result<AnalysisReport, PipelineError> {
    info!(
        stock = stock.len(),
        lunar = lunar.len(),
        window = settings.rolling_window,
        "starting analysis pipeline"
    );

    let aligned = TemporalAligner::new(settings.gap_search_days).align(stock, lunar)?;
    let enriched = MetricsEngine::new().calculate(&aligned, settings.rolling_window);
    let report = StatisticalEngine::new(settings.significance_level, settings.confidence_level)
        .analyze(&enriched)?;

    Ok(report)
}
