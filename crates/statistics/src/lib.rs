//! # Statistical Engine
//!
//! Consumes the enriched combined-record sequence and produces the full
//! analysis report: correlation analyses, phase-group comparisons,
//! full-moon-window comparisons, and summary statistics.
//!
//! ## Architectural Principles
//!
//! - **Hard floor, soft interior:** fewer than 10 records makes the whole
//!   analysis meaningless and fails with `StatisticsError::InsufficientData`.
//!   Inside a valid analysis, each sub-result that lacks its own minimum
//!   sample size degrades to a structured "insufficient data" marker
//!   instead of aborting the report.
//! - **Stateless calculation:** `StatisticalEngine` carries only its
//!   significance and confidence levels. Every invocation is a pure
//!   function of its input; concurrent analyses share nothing.

pub mod correlation;
pub mod descriptive;
pub mod engine;
pub mod error;
pub mod inference;
pub mod phase;
pub mod report;
pub mod volatility;
pub mod window;

// Re-export the key components to create a clean, public-facing API.
pub use engine::StatisticalEngine;
pub use error::StatisticsError;
pub use report::{
    AnalysisReport, CorrelationAnalysis, GroupComparison, GroupStats, IlluminationBin,
    IlluminationRelationship, PhaseComparisonResult, PhasePairDifference, StatisticalSummary,
    VolatilityAnalysis, VolatilityAutocorrelation, VolatilityRegimes, WindowComparisonReport,
};
