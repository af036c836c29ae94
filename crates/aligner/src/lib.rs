//! # Temporal Aligner
//!
//! Produces a single, gap-aware, temporally consistent dataset from two
//! streams with different native calendars: daily stock bars (trading days
//! only) and the continuous daily lunar cycle.
//!
//! ## Architectural Principles
//!
//! - **Pure transformation:** `TemporalAligner` holds no analysis state.
//!   It takes the two raw record sequences as parameters and produces a new
//!   sequence of `CombinedRecord`s, so independent alignments can run
//!   concurrently without any shared mutable state.
//! - **Strict output contract:** the output is strictly ascending by date,
//!   free of duplicates, and normalized to a single reference timezone
//!   (UTC). A violation of that contract is an internal bug surfaced as a
//!   fatal `AlignmentError`, never silently repaired.

pub mod calendar;
pub mod engine;
pub mod error;

// Re-export the key components to create a clean, public-facing API.
pub use calendar::TradingCalendar;
pub use engine::TemporalAligner;
pub use error::AlignmentError;
