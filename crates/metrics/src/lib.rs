//! # Metrics Engine
//!
//! Walks an aligned record sequence in date order and derives the per-day
//! metrics the statistical engine consumes: daily returns, absolute
//! returns, and rolling volatility. Also validates the internal
//! consistency of the lunar fields.
//!
//! This stage never fails: malformed individual values degrade to absent
//! metrics rather than aborting the whole sequence. Everything here is a
//! pure function of its input, so repeated runs over the same sequence
//! produce identical output.

pub mod engine;
pub mod lunar;

pub use engine::MetricsEngine;
