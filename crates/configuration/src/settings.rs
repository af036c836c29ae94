use crate::error::ConfigError;
use serde::Deserialize;

/// The root configuration structure for an analysis run.
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub analysis: AnalysisSettings,
}

/// Tunable parameters of the alignment/metrics/statistics pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSettings {
    /// Window size (trading days) for rolling volatility.
    pub rolling_window: usize,
    /// Alpha level for hypothesis tests.
    pub significance_level: f64,
    /// Confidence level for correlation intervals.
    pub confidence_level: f64,
    /// How far (calendar days) gap filling may search for lunar data.
    pub gap_search_days: i64,
    /// Minimum aligned records required for a statistical analysis.
    pub min_sample_size: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            rolling_window: 7,
            significance_level: 0.05,
            confidence_level: 0.95,
            gap_search_days: 3,
            min_sample_size: 10,
        }
    }
}

impl AnalysisSettings {
    /// Rejects values that would make the pipeline silently meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rolling_window < 2 {
            return Err(ConfigError::Invalid {
                field: "analysis.rolling_window",
                reason: format!("{} (rolling volatility needs a window of at least 2)", self.rolling_window),
            });
        }
        for (field, value) in [
            ("analysis.significance_level", self.significance_level),
            ("analysis.confidence_level", self.confidence_level),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("{value} (must be strictly between 0 and 1)"),
                });
            }
        }
        if self.gap_search_days < 0 {
            return Err(ConfigError::Invalid {
                field: "analysis.gap_search_days",
                reason: format!("{} (must be non-negative)", self.gap_search_days),
            });
        }
        Ok(())
    }
}
