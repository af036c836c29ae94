// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{AnalysisSettings, Settings};

/// Loads the analysis configuration.
///
/// Defaults are defined in code; a `syzygy.toml` file in the working
/// directory, when present, overrides them field by field. Malformed
/// files and out-of-range values are rejected with a `ConfigError`.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let defaults = AnalysisSettings::default();

    let builder = config::Config::builder()
        .set_default("analysis.rolling_window", defaults.rolling_window as u64)?
        .set_default("analysis.significance_level", defaults.significance_level)?
        .set_default("analysis.confidence_level", defaults.confidence_level)?
        .set_default("analysis.gap_search_days", defaults.gap_search_days)?
        .set_default("analysis.min_sample_size", defaults.min_sample_size as u64)?
        .add_source(config::File::with_name("syzygy").required(false))
        .build()?;

    let settings = builder.try_deserialize::<Settings>()?;
    settings.analysis.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert!(AnalysisSettings::default().validate().is_ok());
    }

    #[test]
    fn degenerate_values_are_rejected() {
        let mut settings = AnalysisSettings::default();
        settings.rolling_window = 1;
        assert!(settings.validate().is_err());

        let mut settings = AnalysisSettings::default();
        settings.significance_level = 0.0;
        assert!(settings.validate().is_err());

        let mut settings = AnalysisSettings::default();
        settings.confidence_level = 1.0;
        assert!(settings.validate().is_err());
    }
}
