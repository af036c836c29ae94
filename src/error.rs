use thiserror::Error;

/// The pipeline-level error: every hard failure of a stage stays a
/// distinct, identifiable condition rather than being masked as an empty
/// report.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid input record: {0}")]
    Validation(#[from] core_types::CoreError),

    #[error("temporal alignment failed: {0}")]
    Alignment(#[from] aligner::AlignmentError),

    #[error("statistical analysis failed: {0}")]
    Statistics(#[from] statistics::StatisticsError),

    #[error("configuration error: {0}")]
    Configuration(#[from] configuration::ConfigError),
}
