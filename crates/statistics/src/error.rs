use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatisticsError {
    #[error("Insufficient data for statistical analysis: {actual} records (minimum {required})")]
    InsufficientData { required: usize, actual: usize },
}
