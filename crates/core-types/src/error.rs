use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid {field} price: {value} (prices must be non-negative)")]
    NegativePrice { field: &'static str, value: f64 },

    #[error("Illumination must be within 0-100%: {0}")]
    IlluminationOutOfRange(f64),

    #[error("Unknown lunar phase code: {0}")]
    UnknownPhase(u8),

    #[error("Unrecognized timestamp format: '{0}'")]
    InvalidTimestamp(String),
}
