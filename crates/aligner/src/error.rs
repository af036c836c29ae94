use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlignmentError {
    #[error("No overlapping tradable dates between stock and lunar data")]
    NoOverlap,

    #[error("Aligned output is not strictly ascending at {0}")]
    OutOfOrder(NaiveDate),

    #[error("Duplicate date in aligned output: {0}")]
    DuplicateDate(NaiveDate),
}
