use crate::pool::ContentField;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error("item {id} beyond candidate pool size {size}")]
    IdOutOfRange { id: usize, size: usize },

    #[error("item {id} has no {field} content")]
    MissingField { id: usize, field: ContentField },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    #[error("encoder returned {found} feature vectors for a pool of {expected} items")]
    EncodingSizeMismatch { expected: usize, found: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SplitError {
    #[error("train ratio must lie strictly between 0 and 1, got {0}")]
    InvalidTrainRatio(f64),

    #[error("no sequence records to split")]
    EmptyInput,

    #[error("query id {0} routed to neither train nor validation")]
    ConsistencyViolation(usize),
}
