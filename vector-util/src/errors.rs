use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum IndexError {
    #[error("query dimension {found} does not match index dimension {expected}")]
    DimensionMismatch { expected: usize, found: usize },

    #[error("requested top {requested} out of {available} candidates")]
    InsufficientCandidates { requested: usize, available: usize },

    #[error("parallel slices disagree in length ({scores} scores vs {ids} ids)")]
    LengthMismatch { scores: usize, ids: usize },
}
