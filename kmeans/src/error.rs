//! Error types for k-means fitting and prediction

use thiserror::Error;

/// Result type alias using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the clustering engine.
#[derive(Debug, Error)]
pub enum Error {
    /// A precondition on the engine parameters or the dataset does not hold.
    #[error("invalid input: {0}")]
    InvalidInput(#[from] InvalidInput),

    /// The dedicated worker pool could not be started.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    /// True for precondition violations.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }
}

/// Reasons an input is rejected.
///
/// Checked before any parallel work starts, so a rejected call leaves the engine untouched.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum InvalidInput {
    #[error("dataset is empty")]
    EmptyDataset,

    #[error("cluster count must be positive")]
    ZeroClusters,

    #[error("worker count must be positive")]
    ZeroWorkers,

    /// More clusters than points.
    #[error("requested {requested} clusters, but dataset has {points} points")]
    TooManyClusters {
        requested: usize,
        points: usize,
    },

    #[error("points must have at least one coordinate")]
    ZeroDimension,

    /// A point's dimension differs from the first point or from the fitted centroids.
    #[error("dimension mismatch at point {index}: expected {expected}, found {found}")]
    DimensionMismatch {
        index: usize,
        expected: usize,
        found: usize,
    },

    #[error("point {index} has a non-finite coordinate")]
    NonFinite {
        index: usize,
    },

    /// Coordinates in one dimension are large enough that summing them may overflow.
    #[error("coordinates in dimension {dim} are too large to sum over the dataset")]
    SumOverflow {
        dim: usize,
    },

    /// The data range in one dimension is too wide to draw from.
    #[error("data bounds in dimension {dim} cannot be sampled")]
    UnsampleableBounds {
        dim: usize,
    },

    #[error("model has not been fitted")]
    NotFitted,
}
