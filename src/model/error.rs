use thiserror::Error;

/// Validation failures of the profile tree and interval transforms.
///
/// Every variant is a local rejection; the input collection is never touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("parent '{0}' does not exist or is not a folder")]
    InvalidParent(String),

    #[error("a sibling named '{title}' already exists")]
    DuplicateSibling { title: String },

    #[error("moving '{node}' under '{parent}' would make it its own ancestor")]
    CycleDetected { node: String, parent: String },

    #[error("slot index {index} is outside 0..{len}")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("an interval duration of {0} minutes does not evenly divide the day")]
    InvalidDuration(u32),

    #[error("profile has {actual} intervals, expected {expected}")]
    IntervalCountMismatch { expected: usize, actual: usize },

    #[error("no profile or folder with id '{0}'")]
    UnknownNode(String),

    #[error("id '{0}' is already in use")]
    DuplicateId(String),

    #[error("'{0}' has no schedule data")]
    NotAProfile(String),

    #[error("title must not be empty")]
    EmptyTitle,
}
