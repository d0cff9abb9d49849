//! Error types for the rotator and its display surfaces.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RotatorError {
    #[error("message list must contain at least one message")]
    EmptyMessageList,

    /// The page does not carry an element with the requested id
    #[error("display surface '{0}' not found")]
    SurfaceNotFound(String),

    #[error("display surface write failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("rotation task failed: {0}")]
    TaskFailed(String),
}

pub type Result<T> = std::result::Result<T, RotatorError>;
