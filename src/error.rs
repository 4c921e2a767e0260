//! Error types for course-portal.

use thiserror::Error;

/// Main error type for course-portal operations.
#[derive(Error, Debug)]
pub enum PortalError {
    /// Storage is disabled or otherwise unreachable.
    #[error("storage unavailable: {0}")]
    StorageUnavailable(String),

    /// A write would exceed the storage quota.
    #[error("storage quota exceeded: {used} of {quota} bytes")]
    QuotaExceeded { used: usize, quota: usize },

    /// Stored data could not be decoded.
    #[error("corrupt stored value under '{key}': {reason}")]
    CorruptValue { key: String, reason: String },

    /// Identity failed validation.
    #[error("invalid identity: {0}")]
    InvalidIdentity(String),

    /// Page token does not name a known page.
    #[error("unknown page: {0}")]
    UnknownPage(String),

    /// Operation needs an authenticated session.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Course id is blank.
    #[error("invalid course id: '{0}'")]
    InvalidCourse(String),

    /// Course is already in the session's enrollment list.
    #[error("already enrolled in course: {0}")]
    AlreadyEnrolled(String),

    /// Coupon code is not recognised.
    #[error("invalid coupon: {0}")]
    InvalidCoupon(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON encoding or decoding error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience Result type for course-portal operations.
pub type Result<T> = std::result::Result<T, PortalError>;
