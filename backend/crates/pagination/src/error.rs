//! Validation failures raised by pagination primitives.

/// Errors returned when pagination input is rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PaginationError {
    /// The requested page size falls outside the accepted range.
    #[error("limit must be between {min} and {max}, got {value}")]
    LimitOutOfRange {
        /// Value supplied by the caller.
        value: u32,
        /// Smallest accepted limit.
        min: u16,
        /// Largest accepted limit.
        max: u16,
    },
    /// The cursor token was empty.
    #[error("cursor must not be empty")]
    EmptyCursor,
    /// The cursor token contained whitespace.
    #[error("cursor must not contain whitespace")]
    MalformedCursor,
}
