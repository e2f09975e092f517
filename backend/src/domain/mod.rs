//! Domain primitives, ports and services.
//!
//! Public surface:
//! - `Error` / `ErrorCode`: transport-agnostic failure taxonomy.
//! - `User` and its value types.
//! - `UserService`: uniqueness and existence rules over a `UserRepository`.
//! - `TraceId`: request correlation id held in task-local storage.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
mod user_service;

pub use self::error::{Error, ErrorCode, ErrorValidationError, TRACE_ID_HEADER};
pub use self::trace_id::TraceId;
pub use self::user::{
    EmailAddress, User, UserBuilder, UserId, UserName, UserRole, UserValidationError,
};
pub use self::user_service::UserService;

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use user_records::domain::{ApiResult, Error};
///
/// fn lookup() -> ApiResult<()> {
///     Err(Error::not_found("user with id \"u1\" not found"))
/// }
/// assert!(lookup().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
