//! Port abstraction for user persistence.
//!
//! Implementations translate between stored documents and [`User`] records
//! and surface only the domain error taxonomy: `not_found` and
//! `invalid_argument` pass through, anything else arrives as
//! `internal_error`.

use async_trait::async_trait;
use pagination::Page;

use crate::domain::{EmailAddress, Error, User, UserId};

use super::{ListUsersRequest, NewUser, UserPatch};

/// Driven port for user record persistence.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Write a new record with store-assigned timestamps and return it.
    ///
    /// No uniqueness checks are performed here.
    async fn create(&self, user: &NewUser) -> Result<User, Error>;

    /// Fetch a record, failing with `not_found` when it is absent.
    async fn find_by_id(&self, id: &UserId) -> Result<User, Error>;

    /// Fetch the record holding `email`, if any.
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error>;

    /// Merge `patch` into an existing record, re-stamp `updatedAt` and
    /// return the refreshed record.
    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error>;

    /// Permanently delete a record, failing with `not_found` when absent.
    async fn remove(&self, id: &UserId) -> Result<(), Error>;

    /// Return one page of records ordered newest first.
    async fn list(&self, request: &ListUsersRequest) -> Result<Page<User>, Error>;
}
