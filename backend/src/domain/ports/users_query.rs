//! Driving port for user reads.

use async_trait::async_trait;
use pagination::{Cursor, Page, PageLimit};

use crate::domain::{Error, User, UserId, UserRole};

/// Filters for one page of the users listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListUsersRequest {
    /// Page size.
    pub limit: PageLimit,
    /// Id of the last record on the previous page.
    pub cursor: Option<Cursor>,
    /// Only return records with this role.
    pub role: Option<UserRole>,
}

/// Domain use-case port for reading user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersQuery: Send + Sync {
    /// Return one page of records, newest first.
    async fn find_all(&self, request: &ListUsersRequest) -> Result<Page<User>, Error>;

    /// Return a single record.
    async fn find_one(&self, id: &UserId) -> Result<User, Error>;
}
