//! Driving port for user mutations.
//!
//! Inbound adapters call [`UsersCommand`] to create, change and delete user
//! records. Implementations own the invariants spanning several records, such
//! as email uniqueness.

use async_trait::async_trait;

use crate::domain::{EmailAddress, Error, User, UserId, UserName, UserRole};

/// Fields required to create a user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Display name.
    pub name: UserName,
    /// Email address; must not belong to another record.
    pub email: EmailAddress,
    /// Granted role.
    pub role: UserRole,
}

impl NewUser {
    /// Create with the default role.
    #[must_use]
    pub fn new(name: UserName, email: EmailAddress) -> Self {
        Self {
            name,
            email,
            role: UserRole::default(),
        }
    }

    /// Override the role.
    #[must_use]
    pub fn with_role(mut self, role: UserRole) -> Self {
        self.role = role;
        self
    }
}

/// Partial update; `None` leaves the stored value untouched.
///
/// An empty patch still refreshes `updatedAt`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    /// Replacement name.
    pub name: Option<UserName>,
    /// Replacement email.
    pub email: Option<EmailAddress>,
    /// Replacement role.
    pub role: Option<UserRole>,
    /// Replacement active flag.
    pub is_active: Option<bool>,
}

/// Domain use-case port for changing user records.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UsersCommand: Send + Sync {
    /// Create a record, rejecting an email that is already in use.
    async fn create(&self, user: NewUser) -> Result<User, Error>;

    /// Apply a partial update to an existing record.
    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, Error>;

    /// Delete an existing record.
    async fn remove(&self, id: &UserId) -> Result<(), Error>;
}
