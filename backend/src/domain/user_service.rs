//! User record domain service.
//!
//! Implements the driving ports on top of a [`UserRepository`]. The service
//! owns the rules that span several records: an email belongs to at most one
//! record, and a record must exist before it is changed. Errors from the
//! repository are returned untouched.
//!
//! The email check is a read followed by a write, not a transaction; two
//! concurrent writers using the same address can both pass it.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::Page;
use serde_json::json;
use tracing::{debug, info};

use crate::domain::ports::{
    ListUsersRequest, NewUser, UserPatch, UserRepository, UsersCommand, UsersQuery,
};
use crate::domain::{EmailAddress, Error, User, UserId};

/// Service implementing [`UsersCommand`] and [`UsersQuery`].
#[derive(Clone)]
pub struct UserService<R> {
    repository: Arc<R>,
}

impl<R> UserService<R> {
    /// Create a service over the given repository.
    pub const fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

impl<R> UserService<R>
where
    R: UserRepository,
{
    fn email_in_use(email: &EmailAddress) -> Error {
        Error::conflict(format!("email \"{email}\" is already in use")).with_details(json!({
            "field": "email",
            "code": "email_in_use",
        }))
    }

    /// Fail when `email` belongs to a record other than `owner`.
    async fn ensure_email_available(
        &self,
        email: &EmailAddress,
        owner: Option<&UserId>,
    ) -> Result<(), Error> {
        match self.repository.find_by_email(email).await? {
            Some(existing) if Some(existing.id()) != owner => {
                debug!(user_id = %existing.id(), "email already held by another record");
                Err(Self::email_in_use(email))
            }
            _ => Ok(()),
        }
    }
}

#[async_trait]
impl<R> UsersCommand for UserService<R>
where
    R: UserRepository,
{
    async fn create(&self, user: NewUser) -> Result<User, Error> {
        self.ensure_email_available(&user.email, None).await?;
        let created = self.repository.create(&user).await?;
        info!(user_id = %created.id(), role = %created.role(), "user created");
        Ok(created)
    }

    async fn update(&self, id: &UserId, patch: UserPatch) -> Result<User, Error> {
        // Existence first so a missing record reports not_found, not conflict.
        self.repository.find_by_id(id).await?;
        if let Some(email) = patch.email.as_ref() {
            self.ensure_email_available(email, Some(id)).await?;
        }
        let updated = self.repository.update(id, &patch).await?;
        info!(user_id = %id, "user updated");
        Ok(updated)
    }

    async fn remove(&self, id: &UserId) -> Result<(), Error> {
        self.repository.remove(id).await?;
        info!(user_id = %id, "user removed");
        Ok(())
    }
}

#[async_trait]
impl<R> UsersQuery for UserService<R>
where
    R: UserRepository,
{
    async fn find_all(&self, request: &ListUsersRequest) -> Result<Page<User>, Error> {
        self.repository.list(request).await
    }

    async fn find_one(&self, id: &UserId) -> Result<User, Error> {
        self.repository.find_by_id(id).await
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
