//! User repository backed by a [`DocumentStore`].
//!
//! Listing uses keyset pagination: documents are ordered by `createdAt`
//! descending, the cursor names the last record of the previous page, and one
//! extra document is fetched to learn whether another page follows.
//!
//! A cursor is resolved before the query runs. If its record disappears in
//! between, the store rejects the query and the caller still sees the
//! cursor as unknown.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::{Cursor, Page};
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{
    DocumentQuery, DocumentStore, DocumentStoreError, ListUsersRequest, NewUser, SortDirection,
    UserPatch, UserRepository,
};
use crate::domain::{EmailAddress, Error, User, UserId};

use super::failure_boundary::{RepositoryFailure, guarded};
use super::user_document::{
    CREATED_AT, EMAIL, ROLE, new_user_fields, patch_fields, user_from_document,
};

fn user_not_found(id: &UserId) -> Error {
    Error::not_found(format!("user with id \"{id}\" not found"))
}

fn unknown_cursor(cursor: &Cursor) -> Error {
    Error::invalid_argument(format!(
        "cursor \"{cursor}\" does not reference an existing record"
    ))
}

/// Translate a store miss during a write into the domain's `not_found`.
fn missing_as_not_found(id: &UserId) -> impl FnOnce(DocumentStoreError) -> RepositoryFailure + '_ {
    move |error| match error {
        DocumentStoreError::NotFound { .. } => user_not_found(id).into(),
        other => other.into(),
    }
}

/// Document-backed implementation of [`UserRepository`].
///
/// # Examples
/// ```
/// use std::sync::Arc;
///
/// use user_records::outbound::document_store::InMemoryDocumentStore;
/// use user_records::outbound::users::DocumentUserRepository;
///
/// let store = Arc::new(InMemoryDocumentStore::default());
/// let repository = DocumentUserRepository::new(store, "users");
/// assert_eq!(repository.collection(), "users");
/// ```
pub struct DocumentUserRepository<S> {
    store: Arc<S>,
    collection: String,
}

impl<S> DocumentUserRepository<S> {
    /// Create a repository over `collection` in `store`.
    pub fn new(store: Arc<S>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }

    /// Name of the backing collection.
    pub fn collection(&self) -> &str {
        self.collection.as_str()
    }
}

impl<S> DocumentUserRepository<S>
where
    S: DocumentStore,
{
    async fn load(&self, id: &UserId) -> Result<User, RepositoryFailure> {
        let document = self
            .store
            .get(&self.collection, id.as_ref())
            .await?
            .ok_or_else(|| user_not_found(id))?;
        Ok(user_from_document(&document)?)
    }

    async fn ensure_exists(&self, id: &UserId) -> Result<(), RepositoryFailure> {
        match self.store.get(&self.collection, id.as_ref()).await? {
            Some(_) => Ok(()),
            None => Err(user_not_found(id).into()),
        }
    }

    async fn cursor_exists(&self, cursor: &Cursor) -> Result<bool, DocumentStoreError> {
        Ok(self
            .store
            .get(&self.collection, cursor.as_str())
            .await?
            .is_some())
    }

    async fn query_failure(
        &self,
        error: DocumentStoreError,
        cursor: Option<&Cursor>,
    ) -> RepositoryFailure {
        match (cursor, &error) {
            (Some(cursor), DocumentStoreError::Query { .. }) => {
                match self.cursor_exists(cursor).await {
                    Ok(false) => unknown_cursor(cursor).into(),
                    _ => error.into(),
                }
            }
            _ => error.into(),
        }
    }

    async fn page(&self, request: &ListUsersRequest) -> Result<Page<User>, RepositoryFailure> {
        let mut query = DocumentQuery::new()
            .order_by(CREATED_AT, SortDirection::Descending)
            .limit(request.limit.lookahead());
        if let Some(role) = request.role {
            query = query.filter_eq(ROLE, Value::String(role.as_str().to_owned()));
        }
        if let Some(cursor) = &request.cursor {
            // Resolve up front so an unknown cursor is the caller's mistake,
            // not a store failure.
            if !self.cursor_exists(cursor).await? {
                return Err(unknown_cursor(cursor).into());
            }
            query = query.start_after(cursor.as_str());
        }

        let documents = match self.store.query(&self.collection, &query).await {
            Ok(documents) => documents,
            Err(error) => return Err(self.query_failure(error, request.cursor.as_ref()).await),
        };
        let users = documents
            .iter()
            .map(user_from_document)
            .collect::<Result<Vec<_>, _>>()?;
        debug!(
            fetched = users.len(),
            limit = request.limit.get(),
            "user page fetched"
        );
        Ok(Page::from_lookahead(users, request.limit, |user| {
            Cursor::new(user.id().as_ref())
        })?)
    }
}

#[async_trait]
impl<S> UserRepository for DocumentUserRepository<S>
where
    S: DocumentStore,
{
    async fn create(&self, user: &NewUser) -> Result<User, Error> {
        guarded("create", async {
            let id = self
                .store
                .put(&self.collection, None, new_user_fields(user))
                .await?;
            let id = UserId::new(id).map_err(|err| {
                Error::internal(format!("store assigned an unusable id: {err}"))
            })?;
            self.load(&id).await
        })
        .await
    }

    async fn find_by_id(&self, id: &UserId) -> Result<User, Error> {
        guarded("find_by_id", self.load(id)).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, Error> {
        guarded("find_by_email", async {
            let query = DocumentQuery::new()
                .filter_eq(EMAIL, Value::String(email.as_ref().to_owned()))
                .limit(1);
            let documents = self.store.query(&self.collection, &query).await?;
            let user = documents.first().map(user_from_document).transpose()?;
            Ok::<_, RepositoryFailure>(user)
        })
        .await
    }

    async fn update(&self, id: &UserId, patch: &UserPatch) -> Result<User, Error> {
        guarded("update", async {
            self.ensure_exists(id).await?;
            self.store
                .partial_update(&self.collection, id.as_ref(), patch_fields(patch))
                .await
                .map_err(missing_as_not_found(id))?;
            self.load(id).await
        })
        .await
    }

    async fn remove(&self, id: &UserId) -> Result<(), Error> {
        guarded("remove", async {
            self.ensure_exists(id).await?;
            self.store
                .delete(&self.collection, id.as_ref())
                .await
                .map_err(missing_as_not_found(id))
        })
        .await
    }

    async fn list(&self, request: &ListUsersRequest) -> Result<Page<User>, Error> {
        guarded("list", self.page(request)).await
    }
}

#[cfg(test)]
#[path = "document_user_repository_tests.rs"]
mod tests;
