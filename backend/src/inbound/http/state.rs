//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and depend only on domain ports, so
//! they stay testable without a store.

use std::sync::Arc;

use mockable::Clock;

use crate::domain::ports::{UsersCommand, UsersQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User mutations.
    pub users_command: Arc<dyn UsersCommand>,
    /// User reads.
    pub users_query: Arc<dyn UsersQuery>,
    /// Source of envelope timestamps.
    pub clock: Arc<dyn Clock>,
}

impl HttpState {
    /// Bundle the ports used by the users endpoints.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_records::domain::UserService;
    /// use user_records::inbound::http::state::HttpState;
    /// use user_records::outbound::document_store::InMemoryDocumentStore;
    /// use user_records::outbound::users::DocumentUserRepository;
    ///
    /// let store = Arc::new(InMemoryDocumentStore::default());
    /// let repository = DocumentUserRepository::new(store, "users");
    /// let service = Arc::new(UserService::new(Arc::new(repository)));
    /// let state = HttpState::new(service.clone(), service, Arc::new(DefaultClock));
    /// # let _ = state;
    /// ```
    pub fn new(
        users_command: Arc<dyn UsersCommand>,
        users_query: Arc<dyn UsersQuery>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            users_command,
            users_query,
            clock,
        }
    }
}
