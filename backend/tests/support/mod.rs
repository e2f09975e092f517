//! Shared helpers for the user records integration tests.
//!
//! Integration tests compile as separate crates, so each pulls this module in
//! with `mod support;` and may leave some helpers unused.

#![allow(dead_code, reason = "each test crate uses a different subset")]

use std::sync::Arc;

use user_records::domain::ports::NewUser;
use user_records::domain::{EmailAddress, UserName, UserRole, UserService};
use user_records::outbound::document_store::InMemoryDocumentStore;
use user_records::outbound::users::DocumentUserRepository;

pub type Repository = DocumentUserRepository<InMemoryDocumentStore>;
pub type Service = UserService<Repository>;

/// A service over an empty in-memory store.
pub fn service() -> Arc<Service> {
    let store = Arc::new(InMemoryDocumentStore::default());
    Arc::new(UserService::new(Arc::new(DocumentUserRepository::new(
        store, "users",
    ))))
}

pub fn new_user(name: &str, email: &str) -> NewUser {
    NewUser::new(
        UserName::new(name).expect("valid name"),
        EmailAddress::new(email).expect("valid email"),
    )
}

pub fn numbered_user(n: usize) -> NewUser {
    let role = if n % 3 == 0 { UserRole::Moderator } else { UserRole::User };
    new_user(&format!("User {n}"), &format!("user{n}@example.com")).with_role(role)
}
