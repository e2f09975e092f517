//! Outbound adapters implementing domain ports.
//!
//! - **document_store**: document store clients.
//! - **users**: the user repository built on top of a document store.
//!
//! Adapters translate between domain types and storage representations and
//! hold no business rules.

pub mod document_store;
pub mod users;
