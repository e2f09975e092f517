//! User records backend.
//!
//! A CRUD service over user records held in a document store, with keyset
//! pagination and email uniqueness enforced in the domain service.

pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

pub use middleware::Trace;
