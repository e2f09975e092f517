//! Domain ports for the hexagonal boundary.
//!
//! Driving ports (`UsersCommand`, `UsersQuery`) are consumed by inbound
//! adapters. Driven ports (`UserRepository`, `DocumentStore`) are implemented
//! by outbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod document_store;
mod user_repository;
mod users_command;
mod users_query;

#[cfg(test)]
pub use document_store::MockDocumentStore;
pub use document_store::{
    Document, DocumentQuery, DocumentStore, DocumentStoreError, FieldFilter, SortDirection,
    WriteFields, WriteValue,
};
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::UserRepository;
#[cfg(test)]
pub use users_command::MockUsersCommand;
pub use users_command::{NewUser, UserPatch, UsersCommand};
#[cfg(test)]
pub use users_query::MockUsersQuery;
pub use users_query::{ListUsersRequest, UsersQuery};
