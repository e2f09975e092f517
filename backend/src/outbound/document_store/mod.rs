//! Document store adapters.
//!
//! Only the in-process store ships today; it backs the server binary and the
//! integration tests. A networked adapter plugs in by implementing
//! [`DocumentStore`](crate::domain::ports::DocumentStore).

mod memory;

pub use memory::InMemoryDocumentStore;
