//! User persistence over a document store.
//!
//! Adapters here are thin translators between stored documents and domain
//! records, plus the pagination and failure-normalisation rules that every
//! store shares.

mod document_user_repository;
mod failure_boundary;
mod user_document;

pub use document_user_repository::DocumentUserRepository;
