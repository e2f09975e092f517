//! Port abstraction for schema-flexible document stores.
//!
//! Adapters expose single-document reads and writes addressed by collection
//! and document id, plus an ordered query with equality filters, a
//! resume-after cursor and a result limit. Timestamps requested through
//! [`WriteValue::ServerTimestamp`] are assigned by the store at write time and
//! read back as RFC 3339 strings.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::{Map, Value};

use super::define_port_error;

define_port_error! {
    /// Errors raised by document store adapters.
    pub enum DocumentStoreError {
        /// The store could not be reached or refused the request.
        Unavailable { message: String } => "document store unavailable: {message}",
        /// A query was rejected or failed during execution.
        Query { message: String } => "document store query failed: {message}",
        /// The addressed document does not exist.
        NotFound { collection: String, id: String } => "document {collection}/{id} does not exist",
        /// A document with the requested id already exists.
        AlreadyExists { collection: String, id: String } => "document {collection}/{id} already exists",
    }
}

/// A stored document: its id plus the decoded fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    /// Document identifier, unique within the collection.
    pub id: String,
    /// Field values as stored.
    pub fields: Map<String, Value>,
}

impl Document {
    /// Look up a field by name.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// Value supplied for a field in a write.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteValue {
    /// Store the JSON value verbatim.
    Value(Value),
    /// Let the store stamp its own current time.
    ServerTimestamp,
}

impl From<Value> for WriteValue {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

/// Field map accepted by writes.
pub type WriteFields = BTreeMap<String, WriteValue>;

/// Ordering direction for queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest first.
    Ascending,
    /// Largest first.
    Descending,
}

/// Equality predicate on a single field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFilter {
    /// Field name.
    pub field: String,
    /// Value the field must equal.
    pub value: Value,
}

/// Ordered query against a collection.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use user_records::domain::ports::{DocumentQuery, SortDirection};
///
/// let query = DocumentQuery::new()
///     .order_by("createdAt", SortDirection::Descending)
///     .filter_eq("role", json!("admin"))
///     .limit(11);
/// assert_eq!(query.limit, Some(11));
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    /// Field and direction to order by. `None` orders by document id.
    pub order_by: Option<(String, SortDirection)>,
    /// Equality filters; all must match.
    pub filters: Vec<FieldFilter>,
    /// Resume strictly after this document in the query order.
    pub start_after: Option<String>,
    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl DocumentQuery {
    /// Query returning the whole collection ordered by id.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the ordering field.
    #[must_use]
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some((field.into(), direction));
        self
    }

    /// Add an equality filter.
    #[must_use]
    pub fn filter_eq(mut self, field: impl Into<String>, value: Value) -> Self {
        self.filters.push(FieldFilter {
            field: field.into(),
            value,
        });
        self
    }

    /// Resume after the given document id.
    #[must_use]
    pub fn start_after(mut self, id: impl Into<String>) -> Self {
        self.start_after = Some(id.into());
        self
    }

    /// Cap the number of results.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }
}

/// Capability-limited document store client.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch a document, returning `None` when it does not exist.
    async fn get(&self, collection: &str, id: &str)
    -> Result<Option<Document>, DocumentStoreError>;

    /// Create a document, generating an id when none is supplied.
    ///
    /// Returns the id of the stored document.
    async fn put(
        &self,
        collection: &str,
        id: Option<String>,
        fields: WriteFields,
    ) -> Result<String, DocumentStoreError>;

    /// Merge fields into an existing document.
    async fn partial_update(
        &self,
        collection: &str,
        id: &str,
        fields: WriteFields,
    ) -> Result<(), DocumentStoreError>;

    /// Delete an existing document.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError>;

    /// Run an ordered query.
    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError>;
}
