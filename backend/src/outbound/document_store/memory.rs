//! In-process document store keeping collections in memory.
//!
//! Documents are ordered by the requested field and then by id in the same
//! direction, so equal timestamps still give every document a unique position
//! and cursors stay stable. Server timestamps are strictly increasing per
//! store instance.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Duration, SecondsFormat, Utc};
use mockable::{Clock, DefaultClock};
use serde_json::{Map, Value};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{
    Document, DocumentQuery, DocumentStore, DocumentStoreError, SortDirection, WriteFields,
    WriteValue,
};

type Fields = Map<String, Value>;

#[derive(Default)]
struct StoreState {
    collections: HashMap<String, BTreeMap<String, Fields>>,
    last_timestamp: Option<DateTime<Utc>>,
}

impl StoreState {
    fn next_timestamp(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last_timestamp {
            Some(last) if now <= last => last + Duration::nanoseconds(1),
            _ => now,
        };
        self.last_timestamp = Some(stamp);
        stamp
    }

    fn materialise(&mut self, now: DateTime<Utc>, fields: WriteFields) -> Fields {
        let mut stamp = None;
        fields
            .into_iter()
            .map(|(name, value)| {
                let value = match value {
                    WriteValue::Value(value) => value,
                    WriteValue::ServerTimestamp => {
                        // One write gets one timestamp across all its fields.
                        let at = *stamp.get_or_insert_with(|| self.next_timestamp(now));
                        Value::String(at.to_rfc3339_opts(SecondsFormat::Nanos, true))
                    }
                };
                (name, value)
            })
            .collect()
    }
}

/// Document store held entirely in process memory.
pub struct InMemoryDocumentStore {
    clock: Arc<dyn Clock>,
    state: Mutex<StoreState>,
}

impl InMemoryDocumentStore {
    /// Create an empty store stamping writes with `clock`.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use mockable::DefaultClock;
    /// use user_records::outbound::document_store::InMemoryDocumentStore;
    ///
    /// let store = InMemoryDocumentStore::new(Arc::new(DefaultClock));
    /// # let _ = store;
    /// ```
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            state: Mutex::new(StoreState::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, StoreState>, DocumentStoreError> {
        self.state
            .lock()
            .map_err(|_| DocumentStoreError::unavailable("in-memory store lock poisoned"))
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new(Arc::new(DefaultClock))
    }
}

impl std::fmt::Debug for InMemoryDocumentStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryDocumentStore").finish_non_exhaustive()
    }
}

fn type_rank(value: &Value) -> u8 {
    match value {
        Value::Null => 0,
        Value::Bool(_) => 1,
        Value::Number(_) => 2,
        Value::String(_) => 3,
        Value::Array(_) => 4,
        Value::Object(_) => 5,
    }
}

fn compare_values(left: &Value, right: &Value) -> Ordering {
    match (left, right) {
        (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l.total_cmp(&r),
            _ => Ordering::Equal,
        },
        (Value::String(l), Value::String(r)) => l.cmp(r),
        _ => type_rank(left).cmp(&type_rank(right)),
    }
}

/// Position of a document in the query order.
struct SortKey<'a> {
    value: Option<&'a Value>,
    id: &'a str,
}

impl SortKey<'_> {
    fn compare(&self, other: &Self, direction: SortDirection) -> Ordering {
        let by_value = match (self.value, other.value) {
            (Some(l), Some(r)) => compare_values(l, r),
            _ => Ordering::Equal,
        };
        let ascending = by_value.then_with(|| self.id.cmp(other.id));
        match direction {
            SortDirection::Ascending => ascending,
            SortDirection::Descending => ascending.reverse(),
        }
    }
}

fn sort_key<'a>(query: &DocumentQuery, id: &'a str, fields: &'a Fields) -> SortKey<'a> {
    SortKey {
        value: query
            .order_by
            .as_ref()
            .and_then(|(field, _)| fields.get(field)),
        id,
    }
}

fn matches(query: &DocumentQuery, fields: &Fields) -> bool {
    let ordered = query
        .order_by
        .as_ref()
        .is_none_or(|(field, _)| fields.contains_key(field));
    ordered
        && query
            .filters
            .iter()
            .all(|filter| fields.get(&filter.field) == Some(&filter.value))
}

fn run_query(
    collection: &str,
    documents: Option<&BTreeMap<String, Fields>>,
    query: &DocumentQuery,
) -> Result<Vec<Document>, DocumentStoreError> {
    let empty = BTreeMap::new();
    let documents = documents.unwrap_or(&empty);
    let direction = query
        .order_by
        .as_ref()
        .map_or(SortDirection::Ascending, |(_, direction)| *direction);

    let cursor = match query.start_after.as_deref() {
        Some(id) => {
            let (id, fields) = documents.get_key_value(id).ok_or_else(|| {
                DocumentStoreError::query(format!(
                    "start_after document {collection}/{id} does not exist"
                ))
            })?;
            Some(sort_key(query, id, fields))
        }
        None => None,
    };

    let mut selected: Vec<(SortKey<'_>, &Fields)> = documents
        .iter()
        .filter(|(_, fields)| matches(query, fields))
        .map(|(id, fields)| (sort_key(query, id, fields), fields))
        .filter(|(key, _)| {
            cursor
                .as_ref()
                .is_none_or(|after| key.compare(after, direction) == Ordering::Greater)
        })
        .collect();
    selected.sort_by(|(left, _), (right, _)| left.compare(right, direction));

    let limit = query.limit.unwrap_or(usize::MAX);
    Ok(selected
        .into_iter()
        .take(limit)
        .map(|(key, fields)| Document {
            id: key.id.to_owned(),
            fields: fields.clone(),
        })
        .collect())
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: &str,
        id: &str,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let state = self.lock()?;
        Ok(state
            .collections
            .get(collection)
            .and_then(|documents| documents.get(id))
            .map(|fields| Document {
                id: id.to_owned(),
                fields: fields.clone(),
            }))
    }

    async fn put(
        &self,
        collection: &str,
        id: Option<String>,
        fields: WriteFields,
    ) -> Result<String, DocumentStoreError> {
        let id = id.unwrap_or_else(|| Uuid::new_v4().simple().to_string());
        if id.is_empty() {
            return Err(DocumentStoreError::query("document id must not be empty"));
        }
        let now = self.clock.utc();
        let mut state = self.lock()?;
        if state
            .collections
            .get(collection)
            .is_some_and(|documents| documents.contains_key(&id))
        {
            return Err(DocumentStoreError::already_exists(collection, id));
        }
        let stored = state.materialise(now, fields);
        state
            .collections
            .entry(collection.to_owned())
            .or_default()
            .insert(id.clone(), stored);
        debug!(collection, document_id = %id, "document stored");
        Ok(id)
    }

    async fn partial_update(
        &self,
        collection: &str,
        id: &str,
        fields: WriteFields,
    ) -> Result<(), DocumentStoreError> {
        let now = self.clock.utc();
        let mut state = self.lock()?;
        let exists = state
            .collections
            .get(collection)
            .is_some_and(|documents| documents.contains_key(id));
        if !exists {
            return Err(DocumentStoreError::not_found(collection, id));
        }
        let changes = state.materialise(now, fields);
        if let Some(document) = state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
        {
            document.extend(changes);
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), DocumentStoreError> {
        let mut state = self.lock()?;
        state
            .collections
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .map(|_| ())
            .ok_or_else(|| DocumentStoreError::not_found(collection, id))
    }

    async fn query(
        &self,
        collection: &str,
        query: &DocumentQuery,
    ) -> Result<Vec<Document>, DocumentStoreError> {
        let state = self.lock()?;
        run_query(collection, state.collections.get(collection), query)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Local, TimeZone};
    use rstest::{fixture, rstest};
    use serde_json::json;

    use super::*;

    struct FrozenClock(DateTime<Utc>);

    impl Clock for FrozenClock {
        fn local(&self) -> DateTime<Local> {
            self.0.with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[fixture]
    fn store() -> InMemoryDocumentStore {
        let frozen = Utc
            .with_ymd_and_hms(2024, 5, 1, 12, 0, 0)
            .single()
            .expect("fixed timestamp is valid");
        InMemoryDocumentStore::new(Arc::new(FrozenClock(frozen)))
    }

    fn fields(pairs: &[(&str, WriteValue)]) -> WriteFields {
        pairs
            .iter()
            .map(|(name, value)| ((*name).to_owned(), value.clone()))
            .collect()
    }

    async fn seed(store: &InMemoryDocumentStore, id: &str, rank: i64, role: &str) {
        store
            .put(
                "items",
                Some(id.to_owned()),
                fields(&[
                    ("rank", WriteValue::Value(json!(rank))),
                    ("role", WriteValue::Value(json!(role))),
                ]),
            )
            .await
            .expect("seed document");
    }

    async fn created_at(store: &InMemoryDocumentStore, id: &str) -> Value {
        store
            .get("items", id)
            .await
            .expect("get")
            .and_then(|doc| doc.field("createdAt").cloned())
            .expect("timestamp present")
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents.iter().map(|doc| doc.id.as_str()).collect()
    }

    #[rstest]
    #[tokio::test]
    async fn server_timestamps_strictly_increase_under_a_frozen_clock(
        store: InMemoryDocumentStore,
    ) {
        let write = || fields(&[("createdAt", WriteValue::ServerTimestamp)]);
        let first = store.put("items", None, write()).await.expect("put");
        let second = store.put("items", None, write()).await.expect("put");

        let first_stamp = created_at(&store, &first).await;
        let second_stamp = created_at(&store, &second).await;

        assert_eq!(first_stamp, json!("2024-05-01T12:00:00.000000000Z"));
        assert_eq!(second_stamp, json!("2024-05-01T12:00:00.000000001Z"));
    }

    #[rstest]
    #[tokio::test]
    async fn one_write_shares_a_single_timestamp(store: InMemoryDocumentStore) {
        let id = store
            .put(
                "items",
                None,
                fields(&[
                    ("createdAt", WriteValue::ServerTimestamp),
                    ("updatedAt", WriteValue::ServerTimestamp),
                ]),
            )
            .await
            .expect("put");
        let doc = store.get("items", &id).await.expect("get").expect("exists");
        assert_eq!(doc.field("createdAt"), doc.field("updatedAt"));
    }

    #[rstest]
    #[tokio::test]
    async fn put_rejects_existing_ids(store: InMemoryDocumentStore) {
        seed(&store, "a", 1, "user").await;
        let result = store.put("items", Some("a".to_owned()), WriteFields::new()).await;
        assert_eq!(result, Err(DocumentStoreError::already_exists("items", "a")));
    }

    #[rstest]
    #[tokio::test]
    async fn writes_to_missing_documents_fail(store: InMemoryDocumentStore) {
        assert_eq!(
            store.partial_update("items", "nope", WriteFields::new()).await,
            Err(DocumentStoreError::not_found("items", "nope"))
        );
        assert_eq!(
            store.delete("items", "nope").await,
            Err(DocumentStoreError::not_found("items", "nope"))
        );
    }

    #[rstest]
    #[tokio::test]
    async fn partial_update_merges_fields(store: InMemoryDocumentStore) {
        seed(&store, "a", 1, "user").await;
        store
            .partial_update("items", "a", fields(&[("role", WriteValue::Value(json!("admin")))]))
            .await
            .expect("update");
        let doc = store.get("items", "a").await.expect("get").expect("exists");
        assert_eq!(doc.field("role"), Some(&json!("admin")));
        assert_eq!(doc.field("rank"), Some(&json!(1)));
    }

    #[rstest]
    #[tokio::test]
    async fn query_orders_with_id_tiebreak(store: InMemoryDocumentStore) {
        seed(&store, "b", 2, "user").await;
        seed(&store, "a", 2, "user").await;
        seed(&store, "c", 1, "user").await;
        seed(&store, "d", 3, "user").await;

        let query = DocumentQuery::new().order_by("rank", SortDirection::Descending);
        let docs = store.query("items", &query).await.expect("query");

        assert_eq!(ids(&docs), ["d", "b", "a", "c"]);
    }

    #[rstest]
    #[case(SortDirection::Descending, ["f", "e", "d", "c", "b", "a", "g"])]
    #[case(SortDirection::Ascending, ["g", "a", "b", "c", "d", "e", "f"])]
    #[tokio::test]
    async fn paging_across_tied_values_visits_each_document_once(
        store: InMemoryDocumentStore,
        #[case] direction: SortDirection,
        #[case] expected: [&str; 7],
    ) {
        for id in ["e", "b", "d", "a", "c"] {
            seed(&store, id, 5, "user").await;
        }
        seed(&store, "f", 9, "user").await;
        seed(&store, "g", 1, "user").await;

        let mut walked: Vec<String> = Vec::new();
        loop {
            let mut query = DocumentQuery::new().order_by("rank", direction).limit(1);
            if let Some(last) = walked.last() {
                query = query.start_after(last.as_str());
            }
            let docs = store.query("items", &query).await.expect("query");
            match docs.first() {
                Some(doc) => walked.push(doc.id.clone()),
                None => break,
            }
        }

        assert_eq!(walked, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn query_resumes_after_cursor_with_filter_and_limit(store: InMemoryDocumentStore) {
        seed(&store, "a", 4, "admin").await;
        seed(&store, "b", 3, "user").await;
        seed(&store, "c", 2, "admin").await;
        seed(&store, "d", 1, "admin").await;

        let query = DocumentQuery::new()
            .order_by("rank", SortDirection::Descending)
            .filter_eq("role", json!("admin"))
            .start_after("b")
            .limit(1);
        let docs = store.query("items", &query).await.expect("query");

        assert_eq!(ids(&docs), ["c"]);
    }

    #[rstest]
    #[tokio::test]
    async fn query_excludes_documents_missing_the_order_field(store: InMemoryDocumentStore) {
        seed(&store, "a", 1, "user").await;
        store
            .put("items", Some("bare".to_owned()), WriteFields::new())
            .await
            .expect("put");

        let query = DocumentQuery::new().order_by("rank", SortDirection::Ascending);
        let docs = store.query("items", &query).await.expect("query");

        assert_eq!(ids(&docs), ["a"]);
    }

    #[rstest]
    #[tokio::test]
    async fn query_rejects_unknown_cursor(store: InMemoryDocumentStore) {
        let query = DocumentQuery::new().start_after("ghost");
        let result = store.query("items", &query).await;
        assert!(matches!(result, Err(DocumentStoreError::Query { .. })));
    }

    #[rstest]
    #[tokio::test]
    async fn collections_are_isolated(store: InMemoryDocumentStore) {
        seed(&store, "a", 1, "user").await;
        assert!(store.get("other", "a").await.expect("get").is_none());
        let docs = store
            .query("other", &DocumentQuery::new())
            .await
            .expect("query");
        assert!(docs.is_empty());
    }
}
