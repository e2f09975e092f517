//! Tests for the document-backed user repository.

use std::sync::Arc;

use mockall::Sequence;
use pagination::PageLimit;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{Document, MockDocumentStore};
use crate::domain::{ErrorCode, UserName, UserRole};
use crate::outbound::document_store::InMemoryDocumentStore;

type MemoryRepository = DocumentUserRepository<InMemoryDocumentStore>;

#[fixture]
fn repository() -> MemoryRepository {
    DocumentUserRepository::new(Arc::new(InMemoryDocumentStore::default()), "users")
}

fn new_user(name: &str, email: &str, role: UserRole) -> NewUser {
    NewUser::new(
        UserName::new(name).expect("valid name"),
        EmailAddress::new(email).expect("valid email"),
    )
    .with_role(role)
}

async fn seed(repository: &MemoryRepository, count: usize) -> Vec<User> {
    let mut created = Vec::with_capacity(count);
    for n in 0..count {
        let role = if n % 2 == 0 { UserRole::User } else { UserRole::Admin };
        let user = repository
            .create(&new_user(&format!("User {n}"), &format!("u{n}@example.com"), role))
            .await
            .expect("seed user");
        created.push(user);
    }
    created
}

fn request(limit: u32, cursor: Option<&UserId>) -> ListUsersRequest {
    ListUsersRequest {
        limit: PageLimit::new(limit).expect("valid limit"),
        cursor: cursor.map(|id| Cursor::new(id.as_ref()).expect("valid cursor")),
        role: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_returns_stored_record(repository: MemoryRepository) {
    let created = repository
        .create(&new_user("Ada Lovelace", "ada@example.com", UserRole::Moderator))
        .await
        .expect("create succeeds");

    assert_eq!(created.name().as_ref(), "Ada Lovelace");
    assert_eq!(created.role(), UserRole::Moderator);
    assert!(created.is_active());
    assert_eq!(created.created_at(), created.updated_at());

    let found = repository
        .find_by_id(created.id())
        .await
        .expect("record exists");
    assert_eq!(found, created);
}

#[rstest]
#[tokio::test]
async fn find_by_id_reports_missing_records(repository: MemoryRepository) {
    let error = repository
        .find_by_id(&UserId::new("ghost").expect("valid id"))
        .await
        .expect_err("missing record");

    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "user with id \"ghost\" not found");
}

#[rstest]
#[tokio::test]
async fn find_by_email_is_exact(repository: MemoryRepository) {
    seed(&repository, 2).await;

    let hit = repository
        .find_by_email(&EmailAddress::new("u1@example.com").expect("valid email"))
        .await
        .expect("lookup succeeds");
    let miss = repository
        .find_by_email(&EmailAddress::new("U1@example.com").expect("valid email"))
        .await
        .expect("lookup succeeds");

    assert_eq!(hit.map(|user| user.name().to_string()), Some("User 1".to_owned()));
    assert!(miss.is_none());
}

#[rstest]
#[tokio::test]
async fn update_merges_fields_and_restamps(repository: MemoryRepository) {
    let created = seed(&repository, 1).await.remove(0);
    let patch = UserPatch {
        role: Some(UserRole::Admin),
        is_active: Some(false),
        ..UserPatch::default()
    };

    let updated = repository
        .update(created.id(), &patch)
        .await
        .expect("update succeeds");

    assert_eq!(updated.role(), UserRole::Admin);
    assert!(!updated.is_active());
    assert_eq!(updated.name(), created.name());
    assert_eq!(updated.created_at(), created.created_at());
    assert!(updated.updated_at() > created.updated_at());
}

#[rstest]
#[tokio::test]
async fn empty_patch_still_restamps(repository: MemoryRepository) {
    let created = seed(&repository, 1).await.remove(0);

    let updated = repository
        .update(created.id(), &UserPatch::default())
        .await
        .expect("update succeeds");

    assert!(updated.updated_at() > created.updated_at());
}

#[rstest]
#[tokio::test]
async fn mutations_of_missing_records_report_not_found(repository: MemoryRepository) {
    let ghost = UserId::new("ghost").expect("valid id");

    let update = repository
        .update(&ghost, &UserPatch::default())
        .await
        .expect_err("missing record");
    let remove = repository.remove(&ghost).await.expect_err("missing record");

    assert_eq!(update.code(), ErrorCode::NotFound);
    assert_eq!(remove.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn remove_deletes_permanently(repository: MemoryRepository) {
    let created = seed(&repository, 1).await.remove(0);

    repository.remove(created.id()).await.expect("remove succeeds");

    let error = repository
        .find_by_id(created.id())
        .await
        .expect_err("record is gone");
    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn list_returns_newest_first_with_lookahead(repository: MemoryRepository) {
    let created = seed(&repository, 5).await;

    let page = repository.list(&request(2, None)).await.expect("list");

    let ids: Vec<_> = page.items().iter().map(User::id).collect();
    assert_eq!(ids, [created[4].id(), created[3].id()]);
    assert!(page.has_next_page());
    assert_eq!(
        page.next_cursor().map(Cursor::as_str),
        Some(created[3].id().as_ref())
    );
}

#[rstest]
#[tokio::test]
async fn following_cursors_walks_every_record_once(repository: MemoryRepository) {
    let created = seed(&repository, 5).await;
    let mut seen = Vec::new();
    let mut cursor: Option<UserId> = None;

    loop {
        let page = repository
            .list(&request(2, cursor.as_ref()))
            .await
            .expect("list");
        seen.extend(page.items().iter().map(|user| user.id().clone()));
        match page.next_cursor() {
            Some(next) => cursor = Some(UserId::new(next.as_str()).expect("cursor is an id")),
            None => break,
        }
    }

    let expected: Vec<_> = created.iter().rev().map(|user| user.id().clone()).collect();
    assert_eq!(seen, expected);
}

#[rstest]
#[tokio::test]
async fn exact_fit_has_no_next_page(repository: MemoryRepository) {
    seed(&repository, 3).await;

    let page = repository.list(&request(3, None)).await.expect("list");

    assert_eq!(page.items().len(), 3);
    assert!(!page.has_next_page());
    assert!(page.next_cursor().is_none());
}

#[rstest]
#[tokio::test]
async fn list_filters_by_role(repository: MemoryRepository) {
    seed(&repository, 5).await;
    let filtered = ListUsersRequest {
        role: Some(UserRole::Admin),
        ..request(10, None)
    };

    let page = repository.list(&filtered).await.expect("list");

    assert_eq!(page.items().len(), 2);
    assert!(page.items().iter().all(|user| user.role() == UserRole::Admin));
}

#[rstest]
#[tokio::test]
async fn unknown_cursor_is_invalid_argument(repository: MemoryRepository) {
    seed(&repository, 2).await;
    let ghost = UserId::new("ghost").expect("valid id");

    let error = repository
        .list(&request(2, Some(&ghost)))
        .await
        .expect_err("cursor does not exist");

    assert_eq!(error.code(), ErrorCode::InvalidArgument);
    assert_eq!(
        error.message(),
        "cursor \"ghost\" does not reference an existing record"
    );
}

#[tokio::test]
async fn store_failures_surface_as_internal_without_detail() {
    let mut store = MockDocumentStore::new();
    store
        .expect_get()
        .times(1)
        .return_once(|_, _| Err(DocumentStoreError::unavailable("10.0.0.7 refused connection")));
    let repository = DocumentUserRepository::new(Arc::new(store), "users");

    let error = repository
        .find_by_id(&UserId::new("u1").expect("valid id"))
        .await
        .expect_err("store failure");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert!(!error.message().contains("10.0.0.7"));
}

#[tokio::test]
async fn undecodable_documents_surface_as_internal() {
    let mut store = MockDocumentStore::new();
    store.expect_get().times(1).return_once(|_, id| {
        Ok(Some(Document {
            id: id.to_owned(),
            fields: serde_json::Map::new(),
        }))
    });
    let repository = DocumentUserRepository::new(Arc::new(store), "users");

    let error = repository
        .find_by_id(&UserId::new("u1").expect("valid id"))
        .await
        .expect_err("document lacks fields");

    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[tokio::test]
async fn delete_race_reports_not_found() {
    let mut store = MockDocumentStore::new();
    store.expect_get().times(1).return_once(|_, id| {
        Ok(Some(Document {
            id: id.to_owned(),
            fields: serde_json::Map::new(),
        }))
    });
    store
        .expect_delete()
        .times(1)
        .return_once(|collection, id| Err(DocumentStoreError::not_found(collection, id)));
    let repository = DocumentUserRepository::new(Arc::new(store), "users");

    let error = repository
        .remove(&UserId::new("u1").expect("valid id"))
        .await
        .expect_err("document vanished");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

fn cursor_document(_collection: &str, id: &str) -> Result<Option<Document>, DocumentStoreError> {
    Ok(Some(Document {
        id: id.to_owned(),
        fields: serde_json::Map::new(),
    }))
}

#[rstest]
#[case(false, ErrorCode::InvalidArgument)]
#[case(true, ErrorCode::InternalError)]
#[tokio::test]
async fn cursor_removed_mid_listing(#[case] still_exists: bool, #[case] expected: ErrorCode) {
    let mut store = MockDocumentStore::new();
    let mut sequence = Sequence::new();
    store
        .expect_get()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(cursor_document);
    store
        .expect_query()
        .times(1)
        .in_sequence(&mut sequence)
        .return_once(|_, _| Err(DocumentStoreError::query("start_after document is gone")));
    store
        .expect_get()
        .times(1)
        .in_sequence(&mut sequence)
        .returning(move |collection, id| {
            if still_exists {
                cursor_document(collection, id)
            } else {
                Ok(None)
            }
        });
    let repository = DocumentUserRepository::new(Arc::new(store), "users");
    let cursor = UserId::new("u7").expect("valid id");

    let error = repository
        .list(&request(2, Some(&cursor)))
        .await
        .expect_err("query rejected");

    assert_eq!(error.code(), expected);
}
