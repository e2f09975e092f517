//! Failure normalisation applied around every repository operation.
//!
//! Inside the boundary, operations fail with a [`RepositoryFailure`]. On the
//! way out, `not_found` and `invalid_argument` domain errors pass through
//! verbatim; everything else is logged with the operation name and replaced
//! by a bare `internal_error` so that no store detail reaches callers.

use std::future::Future;

use pagination::PaginationError;
use thiserror::Error;
use tracing::error;

use crate::domain::ports::DocumentStoreError;
use crate::domain::{Error, ErrorCode};

use super::user_document::UserDocumentError;

/// Any failure an operation can raise inside the boundary.
#[derive(Debug, Error)]
pub(crate) enum RepositoryFailure {
    #[error(transparent)]
    Domain(#[from] Error),
    #[error(transparent)]
    Store(#[from] DocumentStoreError),
    #[error(transparent)]
    Decode(#[from] UserDocumentError),
    #[error(transparent)]
    Pagination(#[from] PaginationError),
}

fn passes_through(error: &Error) -> bool {
    matches!(error.code(), ErrorCode::NotFound | ErrorCode::InvalidArgument)
}

/// Run `work` and normalise its failure for callers.
pub(super) async fn guarded<T, Fut>(operation: &'static str, work: Fut) -> Result<T, Error>
where
    Fut: Future<Output = Result<T, RepositoryFailure>>,
{
    match work.await {
        Ok(value) => Ok(value),
        Err(RepositoryFailure::Domain(err)) if passes_through(&err) => Err(err),
        Err(failure) => {
            error!(operation, error = %failure, "user repository operation failed");
            Err(Error::internal(format!("user repository {operation} failed")))
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    async fn fail_with(failure: RepositoryFailure) -> Error {
        guarded::<(), _>("probe", async move { Err(failure) })
            .await
            .expect_err("failure propagates")
    }

    #[rstest]
    #[case(Error::not_found("user with id \"x\" not found"))]
    #[case(Error::invalid_argument("cursor \"x\" does not reference an existing record"))]
    #[tokio::test]
    async fn caller_errors_pass_through_verbatim(#[case] original: Error) {
        let surfaced = fail_with(RepositoryFailure::Domain(original.clone())).await;
        assert_eq!(surfaced, original);
    }

    #[rstest]
    #[case(RepositoryFailure::Store(DocumentStoreError::unavailable("connection reset")))]
    #[case(RepositoryFailure::Store(DocumentStoreError::not_found("users", "x")))]
    #[case(RepositoryFailure::Decode(UserDocumentError::MissingField {
        id: "x".to_owned(),
        field: "email",
    }))]
    #[case(RepositoryFailure::Pagination(PaginationError::EmptyCursor))]
    #[case(RepositoryFailure::Domain(Error::conflict("unexpected")))]
    #[tokio::test]
    async fn other_failures_collapse_to_internal(#[case] failure: RepositoryFailure) {
        let surfaced = fail_with(failure).await;
        assert_eq!(surfaced.code(), ErrorCode::InternalError);
        assert_eq!(surfaced.message(), "user repository probe failed");
        assert!(surfaced.details().is_none());
    }

    #[tokio::test]
    async fn success_is_returned_unchanged() {
        let value = guarded("probe", async { Ok::<_, RepositoryFailure>(7) }).await;
        assert_eq!(value, Ok(7));
    }
}
