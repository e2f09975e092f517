//! Opaque keyset cursor.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// Opaque token marking the last item of a returned page.
///
/// The token is carried verbatim; resolving it back to an ordering key is the
/// job of whichever adapter issued it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Cursor(String);

impl Cursor {
    /// Validate and wrap a raw cursor token.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::EmptyCursor`] for empty input and
    /// [`PaginationError::MalformedCursor`] when the token contains whitespace.
    ///
    /// # Examples
    /// ```
    /// use pagination::Cursor;
    ///
    /// let cursor = Cursor::new("Xb7mQ2").expect("valid token");
    /// assert_eq!(cursor.as_str(), "Xb7mQ2");
    /// assert!(Cursor::new("").is_err());
    /// ```
    pub fn new(token: impl Into<String>) -> Result<Self, PaginationError> {
        Self::from_owned(token.into())
    }

    fn from_owned(token: String) -> Result<Self, PaginationError> {
        if token.is_empty() {
            return Err(PaginationError::EmptyCursor);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(PaginationError::MalformedCursor);
        }
        Ok(Self(token))
    }

    /// Borrow the raw token.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for Cursor {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Cursor> for String {
    fn from(value: Cursor) -> Self {
        value.0
    }
}

impl TryFrom<String> for Cursor {
    type Error = PaginationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_owned(value)
    }
}
