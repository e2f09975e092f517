//! Lookahead page model.

use crate::{Cursor, PageLimit};

/// One page of items produced by a keyset query.
///
/// ## Invariants
/// - `items.len() <= limit`.
/// - A next cursor is present exactly when a further page exists, and it names
///   the last item of this page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    limit: PageLimit,
    next_cursor: Option<Cursor>,
}

impl<T> Page<T> {
    /// Build a page from a result set fetched with [`PageLimit::lookahead`].
    ///
    /// When `fetched` holds more than `limit` items the surplus is dropped and
    /// `cursor_of` is applied to the last kept item to produce the next cursor.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `cursor_of`.
    ///
    /// # Examples
    /// ```
    /// use pagination::{Cursor, Page, PageLimit, PaginationError};
    ///
    /// let limit = PageLimit::new(2)?;
    /// let page = Page::from_lookahead(vec!["a", "b", "c"], limit, |item| Cursor::new(*item))?;
    /// assert_eq!(page.items(), ["a", "b"]);
    /// assert_eq!(page.next_cursor().map(Cursor::as_str), Some("b"));
    /// # Ok::<(), PaginationError>(())
    /// ```
    pub fn from_lookahead<E, F>(
        mut fetched: Vec<T>,
        limit: PageLimit,
        cursor_of: F,
    ) -> Result<Self, E>
    where
        F: FnOnce(&T) -> Result<Cursor, E>,
    {
        if fetched.len() <= limit.as_usize() {
            return Ok(Self::new(fetched, limit, None));
        }

        fetched.truncate(limit.as_usize());
        let next_cursor = fetched.last().map(cursor_of).transpose()?;
        Ok(Self::new(fetched, limit, next_cursor))
    }

    /// Assemble a page from parts that already satisfy the invariants.
    #[must_use]
    pub const fn new(items: Vec<T>, limit: PageLimit, next_cursor: Option<Cursor>) -> Self {
        Self {
            items,
            limit,
            next_cursor,
        }
    }

    /// Items on this page, in query order.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.items.as_slice()
    }

    /// Consume the page and return its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Page size that produced this page.
    #[must_use]
    pub const fn limit(&self) -> PageLimit {
        self.limit
    }

    /// Cursor to pass back to fetch the following page.
    #[must_use]
    pub const fn next_cursor(&self) -> Option<&Cursor> {
        self.next_cursor.as_ref()
    }

    /// Whether a further page exists.
    #[must_use]
    pub const fn has_next_page(&self) -> bool {
        self.next_cursor.is_some()
    }

    /// Transform every item while keeping the pagination metadata.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            limit: self.limit,
            next_cursor: self.next_cursor,
        }
    }
}
