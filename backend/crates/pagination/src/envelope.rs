//! Serialisable `{ data, meta }` pagination envelope.

use serde::{Deserialize, Serialize};

use crate::{Cursor, Page};

/// Metadata describing where a page sits in the full result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    /// Page size that produced the page.
    pub limit: u16,
    /// Whether a further page exists.
    pub has_next_page: bool,
    /// Cursor for the next page; serialised as `null` on the last page.
    pub next_cursor: Option<Cursor>,
}

/// Wire envelope for a page of items.
///
/// # Examples
/// ```
/// use pagination::{Page, PageLimit, Paginated};
///
/// let page = Page::new(vec![1, 2], PageLimit::default(), None);
/// let envelope = Paginated::from(page);
/// assert_eq!(envelope.data, vec![1, 2]);
/// assert!(!envelope.meta.has_next_page);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    /// Items on the page.
    pub data: Vec<T>,
    /// Pagination metadata.
    pub meta: PageMeta,
}

impl<T> From<Page<T>> for Paginated<T> {
    fn from(page: Page<T>) -> Self {
        let meta = PageMeta {
            limit: page.limit().get(),
            has_next_page: page.has_next_page(),
            next_cursor: page.next_cursor().cloned(),
        };
        Self {
            data: page.into_items(),
            meta,
        }
    }
}
