//! Keyset pagination primitives shared by the user records backend.
//!
//! The crate owns three concerns:
//! - [`PageLimit`]: a validated page size (1 to 100, default 10).
//! - [`Cursor`]: an opaque token naming the last item of a page.
//! - [`Page`] and [`Paginated`]: the lookahead page model and the
//!   `{ data, meta }` envelope serialised at the edges.
//!
//! Pages are built by over-fetching one item past the requested limit and
//! letting [`Page::from_lookahead`] decide whether a further page exists, so
//! no separate count query is required.

mod cursor;
mod envelope;
mod error;
mod limit;
mod page;

pub use cursor::Cursor;
pub use envelope::{PageMeta, Paginated};
pub use error::PaginationError;
pub use limit::PageLimit;
pub use page::Page;

#[cfg(test)]
mod tests;
