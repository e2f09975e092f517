//! Validated page size.

use serde::{Deserialize, Serialize};

use crate::PaginationError;

/// Number of items requested for one page.
///
/// ## Invariants
/// - The value lies within [`PageLimit::MIN`]..=[`PageLimit::MAX`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct PageLimit(u16);

impl PageLimit {
    /// Smallest accepted page size.
    pub const MIN: u16 = 1;
    /// Largest accepted page size.
    pub const MAX: u16 = 100;
    /// Page size used when the caller does not ask for one.
    pub const DEFAULT: u16 = 10;

    /// Validate a caller-supplied page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::LimitOutOfRange`] when `value` is outside
    /// the accepted range.
    ///
    /// # Examples
    /// ```
    /// use pagination::PageLimit;
    ///
    /// assert_eq!(PageLimit::new(25).map(PageLimit::get), Ok(25));
    /// assert!(PageLimit::new(0).is_err());
    /// assert!(PageLimit::new(101).is_err());
    /// ```
    pub fn new(value: u32) -> Result<Self, PaginationError> {
        let out_of_range = PaginationError::LimitOutOfRange {
            value,
            min: Self::MIN,
            max: Self::MAX,
        };
        let Ok(narrowed) = u16::try_from(value) else {
            return Err(out_of_range);
        };
        if !(Self::MIN..=Self::MAX).contains(&narrowed) {
            return Err(out_of_range);
        }
        Ok(Self(narrowed))
    }

    /// Validate an optional page size, falling back to [`PageLimit::DEFAULT`].
    ///
    /// # Errors
    ///
    /// Propagates [`PageLimit::new`] failures for present values.
    pub fn from_optional(value: Option<u32>) -> Result<Self, PaginationError> {
        value.map_or_else(|| Ok(Self::default()), Self::new)
    }

    /// The page size as an integer.
    #[must_use]
    pub const fn get(self) -> u16 {
        self.0
    }

    /// The page size as a collection length.
    #[must_use]
    pub fn as_usize(self) -> usize {
        usize::from(self.0)
    }

    /// Number of items to fetch so that one extra item signals a next page.
    #[must_use]
    pub fn lookahead(self) -> usize {
        self.as_usize() + 1
    }
}

impl Default for PageLimit {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl From<PageLimit> for u32 {
    fn from(value: PageLimit) -> Self {
        Self::from(value.0)
    }
}

impl TryFrom<u32> for PageLimit {
    type Error = PaginationError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
