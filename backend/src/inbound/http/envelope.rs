//! Success envelopes wrapping every handler response body.

use chrono::{DateTime, Utc};
use pagination::{Page, Paginated};
use serde::{Deserialize, Serialize};

/// Uniform success body: `{ "success": true, "data": ..., "timestamp": ... }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Always `true` for success bodies.
    pub success: bool,
    /// Response payload.
    pub data: T,
    /// Time the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> ApiResponse<T> {
    /// Wrap `data` produced at `timestamp`.
    pub const fn new(data: T, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            data,
            timestamp,
        }
    }
}

/// Paginated success body with `data` and `meta` flattened alongside
/// `success` and `timestamp`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// Always `true` for success bodies.
    pub success: bool,
    /// Items and pagination metadata.
    #[serde(flatten)]
    pub page: Paginated<T>,
    /// Time the response was produced.
    pub timestamp: DateTime<Utc>,
}

impl<T> PaginatedResponse<T> {
    /// Wrap a page produced at `timestamp`.
    pub fn new(page: Page<T>, timestamp: DateTime<Utc>) -> Self {
        Self {
            success: true,
            page: Paginated::from(page),
            timestamp,
        }
    }
}
